use serde::{Deserialize, Serialize};

/// Modal state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Global commands first, then the active tool
    #[default]
    Main,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Main => "main",
        }
    }
}

/// What the host should do after an event was processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalResponse {
    /// Keep routing events to the session
    Stay,
    /// The host handles this event itself
    Pass,
    /// The session is done; `edit_mode` asks the host to switch to its own
    /// mesh editing mode
    Confirm { edit_mode: bool },
}

impl ModalResponse {
    pub fn is_finished(&self) -> bool {
        matches!(self, ModalResponse::Confirm { .. })
    }
}
