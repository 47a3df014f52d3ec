//! User-facing alert messages.
//!
//! Recovered errors are never raised past the modal loop; they are turned
//! into an [`Alert`] and handed to whatever surface the host provides.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a user alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// Informational message
    Info,
    /// An internal invariant check failed
    AssertionFailure,
    /// A generic failure inside a handler
    Exception,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::AssertionFailure => write!(f, "assert"),
            Self::Exception => write!(f, "exception"),
        }
    }
}

/// A message destined for the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Message formatted as a bullet list, one bullet per line
    pub fn bulleted(&self) -> String {
        self.message
            .lines()
            .map(|l| format!("- {}", l))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}
