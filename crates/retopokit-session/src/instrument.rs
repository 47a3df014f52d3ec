//! JSON-lines log of history operations.
//!
//! Each line carries the action label, the session id, a UTC timestamp and
//! the full target mesh at that moment, so an editing session can be
//! reconstructed offline.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use retopokit_mesh::TargetMesh;
use retopokit_settings::InstrumentSettings;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

const DEFAULT_FILE: &str = "retopokit_instrument.jsonl";

#[derive(Serialize)]
struct Record<'a> {
    action: &'a str,
    session: Uuid,
    time: String,
    target: &'a TargetMesh,
}

pub struct Instrument {
    session: Uuid,
    sink: Box<dyn Write>,
}

impl std::fmt::Debug for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instrument")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Instrument {
    /// Writes to an arbitrary sink
    pub fn new(sink: Box<dyn Write>) -> Self {
        Self {
            session: Uuid::new_v4(),
            sink,
        }
    }

    /// Opens the configured log file for appending; `None` when disabled
    pub fn from_settings(settings: &InstrumentSettings) -> anyhow::Result<Option<Self>> {
        if !settings.enabled {
            return Ok(None);
        }
        let path = settings
            .path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_FILE));
        Self::open(path).map(Some)
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening instrument log {}", path.display()))?;
        debug!(path = %path.display(), "instrumenting history");
        Ok(Self::new(Box::new(file)))
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    /// Appends one record; failures are logged and otherwise ignored
    pub fn write(&mut self, action: &str, target: &TargetMesh) {
        if let Err(e) = self.try_write(action, target) {
            warn!(action, error = %e, "failed to write instrument record");
        }
    }

    fn try_write(&mut self, action: &str, target: &TargetMesh) -> anyhow::Result<()> {
        let record = Record {
            action,
            session: self.session,
            time: Utc::now().to_rfc3339(),
            target,
        };
        serde_json::to_writer(&mut self.sink, &record)?;
        self.sink.write_all(b"\n")?;
        self.sink.flush()?;
        Ok(())
    }
}
