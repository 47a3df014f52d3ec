//! RetopoKit Settings Crate
//!
//! Handles session configuration: history depth, auto-backup, instrumentation
//! and render options, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    BackupSettings, Config, HistorySettings, InstrumentSettings, RenderOptions, RenderSettings,
    Rgba,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
