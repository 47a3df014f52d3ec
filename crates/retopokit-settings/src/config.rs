//! Configuration for RetopoKit sessions
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in a platform-specific directory.
//!
//! Configuration is organized into logical sections:
//! - History (undo depth)
//! - Auto-backup (interval, file name)
//! - Instrumentation (history action log)
//! - Render options for source and target meshes

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Linear RGBA color
pub type Rgba = [f32; 4];

const SELECT_COLOR: [f32; 3] = [1.0, 0.68, 0.2];
const FROZEN_COLOR: [f32; 3] = [0.58, 0.74, 0.96];

fn with_alpha(rgb: [f32; 3], a: f32) -> Rgba {
    [rgb[0], rgb[1], rgb[2], a]
}

/// Undo/redo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of retained undo snapshots
    pub undo_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { undo_depth: 100 }
    }
}

/// Periodic backup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupSettings {
    pub enabled: bool,
    /// Seconds between backups; 0 disables the timer
    pub interval_secs: f64,
    /// Base file name handed to the persistence hook
    pub filename: String,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 120.0,
            filename: "retopokit_backup".to_string(),
        }
    }
}

impl BackupSettings {
    /// Whether the backup timer should run at all
    pub fn is_active(&self) -> bool {
        self.enabled && self.interval_secs > 0.0
    }
}

/// History instrumentation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentSettings {
    pub enabled: bool,
    /// JSON-lines output file; when unset the host supplies a sink
    pub path: Option<PathBuf>,
}

/// Drawing options for one mesh layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub poly_color: Rgba,
    pub poly_color_selected: Rgba,
    pub poly_offset: f32,
    pub line_color: Rgba,
    pub line_color_selected: Rgba,
    pub line_width: f32,
    pub line_offset: f32,
    pub point_color: Rgba,
    pub point_color_selected: Rgba,
    pub point_size: f32,
    pub point_offset: f32,
    pub focus_mult: f32,
    pub triangles_only: bool,
    pub no_selection: bool,
    pub no_below: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::target()
    }
}

impl RenderOptions {
    /// Source meshes draw as invisible depth-only triangles
    pub fn source() -> Self {
        Self {
            poly_color: [0.0; 4],
            poly_color_selected: [0.0; 4],
            poly_offset: 0.000008,
            line_color: [0.0; 4],
            line_color_selected: [0.0; 4],
            line_width: 0.0,
            line_offset: 0.0,
            point_color: [0.0; 4],
            point_color_selected: [0.0; 4],
            point_size: 0.0,
            point_offset: 0.0,
            focus_mult: 0.01,
            triangles_only: true,
            no_selection: true,
            no_below: true,
        }
    }

    pub fn target() -> Self {
        Self {
            poly_color: with_alpha(FROZEN_COLOR, 0.20),
            poly_color_selected: with_alpha(SELECT_COLOR, 0.20),
            poly_offset: 0.000010,
            line_color: with_alpha(FROZEN_COLOR, 1.0),
            line_color_selected: with_alpha(SELECT_COLOR, 1.0),
            line_width: 2.0,
            line_offset: 0.000012,
            point_color: with_alpha(FROZEN_COLOR, 1.0),
            point_color_selected: with_alpha(SELECT_COLOR, 1.0),
            point_size: 5.0,
            point_offset: 0.000015,
            focus_mult: 1.0,
            triangles_only: false,
            no_selection: false,
            no_below: false,
        }
    }

    fn validate(&self, section: &str) -> ConfigResult<()> {
        let colors = [
            ("poly_color", self.poly_color),
            ("poly_color_selected", self.poly_color_selected),
            ("line_color", self.line_color),
            ("line_color_selected", self.line_color_selected),
            ("point_color", self.point_color),
            ("point_color_selected", self.point_color_selected),
        ];
        for (name, color) in colors {
            if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(ConfigError::ValueOutOfRange {
                    key: format!("{}.{}", section, name),
                    value: format!("{:?}", color),
                });
            }
        }
        let sizes = [
            ("line_width", self.line_width),
            ("point_size", self.point_size),
            ("focus_mult", self.focus_mult),
        ];
        for (name, value) in sizes {
            if !(value >= 0.0) {
                return Err(ConfigError::ValueOutOfRange {
                    key: format!("{}.{}", section, name),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Render options for both mesh layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub source: RenderOptions,
    pub target: RenderOptions,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            source: RenderOptions::source(),
            target: RenderOptions::target(),
        }
    }
}

/// Complete session configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub history: HistorySettings,
    pub backup: BackupSettings,
    pub instrument: InstrumentSettings,
    pub render: RenderSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config location, e.g. `~/.config/retopokit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("retopokit").join("config.toml"))
            .ok_or_else(|| SettingsError::ConfigDirectory("no config directory on this platform".into()))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load config from file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!(path = %path.display(), "config not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.history.undo_depth == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "history.undo_depth".to_string(),
                value: "0".to_string(),
            });
        }

        if !(self.backup.interval_secs >= 0.0) || !self.backup.interval_secs.is_finite() {
            return Err(ConfigError::ValueOutOfRange {
                key: "backup.interval_secs".to_string(),
                value: self.backup.interval_secs.to_string(),
            });
        }

        if self.backup.enabled && self.backup.filename.trim().is_empty() {
            return Err(ConfigError::MissingKey("backup.filename".to_string()));
        }

        self.render.source.validate("render.source")?;
        self.render.target.validate("render.target")?;

        Ok(())
    }
}
