//! Collaborators the host application supplies to a session.
//!
//! Each concern is a narrow trait. [`HostServices::headless`] wires no-op
//! implementations so a session can run without any user interface.

use glam::Vec3;
use retopokit_core::{Alert, Point2D, Ray};
use retopokit_mesh::TargetMesh;
use retopokit_settings::RenderOptions;
use tracing::{info, warn};

use crate::actions::Actions;
use crate::view::PerspectiveView;

/// Maps between screen space and world space
pub trait Viewpoint {
    /// Ray from the eye through a screen point
    fn screen_point_to_ray(&self, xy: Point2D) -> Option<Ray>;

    /// Screen position of a world point, `None` when it is behind the eye
    fn world_point_to_screen(&self, point: Vec3) -> Option<Point2D>;

    /// Ray from the eye towards `point`, ending `max_offset` past it
    fn point_to_ray(&self, point: Vec3, max_offset: f32) -> Option<Ray> {
        let xy = self.world_point_to_screen(point)?;
        let ray = self.screen_point_to_ray(xy)?;
        let length = ray.origin.distance(point);
        Some(ray.with_max((length + max_offset).max(0.0)))
    }
}

/// Mouse cursor glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Hand,
    Crosshair,
    Move,
}

pub trait CursorSink {
    fn set_cursor(&mut self, cursor: Cursor);
}

/// The brush/cursor widget drawn under the pointer
pub trait PointerWidget {
    fn update(&mut self, actions: &dyn Actions);
    fn clear(&mut self);

    /// Whether the widget leaves this tick for the active tool
    fn modal(&mut self, actions: &dyn Actions) -> bool;

    fn cursor(&self) -> Cursor;
}

/// Floating host windows (tool palettes, help panels)
pub trait WindowManager {
    /// Whether the pointer is over a window and the event belongs to it
    fn hovering(&mut self, actions: &dyn Actions) -> bool;
}

/// Persistence hook used by the auto-backup timer
pub trait BackupHook {
    fn save_backup(&mut self, filename: &str) -> anyhow::Result<()>;
}

/// Where recovered errors and notices are shown
pub trait AlertSurface {
    fn report(&mut self, alert: &Alert);
}

/// Owner of draw buffers derived from the target mesh
pub trait RenderCache {
    /// Drops buffers built from the previous target and rebuilds from `target`
    fn replace_target(&mut self, target: &TargetMesh, options: &RenderOptions);
}

/// Every collaborator a session talks to
pub struct HostServices {
    pub viewpoint: Box<dyn Viewpoint>,
    pub widget: Box<dyn PointerWidget>,
    pub windows: Box<dyn WindowManager>,
    pub cursor: Box<dyn CursorSink>,
    pub backup: Box<dyn BackupHook>,
    pub alerts: Box<dyn AlertSurface>,
    pub render: Box<dyn RenderCache>,
}

impl HostServices {
    /// No-op collaborators around the given viewpoint
    pub fn headless(viewpoint: impl Viewpoint + 'static) -> Self {
        Self {
            viewpoint: Box::new(viewpoint),
            widget: Box::new(NullWidget),
            windows: Box::new(NoWindows),
            cursor: Box::new(NullCursor),
            backup: Box::new(NoBackup),
            alerts: Box::new(LogAlerts),
            render: Box::new(NullRender),
        }
    }
}

impl Default for HostServices {
    fn default() -> Self {
        Self::headless(PerspectiveView::default())
    }
}

/// Widget that never draws and always hands ticks to the tool
#[derive(Debug, Default)]
pub struct NullWidget;

impl PointerWidget for NullWidget {
    fn update(&mut self, _actions: &dyn Actions) {}

    fn clear(&mut self) {}

    fn modal(&mut self, _actions: &dyn Actions) -> bool {
        true
    }

    fn cursor(&self) -> Cursor {
        Cursor::Crosshair
    }
}

#[derive(Debug, Default)]
pub struct NoWindows;

impl WindowManager for NoWindows {
    fn hovering(&mut self, _actions: &dyn Actions) -> bool {
        false
    }
}

#[derive(Debug, Default)]
pub struct NullCursor;

impl CursorSink for NullCursor {
    fn set_cursor(&mut self, _cursor: Cursor) {}
}

/// Backup hook that only logs
#[derive(Debug, Default)]
pub struct NoBackup;

impl BackupHook for NoBackup {
    fn save_backup(&mut self, filename: &str) -> anyhow::Result<()> {
        info!(filename, "backup requested (headless, nothing saved)");
        Ok(())
    }
}

/// Alert surface that writes to the log
#[derive(Debug, Default)]
pub struct LogAlerts;

impl AlertSurface for LogAlerts {
    fn report(&mut self, alert: &Alert) {
        warn!(level = %alert.level, "{}", alert.message);
    }
}

#[derive(Debug, Default)]
pub struct NullRender;

impl RenderCache for NullRender {
    fn replace_target(&mut self, _target: &TargetMesh, _options: &RenderOptions) {}
}
