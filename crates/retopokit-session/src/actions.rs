//! Named input actions.
//!
//! Mapping raw device events to named actions belongs to the host. The
//! session only sees already-resolved [`InputEvent`]s and queries the
//! resulting state through the [`Actions`] trait.

use std::collections::HashSet;

use glam::Vec2;
use retopokit_core::Point2D;
use serde::{Deserialize, Serialize};

/// Action names understood by the session and the built-in tools
pub mod names {
    pub const UNDO: &str = "undo";
    pub const REDO: &str = "redo";
    pub const DONE: &str = "done";
    pub const EDIT_MODE: &str = "edit mode";
    pub const SELECT_ALL: &str = "select all";
    pub const TOOL_HELP: &str = "tool help";
    pub const WINDOW_ACTIONS: &str = "window actions";
    pub const AUTOSAVE: &str = "autosave";
    pub const NAVIGATE: &str = "navigate";
    pub const PROFILER_PRINT: &str = "profiler print";
    pub const PROFILER_CLEAR: &str = "profiler clear";

    /// Primary pointer action (click/drag)
    pub const ACTION: &str = "action";
    pub const INSERT: &str = "insert";
    pub const CANCEL: &str = "cancel";
}

/// A resolved input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Press { action: String },
    Release { action: String },
    /// Pointer moved; `None` when it left the viewport
    MouseMove { position: Option<Point2D> },
    /// Periodic timer tick carrying the elapsed seconds
    Timer { delta: f32 },
    Resize { width: f32, height: f32 },
}

impl InputEvent {
    pub fn press(action: impl Into<String>) -> Self {
        Self::Press {
            action: action.into(),
        }
    }

    pub fn release(action: impl Into<String>) -> Self {
        Self::Release {
            action: action.into(),
        }
    }

    pub fn mouse(x: f32, y: f32) -> Self {
        Self::MouseMove {
            position: Some(Vec2::new(x, y)),
        }
    }
}

/// Action state the session and tools read during a tick
pub trait Actions {
    /// Folds one event into the state
    fn process(&mut self, event: &InputEvent);

    /// The action went down during the current event
    fn pressed(&self, name: &str) -> bool;

    /// The action is currently held
    fn using(&self, name: &str) -> bool;

    /// Camera navigation is in progress
    fn navigating(&self) -> bool;

    /// The current event is a timer tick
    fn is_timer(&self) -> bool;

    /// Forgets a held action whose release the host will swallow
    fn unuse(&mut self, name: &str);

    fn mouse(&self) -> Option<Point2D>;

    /// Viewport size in pixels
    fn size(&self) -> Vec2;

    /// Seconds elapsed since the previous timer tick
    fn time_delta(&self) -> f32;

    fn trackpad(&self) -> bool {
        false
    }

    /// Pointer is inside the viewport
    fn valid_mouse(&self) -> bool {
        let size = self.size();
        self.mouse()
            .is_some_and(|m| m.x >= 0.0 && m.y >= 0.0 && m.x <= size.x && m.y <= size.y)
    }
}

/// Straightforward [`Actions`] implementation driven by [`InputEvent`]s
#[derive(Debug, Clone)]
pub struct ActionState {
    held: HashSet<String>,
    pressed: HashSet<String>,
    navigation: HashSet<String>,
    mouse: Option<Point2D>,
    size: Vec2,
    time_delta: f32,
    timer: bool,
    trackpad: bool,
}

impl ActionState {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            navigation: HashSet::from([names::NAVIGATE.to_string()]),
            mouse: None,
            size: Vec2::new(width, height),
            time_delta: 0.0,
            timer: false,
            trackpad: false,
        }
    }

    /// Treats `name` as a navigation action in addition to `navigate`
    pub fn with_navigation_action(mut self, name: impl Into<String>) -> Self {
        self.navigation.insert(name.into());
        self
    }

    pub fn with_trackpad(mut self, trackpad: bool) -> Self {
        self.trackpad = trackpad;
        self
    }
}

impl Default for ActionState {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Actions for ActionState {
    fn process(&mut self, event: &InputEvent) {
        self.pressed.clear();
        self.timer = false;
        self.time_delta = 0.0;
        match event {
            InputEvent::Press { action } => {
                self.held.insert(action.clone());
                self.pressed.insert(action.clone());
            }
            InputEvent::Release { action } => {
                self.held.remove(action);
            }
            InputEvent::MouseMove { position } => self.mouse = *position,
            InputEvent::Timer { delta } => {
                self.timer = true;
                self.time_delta = *delta;
            }
            InputEvent::Resize { width, height } => self.size = Vec2::new(*width, *height),
        }
    }

    fn pressed(&self, name: &str) -> bool {
        self.pressed.contains(name)
    }

    fn using(&self, name: &str) -> bool {
        self.held.contains(name)
    }

    fn navigating(&self) -> bool {
        self.navigation.iter().any(|n| self.held.contains(n))
    }

    fn is_timer(&self) -> bool {
        self.timer
    }

    fn unuse(&mut self, name: &str) {
        self.held.remove(name);
        self.pressed.remove(name);
    }

    fn mouse(&self) -> Option<Point2D> {
        self.mouse
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn time_delta(&self) -> f32 {
        self.time_delta
    }

    fn trackpad(&self) -> bool {
        self.trackpad
    }
}
