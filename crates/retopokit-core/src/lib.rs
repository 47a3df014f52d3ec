//! # RetopoKit Core
//!
//! Core types, geometry primitives and the error taxonomy shared by every
//! RetopoKit crate.

pub mod alert;
pub mod error;
pub mod geometry;
pub mod types;

pub use alert::{Alert, AlertLevel};
pub use error::{Error, MeshError, Result, SessionError, ToolError, ToolResult};
pub use geometry::{Plane, Point2D, Ray, PLANE_EPSILON};
pub use types::{shared, Shared, SourceId};

/// Re-export of the vector math crate used across the workspace
pub use glam;
