//! Error handling for RetopoKit
//!
//! Provides the error types shared by every layer of the editing session:
//! - Session errors (fatal startup conditions)
//! - Tool errors (recoverable failures raised during a modal tick)
//! - Mesh errors (invalid handles and degenerate geometry)
//!
//! All error types use `thiserror` for ergonomic error handling. Spatial
//! query misses and empty undo/redo stacks are deliberately *not* errors;
//! they are reported through `Option` and `bool` return values instead.

use thiserror::Error;

use crate::alert::AlertLevel;

/// Session error type
///
/// Raised only while constructing a session. Once a session is running,
/// every per-tick failure is contained at the modal loop boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// No target mesh was supplied
    #[error("Could not find valid target")]
    NoTarget,

    /// The target mesh cannot be edited
    #[error("Invalid target: {reason}")]
    InvalidTarget {
        /// Why the target was rejected.
        reason: String,
    },

    /// The tool registry is empty
    #[error("Could not find any tools")]
    NoTools,

    /// The requested starting tool is not registered
    #[error("Unknown starting tool: {name}")]
    UnknownTool {
        /// The tool name that was requested.
        name: String,
    },
}

/// Tool error type
///
/// Returned by a tool's modal tick (and by mode handlers). The modal loop
/// inspects the variant to decide how to surface it to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Generic recoverable failure
    #[error("{message}")]
    Recoverable {
        /// A message describing the failure.
        message: String,
    },

    /// An internal invariant check failed
    #[error("Assertion failed: {message}")]
    Assertion {
        /// The invariant that did not hold.
        message: String,
    },

    /// The tool cannot continue and the session should end
    #[error("Fatal tool error: {message}")]
    Fatal {
        /// A message describing the failure.
        message: String,
    },
}

impl ToolError {
    /// Create a recoverable error from a message
    pub fn recoverable(message: impl Into<String>) -> Self {
        ToolError::Recoverable {
            message: message.into(),
        }
    }

    /// Create an assertion-style error from a message
    pub fn assertion(message: impl Into<String>) -> Self {
        ToolError::Assertion {
            message: message.into(),
        }
    }

    /// Create a fatal error from a message
    pub fn fatal(message: impl Into<String>) -> Self {
        ToolError::Fatal {
            message: message.into(),
        }
    }

    /// Alert severity used when reporting this error to the user
    pub fn severity(&self) -> AlertLevel {
        match self {
            ToolError::Assertion { .. } => AlertLevel::AssertionFailure,
            ToolError::Recoverable { .. } | ToolError::Fatal { .. } => AlertLevel::Exception,
        }
    }

    /// Check if the session should stop after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, ToolError::Fatal { .. })
    }
}

/// Mesh error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A vertex handle does not refer to a live vertex
    #[error("Invalid vertex handle {index}")]
    InvalidVertex {
        /// The stale or out-of-range index.
        index: u32,
    },

    /// An edge handle does not refer to a live edge
    #[error("Invalid edge handle {index}")]
    InvalidEdge {
        /// The stale or out-of-range index.
        index: u32,
    },

    /// A face handle does not refer to a live face
    #[error("Invalid face handle {index}")]
    InvalidFace {
        /// The stale or out-of-range index.
        index: u32,
    },

    /// A face or edge would reference the same vertex twice or too few vertices
    #[error("Degenerate element: {reason}")]
    Degenerate {
        /// Why the element is degenerate.
        reason: String,
    },

    /// Source geometry is malformed
    #[error("Invalid source geometry: {reason}")]
    InvalidSource {
        /// Why the geometry was rejected.
        reason: String,
    },
}

impl From<MeshError> for ToolError {
    fn from(err: MeshError) -> Self {
        ToolError::recoverable(err.to_string())
    }
}

/// Main error type for RetopoKit
#[derive(Error, Debug)]
pub enum Error {
    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Tool error
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Mesh error
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a startup error
    pub fn is_session_error(&self) -> bool {
        matches!(self, Error::Session(_))
    }

    /// Check if this is a mesh error
    pub fn is_mesh_error(&self) -> bool {
        matches!(self, Error::Mesh(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type returned from a tool's modal tick
pub type ToolResult<T = ()> = std::result::Result<T, ToolError>;
