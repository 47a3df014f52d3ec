//! # RetopoKit
//!
//! A retopology editing-session engine. An artist builds a new low-poly
//! target mesh on top of one or more high-resolution source meshes; the
//! session owns the target, routes input events to the active tool and
//! answers spatial queries against every source at once.
//!
//! ## Architecture
//!
//! RetopoKit is organized as a workspace with multiple crates:
//!
//! 1. **retopokit-core** - Geometry primitives, error types, alerts
//! 2. **retopokit-mesh** - Target mesh, source meshes, BVH, plane crawling
//! 3. **retopokit-settings** - Persisted configuration
//! 4. **retopokit-session** - History, tool dispatch, modal loop, queries
//! 5. **retopokit** - Replay binary that drives a headless session

pub mod replay;

pub use retopokit_core::{
    Alert, AlertLevel, Error, MeshError, Plane, Point2D, Ray, SessionError, ToolError, ToolResult,
};
pub use retopokit_mesh::{primitives, Hit, SourceMesh, SourceSurface, TargetMesh, TriangleData};
pub use retopokit_session::{
    builtin_registry, ActionState, Actions, HostServices, InputEvent, ModalResponse, Mode,
    PerspectiveView, Session, SessionBuilder, Tool, ToolRegistry,
};
pub use retopokit_settings::Config;
pub use replay::{Primitive, ReplayScript, ReplaySummary, SourceSpec, ViewSpec};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Logs go to stderr so stdout stays free for replay output. `RUST_LOG`
/// is honoured; `json` switches from the pretty format to JSON lines.
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .json();
        registry.with(fmt_layer).try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty();
        registry.with(fmt_layer).try_init()?;
    }

    Ok(())
}
