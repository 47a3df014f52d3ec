//! # RetopoKit Session
//!
//! The editing-session engine. A [`Session`] owns the target mesh and its
//! undo/redo history, routes each input event through a small modal state
//! machine to the active [`Tool`], and answers spatial queries against every
//! source surface.
//!
//! Host integration happens through the collaborator traits in [`host`] and
//! [`actions`]; headless no-op implementations are provided for tests and
//! batch replay.

pub mod actions;
pub mod crawl;
pub mod history;
pub mod host;
pub mod instrument;
pub mod mode;
pub mod profiler;
pub mod query;
pub mod session;
pub mod sources;
pub mod tool;
pub mod tools;
pub mod view;

pub use actions::{ActionState, Actions, InputEvent};
pub use crawl::{Crawl, CrawlSegment, PlaneCrawler};
pub use history::{HistoryStacks, Snapshot};
pub use host::{
    AlertSurface, BackupHook, Cursor, CursorSink, HostServices, PointerWidget, RenderCache,
    Viewpoint, WindowManager,
};
pub use instrument::Instrument;
pub use mode::{ModalResponse, Mode};
pub use profiler::{ProfileScope, Profiler, ScopeStats};
pub use query::QueryAggregator;
pub use session::{Session, SessionBuilder};
pub use sources::SourceSet;
pub use tool::{SharedTool, Tool, ToolBinding, ToolFactory, ToolRegistry};
pub use tools::{builtin_registry, Contours, PolyPen, Tweak};
pub use view::PerspectiveView;
