//! Built-in tools and their action bindings.

mod contours;
mod polypen;
mod tweak;

pub use contours::Contours;
pub use polypen::PolyPen;
pub use tweak::Tweak;

use crate::tool::ToolRegistry;

pub const POLYPEN_ACTION: &str = "polypen tool";
pub const TWEAK_ACTION: &str = "tweak tool";
pub const CONTOURS_ACTION: &str = "contours tool";

/// Registry with every built-in tool, PolyPen first
pub fn builtin_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry
        .register(POLYPEN_ACTION, PolyPen::NAME, PolyPen::default)
        .register(TWEAK_ACTION, Tweak::NAME, Tweak::default)
        .register(CONTOURS_ACTION, Contours::NAME, Contours::default);
    registry
}
