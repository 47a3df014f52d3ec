//! Tools and the statically built tool registry.

use std::fmt;
use std::rc::Rc;

use retopokit_core::{shared, Shared, ToolResult};

use crate::session::Session;

/// A modal editing tool.
///
/// A session calls `start`, `update_tool_options` and `update` (in that
/// order) whenever the tool becomes active, including when an undo or redo
/// restores it. `modal` runs once per tick that reaches the tool.
pub trait Tool {
    fn name(&self) -> &str;

    /// Short usage text shown when tool help is toggled
    fn help(&self) -> &str {
        ""
    }

    fn start(&mut self, _session: &mut Session) -> ToolResult {
        Ok(())
    }

    fn update_tool_options(&mut self, _session: &mut Session) -> ToolResult {
        Ok(())
    }

    fn update(&mut self, _session: &mut Session) -> ToolResult {
        Ok(())
    }

    fn modal(&mut self, session: &mut Session) -> ToolResult;
}

/// Shared handle to a tool; undo snapshots keep one alive
pub type SharedTool = Shared<dyn Tool>;

/// Builds a fresh tool instance
pub type ToolFactory = Rc<dyn Fn() -> SharedTool>;

/// An action bound to a tool factory
#[derive(Clone)]
pub struct ToolBinding {
    pub action: String,
    pub name: String,
    pub factory: ToolFactory,
}

impl fmt::Debug for ToolBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolBinding")
            .field("action", &self.action)
            .field("name", &self.name)
            .finish()
    }
}

/// Maps action names to tool factories, in registration order
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    bindings: Vec<ToolBinding>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `ctor` under `action`. A later registration for the same
    /// action replaces the earlier one.
    pub fn register<T, F>(&mut self, action: impl Into<String>, name: impl Into<String>, ctor: F) -> &mut Self
    where
        T: Tool + 'static,
        F: Fn() -> T + 'static,
    {
        let action = action.into();
        let factory: ToolFactory = Rc::new(move || -> SharedTool { shared(ctor()) });
        let binding = ToolBinding {
            action: action.clone(),
            name: name.into(),
            factory,
        };
        match self.bindings.iter_mut().find(|b| b.action == action) {
            Some(existing) => *existing = binding,
            None => self.bindings.push(binding),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> impl Iterator<Item = &ToolBinding> {
        self.bindings.iter()
    }

    /// Factory for the tool called `name`
    pub fn by_name(&self, name: &str) -> Option<ToolFactory> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.factory.clone())
    }

    /// Factory of the first binding whose action satisfies `pressed`
    pub fn find_pressed(&self, pressed: impl Fn(&str) -> bool) -> Option<ToolFactory> {
        self.bindings
            .iter()
            .find(|b| pressed(&b.action))
            .map(|b| b.factory.clone())
    }

    pub fn first(&self) -> Option<ToolFactory> {
        self.bindings.first().map(|b| b.factory.clone())
    }
}
