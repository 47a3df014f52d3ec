//! Undo/redo for the session: capture, restore and the tool lifecycle.

use std::rc::Rc;

use retopokit_core::{ToolError, ToolResult};
use tracing::debug;

use super::Session;
use crate::history::Snapshot;
use crate::tool::SharedTool;

impl Session {
    fn capture(&self, label: &str) -> Snapshot {
        Snapshot::new(label, Rc::clone(&self.tool), self.target.clone())
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.target = snapshot.mesh;
        self.target.dirty();
        self.host
            .render
            .replace_target(&self.target, &self.config.render.target);
        if snapshot.tool.try_borrow_mut().is_err() {
            debug!("tool restored during its own tick, deferring activation");
            self.tool = Rc::clone(&snapshot.tool);
            self.pending_activation = Some(snapshot.tool);
            return;
        }
        if let Err(e) = self.set_tool(snapshot.tool, true) {
            self.report_tool_error(&e);
        }
    }

    /// Runs the lifecycle of a tool restored while it was ticking
    pub(super) fn activate_pending(&mut self) {
        if let Some(tool) = self.pending_activation.take() {
            if let Err(e) = self.set_tool(tool, true) {
                self.report_tool_error(&e);
            }
        }
    }

    fn instrument_write(&mut self, action: &str) {
        if let Some(instrument) = self.instrument.as_mut() {
            instrument.write(action, &self.target);
        }
    }

    /// Records the current state before an edit labelled `action`.
    ///
    /// With `repeatable`, a push whose label matches the most recent undo
    /// step is skipped so continuous edits collapse into one step.
    pub fn undo_push(&mut self, action: &str, repeatable: bool) {
        if repeatable && self.history.top_label() == Some(action) {
            return;
        }
        let snapshot = self.capture(action);
        self.history.push(snapshot);
        self.instrument_write(action);
        debug!(
            action,
            undo = self.history.undo_len(),
            redo = self.history.redo_len(),
            "undo push"
        );
    }

    /// Steps back one undo step; false when there is nothing to undo
    pub fn pop_undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop_undo() else {
            return false;
        };
        debug!(action = %snapshot.label, "undo");
        let current = self.capture("undo");
        self.history.push_redo(current);
        self.restore(snapshot);
        self.instrument_write("undo");
        true
    }

    /// Re-applies the most recently undone step; false when there is none.
    ///
    /// The pre-redo state goes onto the undo stack without clearing the
    /// remaining redo steps.
    pub fn pop_redo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop_redo() else {
            return false;
        };
        debug!(action = %snapshot.label, "redo");
        let current = self.capture("redo");
        self.history.push_undo_keep_redo(current);
        self.restore(snapshot);
        self.instrument_write("redo");
        true
    }

    /// Drops the most recent undo step and restores it without recording
    /// the current state anywhere
    pub fn cancel_top(&mut self) -> bool {
        let Some(snapshot) = self.history.pop_undo() else {
            return false;
        };
        debug!(action = %snapshot.label, "cancel undo step");
        self.restore(snapshot);
        self.instrument_write("cancel (undo)");
        true
    }

    /// Activates `tool` and runs its lifecycle.
    ///
    /// Skipped when `tool` is already active unless `force` is set.
    pub fn set_tool(&mut self, tool: SharedTool, force: bool) -> ToolResult {
        if !force && Rc::ptr_eq(&self.tool, &tool) {
            return Ok(());
        }
        self.tool = Rc::clone(&tool);
        self.pending_activation = None;
        let mut active = tool
            .try_borrow_mut()
            .map_err(|_| ToolError::assertion("tool activated while it is running"))?;
        debug!(tool = active.name(), force, "activating tool");
        active.start(self)?;
        active.update_tool_options(self)?;
        active.update(self)?;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.top_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_top().map(|s| s.label.as_str())
    }

    pub fn undo_len(&self) -> usize {
        self.history.undo_len()
    }

    pub fn redo_len(&self) -> usize {
        self.history.redo_len()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.depth()
    }
}
