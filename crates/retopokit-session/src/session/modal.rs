//! The per-event modal loop and the `main` mode handler.

use retopokit_core::{ToolError, ToolResult};
use tracing::{debug, info, warn};

use super::Session;
use crate::actions::{names, InputEvent};
use crate::host::Cursor;
use crate::mode::{ModalResponse, Mode};

impl Session {
    /// Processes one input event to completion.
    ///
    /// Earlier checks short-circuit later ones: pass-through actions, help
    /// toggling, window hovering and camera navigation all return before
    /// the mode handler runs. Handler errors are reported and contained.
    pub fn modal(&mut self, event: &InputEvent) -> ModalResponse {
        let profiler = self.profiler.clone();
        let _scope = profiler.scope("modal");

        self.actions.process(event);
        self.update_pointer_hit();

        if self.actions.using(names::WINDOW_ACTIONS) || self.actions.using(names::AUTOSAVE) {
            return ModalResponse::Pass;
        }

        if self.actions.pressed(names::TOOL_HELP) {
            self.help_visible = !self.help_visible;
            return ModalResponse::Stay;
        }

        if self.actions.is_timer() {
            self.tick_backup(f64::from(self.actions.time_delta()));
        }

        if self.host.windows.hovering(self.actions.as_ref()) {
            self.host.widget.clear();
            return if self.exit {
                self.finish(false)
            } else {
                ModalResponse::Stay
            };
        }

        if self.actions.navigating() || (self.actions.is_timer() && self.navigating) {
            // the host swallows the release of a navigation action
            self.actions.unuse(names::NAVIGATE);
            self.navigating = true;
            if !self.actions.trackpad() {
                self.host.cursor.set_cursor(Cursor::Hand);
            }
            self.host.widget.clear();
            return ModalResponse::Pass;
        }
        if self.navigating {
            self.navigating = false;
            self.host.widget.update(self.actions.as_ref());
        }

        match self.dispatch_mode() {
            Ok(Some(mode)) => self.mode = mode,
            Ok(None) => {}
            Err(e) => self.report_tool_error(&e),
        }

        if self.actions.pressed(names::DONE) || self.exit {
            return self.finish(false);
        }
        if self.actions.pressed(names::EDIT_MODE) {
            return self.finish(true);
        }
        ModalResponse::Stay
    }

    fn finish(&mut self, edit_mode: bool) -> ModalResponse {
        info!(
            mesh = self.target.name(),
            undo = self.history.undo_len(),
            edit_mode,
            "session finished"
        );
        ModalResponse::Confirm { edit_mode }
    }

    fn dispatch_mode(&mut self) -> ToolResult<Option<Mode>> {
        match self.mode {
            Mode::Main => self.modal_main(),
        }
    }

    fn modal_main(&mut self) -> ToolResult<Option<Mode>> {
        if self.actions.pressed(names::UNDO) {
            self.pop_undo();
            return Ok(None);
        }
        if self.actions.pressed(names::REDO) {
            self.pop_redo();
            return Ok(None);
        }

        if self.actions.pressed(names::PROFILER_PRINT) {
            self.profiler.print();
            return Ok(None);
        }
        if self.actions.pressed(names::PROFILER_CLEAR) {
            debug!("clearing profiler");
            self.profiler.clear();
            return Ok(None);
        }

        let actions = self.actions.as_ref();
        if let Some(factory) = self.registry.find_pressed(|action| actions.pressed(action)) {
            self.set_tool(factory(), false)?;
            return Ok(None);
        }

        if self.actions.pressed(names::SELECT_ALL) {
            self.undo_push("select all", false);
            self.target.select_toggle();
            return Ok(None);
        }

        if self.actions.valid_mouse() {
            self.host.widget.update(self.actions.as_ref());
            let cursor = self.host.widget.cursor();
            self.host.cursor.set_cursor(cursor);
        } else {
            self.host.widget.clear();
            self.host.cursor.set_cursor(Cursor::Default);
        }

        if self.host.widget.modal(self.actions.as_ref()) && self.actions.valid_mouse() {
            self.tool_modal()?;
        }
        Ok(None)
    }

    fn tool_modal(&mut self) -> ToolResult {
        let tool = self.tool.clone();
        let result = {
            let mut active = tool
                .try_borrow_mut()
                .map_err(|_| ToolError::assertion("tool tick re-entered"))?;
            let _scope = self.profiler.scope(format!("tool {}", active.name()));
            let result = active.modal(self);
            result
        };
        self.activate_pending();
        result
    }

    /// Counts down the backup interval and asks the host to save when it
    /// runs out. Failures are logged and the timer restarts either way.
    fn tick_backup(&mut self, delta: f64) {
        let backup = &self.config.backup;
        if !backup.is_active() {
            return;
        }
        let remaining = match self.time_to_save {
            None => backup.interval_secs,
            Some(t) => t - delta,
        };
        if remaining > 0.0 {
            self.time_to_save = Some(remaining);
            return;
        }
        debug!(filename = %backup.filename, "auto backup");
        if let Err(e) = self.host.backup.save_backup(&backup.filename) {
            warn!(error = %e, "auto backup failed");
        }
        self.time_to_save = Some(backup.interval_secs);
    }
}
