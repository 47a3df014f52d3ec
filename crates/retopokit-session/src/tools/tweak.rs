use retopokit_core::ToolResult;
use retopokit_mesh::VertexId;

use crate::actions::names;
use crate::session::Session;
use crate::tool::Tool;

/// Drags the target vertex nearest the pointer across the source surfaces
#[derive(Debug)]
pub struct Tweak {
    grabbed: Option<VertexId>,
    /// The current grab already has its undo step
    pushed: bool,
    /// World-space grab and snap radius
    pub radius: f32,
}

impl Default for Tweak {
    fn default() -> Self {
        Self {
            grabbed: None,
            pushed: false,
            radius: 0.5,
        }
    }
}

impl Tweak {
    pub const NAME: &'static str = "Tweak";

    pub fn grabbed(&self) -> Option<VertexId> {
        self.grabbed
    }
}

impl Tool for Tweak {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn help(&self) -> &str {
        "action (drag): move the nearest vertex along the surface"
    }

    fn start(&mut self, _session: &mut Session) -> ToolResult {
        self.grabbed = None;
        self.pushed = false;
        Ok(())
    }

    fn modal(&mut self, session: &mut Session) -> ToolResult {
        if session.actions().pressed(names::ACTION) {
            self.grabbed = session
                .pointer_hit()
                .and_then(|(point, _)| session.target().nearest_vertex(point, self.radius))
                .map(|(v, _)| v);
            self.pushed = false;
            return Ok(());
        }
        if !session.actions().using(names::ACTION) {
            self.grabbed = None;
            return Ok(());
        }
        let Some(vertex) = self.grabbed else {
            return Ok(());
        };
        if session.target().vertex(vertex).is_none() {
            self.grabbed = None;
            return Ok(());
        }
        let Some(hit) = session.raycast_pointer() else {
            return Ok(());
        };
        let snapped = session.nearest_point(hit.point, self.radius).unwrap_or(hit);

        // one undo step per grab
        if !self.pushed {
            session.undo_push("tweak", false);
            self.pushed = true;
        }
        let target = session.target_mut();
        target.set_vertex_position(vertex, snapped.point)?;
        target.set_vertex_normal(vertex, snapped.normal)?;
        Ok(())
    }
}
