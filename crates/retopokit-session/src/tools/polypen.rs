use retopokit_core::ToolResult;
use retopokit_mesh::VertexId;
use tracing::trace;

use crate::actions::names;
use crate::session::Session;
use crate::tool::Tool;

/// Places target vertices on the sources and chains each to the previous one
#[derive(Debug, Default)]
pub struct PolyPen {
    last: Option<VertexId>,
}

impl PolyPen {
    pub const NAME: &'static str = "PolyPen";

    pub fn last(&self) -> Option<VertexId> {
        self.last
    }
}

impl Tool for PolyPen {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn help(&self) -> &str {
        "insert: add a vertex under the pointer, joined to the previous one\n\
         cancel: start a new chain"
    }

    /// Resumes from the single selected vertex, if there is one
    fn update(&mut self, session: &mut Session) -> ToolResult {
        let selected = session.target().selected_vertices();
        self.last = match selected.as_slice() {
            &[only] => Some(only),
            _ => None,
        };
        Ok(())
    }

    fn modal(&mut self, session: &mut Session) -> ToolResult {
        if session.actions().pressed(names::CANCEL) {
            self.last = None;
            session.target_mut().deselect_all();
            return Ok(());
        }
        if !session.actions().pressed(names::INSERT) {
            return Ok(());
        }
        let Some((point, normal)) = session.pointer_hit() else {
            return Ok(());
        };

        session.undo_push("insert vertex", false);
        let target = session.target_mut();
        let vertex = target.add_vertex(point, normal);
        if let Some(last) = self.last.filter(|&v| target.vertex(v).is_some()) {
            target.add_edge(last, vertex)?;
        }
        target.deselect_all();
        target.select_vertex(vertex, true)?;
        trace!(vertex = vertex.0, "polypen insert");
        self.last = Some(vertex);
        Ok(())
    }
}
