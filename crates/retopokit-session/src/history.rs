//! Bounded undo/redo stacks.
//!
//! The stacks only store and move [`Snapshot`]s. Capturing and restoring
//! session state is done by the session itself (see `session::history`).

use std::collections::VecDeque;
use std::fmt;

use retopokit_mesh::TargetMesh;

use crate::tool::SharedTool;

/// Captured session state: the active tool and a deep copy of the target
#[derive(Clone)]
pub struct Snapshot {
    pub label: String,
    pub tool: SharedTool,
    pub mesh: TargetMesh,
}

impl Snapshot {
    pub fn new(label: impl Into<String>, tool: SharedTool, mesh: TargetMesh) -> Self {
        Self {
            label: label.into(),
            tool,
            mesh,
        }
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tool = self
            .tool
            .try_borrow()
            .map(|t| t.name().to_string())
            .unwrap_or_else(|_| "<busy>".to_string());
        f.debug_struct("Snapshot")
            .field("label", &self.label)
            .field("tool", &tool)
            .field("vertices", &self.mesh.vertex_count())
            .field("faces", &self.mesh.face_count())
            .finish()
    }
}

/// Undo and redo stacks; the undo stack never exceeds `depth`
#[derive(Debug)]
pub struct HistoryStacks {
    undo: VecDeque<Snapshot>,
    redo: VecDeque<Snapshot>,
    depth: usize,
}

impl HistoryStacks {
    /// A depth of zero is treated as one
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            undo: VecDeque::with_capacity(depth),
            redo: VecDeque::new(),
            depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Appends a new forward step, evicting the oldest at capacity and
    /// clearing redo
    pub fn push(&mut self, snapshot: Snapshot) {
        self.push_undo_keep_redo(snapshot);
        self.redo.clear();
    }

    /// Appends to undo without touching redo (used when redoing)
    pub fn push_undo_keep_redo(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.depth {
            self.undo.pop_front();
        }
    }

    pub fn push_redo(&mut self, snapshot: Snapshot) {
        self.redo.push_back(snapshot);
    }

    pub fn pop_undo(&mut self) -> Option<Snapshot> {
        self.undo.pop_back()
    }

    pub fn pop_redo(&mut self) -> Option<Snapshot> {
        self.redo.pop_back()
    }

    pub fn undo_top(&self) -> Option<&Snapshot> {
        self.undo.back()
    }

    pub fn redo_top(&self) -> Option<&Snapshot> {
        self.redo.back()
    }

    /// Label of the most recent undo step
    pub fn top_label(&self) -> Option<&str> {
        self.undo_top().map(|s| s.label.as_str())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Undo labels, oldest first
    pub fn undo_labels(&self) -> impl Iterator<Item = &str> {
        self.undo.iter().map(|s| s.label.as_str())
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
