//! The ordered, read-only set of source surfaces of a session.

use retopokit_core::SourceId;
use retopokit_mesh::SourceSurface;

/// Source surfaces in a stable order. Query tie-breaks follow this order.
#[derive(Default)]
pub struct SourceSet {
    sources: Vec<Box<dyn SourceSurface>>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: impl SourceSurface + 'static) -> SourceId {
        self.push_boxed(Box::new(source))
    }

    pub fn push_boxed(&mut self, source: Box<dyn SourceSurface>) -> SourceId {
        self.sources.push(source);
        self.sources.len() - 1
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, id: SourceId) -> Option<&dyn SourceSurface> {
        self.sources.get(id).map(|s| s.as_ref())
    }

    /// Sources with their ids, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (SourceId, &dyn SourceSurface)> {
        self.sources.iter().enumerate().map(|(i, s)| (i, s.as_ref()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

impl FromIterator<Box<dyn SourceSurface>> for SourceSet {
    fn from_iter<I: IntoIterator<Item = Box<dyn SourceSurface>>>(iter: I) -> Self {
        Self {
            sources: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for SourceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
