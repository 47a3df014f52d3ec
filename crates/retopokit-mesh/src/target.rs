//! The target mesh being built during a retopology session.
//!
//! `TargetMesh` stores vertices, edges and faces in separate [`Arena`]s and
//! links them by index rather than by reference. Cloning therefore produces
//! a fully independent deep copy, which is what undo snapshots rely on.

use glam::Vec3;
use retopokit_core::MeshError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::arena::Arena;

/// Handle to a target vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

/// Handle to a target edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

/// Handle to a target face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceId(pub u32);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub verts: [VertexId; 2],
    pub selected: bool,
}

impl Edge {
    pub fn has_vertex(&self, v: VertexId) -> bool {
        self.verts[0] == v || self.verts[1] == v
    }

    /// The endpoint opposite `v`, if `v` is an endpoint
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.verts[0] == v {
            Some(self.verts[1])
        } else if self.verts[1] == v {
            Some(self.verts[0])
        } else {
            None
        }
    }

    fn joins(&self, a: VertexId, b: VertexId) -> bool {
        (self.verts[0] == a && self.verts[1] == b) || (self.verts[0] == b && self.verts[1] == a)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub verts: SmallVec<[VertexId; 4]>,
    pub selected: bool,
}

impl Face {
    /// Consecutive vertex pairs around the face boundary
    pub fn boundary(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.verts.len();
        (0..n).map(move |i| (self.verts[i], self.verts[(i + 1) % n]))
    }
}

/// The single mutable mesh edited by a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetMesh {
    name: String,
    vertices: Arena<Vertex>,
    edges: Arena<Edge>,
    faces: Arena<Face>,
    /// Derived state (render buffers, caches) must be rebuilt
    #[serde(skip)]
    dirty: bool,
    /// Bumped on every mutation
    #[serde(skip)]
    version: u64,
}

/// Two meshes are equal when their topology and element values match;
/// the dirty flag and version counter are bookkeeping and are ignored.
impl PartialEq for TargetMesh {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.vertices == other.vertices
            && self.edges == other.edges
            && self.faces == other.faces
    }
}

impl TargetMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Arena::new(),
            edges: Arena::new(),
            faces: Arena::new(),
            dirty: true,
            version: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ------------------------------------------------------------------
    // bookkeeping

    /// Marks derived state as stale
    pub fn dirty(&mut self) {
        self.dirty = true;
        self.version += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag once derived state has been rebuilt
    pub fn clean(&mut self) {
        self.dirty = false;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Serializes topology for instrumentation logs
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    // ------------------------------------------------------------------
    // element access

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices.iter().map(|(i, v)| (VertexId(i), v))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().map(|(i, e)| (EdgeId(i), e))
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> {
        self.faces.iter().map(|(i, f)| (FaceId(i), f))
    }

    fn require_vertex(&self, id: VertexId) -> Result<&Vertex, MeshError> {
        self.vertices
            .get(id.0)
            .ok_or(MeshError::InvalidVertex { index: id.0 })
    }

    // ------------------------------------------------------------------
    // creation

    pub fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> VertexId {
        let id = self.vertices.insert(Vertex {
            position,
            normal: normal.normalize_or_zero(),
            selected: false,
        });
        self.dirty();
        VertexId(id)
    }

    /// Edge joining `a` and `b`, if one exists
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edges
            .iter()
            .find(|(_, e)| e.joins(a, b))
            .map(|(i, _)| EdgeId(i))
    }

    /// Creates an edge between two vertices, or returns the existing one
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId, MeshError> {
        self.require_vertex(a)?;
        self.require_vertex(b)?;
        if a == b {
            return Err(MeshError::Degenerate {
                reason: format!("edge from {} to itself", a),
            });
        }
        if let Some(existing) = self.find_edge(a, b) {
            return Ok(existing);
        }
        let id = self.edges.insert(Edge {
            verts: [a, b],
            selected: false,
        });
        self.dirty();
        Ok(EdgeId(id))
    }

    /// Creates a face over `verts` (in winding order), adding any missing
    /// boundary edges
    pub fn add_face(&mut self, verts: &[VertexId]) -> Result<FaceId, MeshError> {
        if verts.len() < 3 {
            return Err(MeshError::Degenerate {
                reason: format!("face needs at least 3 vertices, got {}", verts.len()),
            });
        }
        for (i, v) in verts.iter().enumerate() {
            self.require_vertex(*v)?;
            if verts[..i].contains(v) {
                return Err(MeshError::Degenerate {
                    reason: format!("face repeats vertex {}", v),
                });
            }
        }
        let face = Face {
            verts: verts.iter().copied().collect(),
            selected: false,
        };
        let edges: Vec<(VertexId, VertexId)> = face.boundary().collect();
        for (a, b) in edges {
            self.add_edge(a, b)?;
        }
        let id = self.faces.insert(face);
        self.dirty();
        Ok(FaceId(id))
    }

    // ------------------------------------------------------------------
    // modification

    pub fn set_vertex_position(&mut self, id: VertexId, position: Vec3) -> Result<(), MeshError> {
        let vertex = self
            .vertices
            .get_mut(id.0)
            .ok_or(MeshError::InvalidVertex { index: id.0 })?;
        vertex.position = position;
        self.dirty();
        Ok(())
    }

    pub fn set_vertex_normal(&mut self, id: VertexId, normal: Vec3) -> Result<(), MeshError> {
        let vertex = self
            .vertices
            .get_mut(id.0)
            .ok_or(MeshError::InvalidVertex { index: id.0 })?;
        vertex.normal = normal.normalize_or_zero();
        self.dirty();
        Ok(())
    }

    /// Removes a face, leaving its edges and vertices in place
    pub fn remove_face(&mut self, id: FaceId) -> Result<(), MeshError> {
        self.faces
            .remove(id.0)
            .ok_or(MeshError::InvalidFace { index: id.0 })?;
        self.dirty();
        Ok(())
    }

    /// Removes an edge together with every face that uses it
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<(), MeshError> {
        let edge = self
            .edges
            .remove(id.0)
            .ok_or(MeshError::InvalidEdge { index: id.0 })?;
        let [a, b] = edge.verts;
        let doomed: Vec<u32> = self
            .faces
            .iter()
            .filter(|(_, f)| f.boundary().any(|(x, y)| (x == a && y == b) || (x == b && y == a)))
            .map(|(i, _)| i)
            .collect();
        for f in doomed {
            self.faces.remove(f);
        }
        self.dirty();
        Ok(())
    }

    /// Removes a vertex together with every edge and face that uses it
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<(), MeshError> {
        self.vertices
            .remove(id.0)
            .ok_or(MeshError::InvalidVertex { index: id.0 })?;
        let faces: Vec<u32> = self
            .faces
            .iter()
            .filter(|(_, f)| f.verts.contains(&id))
            .map(|(i, _)| i)
            .collect();
        for f in faces {
            self.faces.remove(f);
        }
        let edges: Vec<u32> = self
            .edges
            .iter()
            .filter(|(_, e)| e.has_vertex(id))
            .map(|(i, _)| i)
            .collect();
        for e in edges {
            self.edges.remove(e);
        }
        self.dirty();
        Ok(())
    }

    // ------------------------------------------------------------------
    // adjacency

    /// Edges incident to `v`
    pub fn vertex_edges(&self, v: VertexId) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|(_, e)| e.has_vertex(v))
            .map(|(i, _)| EdgeId(i))
            .collect()
    }

    /// Vertices sharing an edge with `v`
    pub fn vertex_neighbors(&self, v: VertexId) -> Vec<VertexId> {
        self.edges.iter().filter_map(|(_, e)| e.other(v)).collect()
    }

    /// Faces bordering `edge`
    pub fn edge_faces(&self, edge: EdgeId) -> Vec<FaceId> {
        let Some(e) = self.edges.get(edge.0) else {
            return Vec::new();
        };
        let [a, b] = e.verts;
        self.faces
            .iter()
            .filter(|(_, f)| f.boundary().any(|(x, y)| (x == a && y == b) || (x == b && y == a)))
            .map(|(i, _)| FaceId(i))
            .collect()
    }

    /// Closest vertex to `point` within `max_distance`
    pub fn nearest_vertex(&self, point: Vec3, max_distance: f32) -> Option<(VertexId, f32)> {
        let mut best: Option<(VertexId, f32)> = None;
        for (i, v) in self.vertices.iter() {
            let d = v.position.distance(point);
            if d > max_distance {
                continue;
            }
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((VertexId(i), d));
            }
        }
        best
    }

    // ------------------------------------------------------------------
    // selection

    pub fn select_vertex(&mut self, id: VertexId, selected: bool) -> Result<(), MeshError> {
        let vertex = self
            .vertices
            .get_mut(id.0)
            .ok_or(MeshError::InvalidVertex { index: id.0 })?;
        vertex.selected = selected;
        self.dirty();
        Ok(())
    }

    pub fn selected_vertices(&self) -> Vec<VertexId> {
        self.vertices
            .iter()
            .filter(|(_, v)| v.selected)
            .map(|(i, _)| VertexId(i))
            .collect()
    }

    pub fn any_selected(&self) -> bool {
        self.vertices.iter().any(|(_, v)| v.selected)
            || self.edges.iter().any(|(_, e)| e.selected)
            || self.faces.iter().any(|(_, f)| f.selected)
    }

    fn set_all_selected(&mut self, selected: bool) {
        for (_, v) in self.vertices.iter_mut() {
            v.selected = selected;
        }
        for (_, e) in self.edges.iter_mut() {
            e.selected = selected;
        }
        for (_, f) in self.faces.iter_mut() {
            f.selected = selected;
        }
        self.dirty();
    }

    pub fn select_all(&mut self) {
        self.set_all_selected(true);
    }

    pub fn deselect_all(&mut self) {
        self.set_all_selected(false);
    }

    /// Deselects everything if anything is selected, otherwise selects everything
    pub fn select_toggle(&mut self) {
        let any = self.any_selected();
        self.set_all_selected(!any);
    }
}
