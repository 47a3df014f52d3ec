//! # RetopoKit Mesh
//!
//! Mesh storage and spatial indexing for RetopoKit.
//!
//! - [`TargetMesh`]: the editable mesh, stored in index arenas so clones are
//!   independent deep copies
//! - [`SourceMesh`]: immutable reference geometry with a BVH, exposed to
//!   sessions through the [`SourceSurface`] trait
//! - plane crossing and crawling over source topology
//! - procedural primitives for headless use

pub mod arena;
pub mod bvh;
pub mod crawl;
pub mod primitives;
pub mod source;
pub mod target;

pub use arena::Arena;
pub use bvh::{Aabb, Bvh};
pub use crawl::Crossing;
pub use source::{Hit, SourceMesh, SourceSurface, TriangleData};
pub use target::{Edge, EdgeId, Face, FaceId, TargetMesh, Vertex, VertexId};
