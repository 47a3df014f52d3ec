//! Source meshes: immutable reference surfaces the target is drawn onto.

use std::collections::HashMap;

use glam::Vec3;
use retopokit_core::{MeshError, Plane, Ray};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bvh::{Bvh, DEFAULT_MAX_LEAF_SIZE};
use crate::crawl::{self, Crossing, Topology};

/// A surface hit reported by a spatial query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub point: Vec3,
    pub normal: Vec3,
    /// Triangle index within the source
    pub face: usize,
    /// Ray parameter for raycasts, Euclidean distance for nearest queries
    pub distance: f32,
}

/// Spatial interface every source surface offers to a session.
///
/// Implementations are read-only for the lifetime of a session.
pub trait SourceSurface {
    fn name(&self) -> &str;

    /// Closest hit along `ray`
    fn raycast(&self, ray: &Ray) -> Option<Hit>;

    /// Every hit along `ray`
    fn raycast_all(&self, ray: &Ray) -> Vec<Hit>;

    /// Whether anything lies along `ray`
    fn raycast_hit(&self, ray: &Ray) -> bool {
        self.raycast(ray).is_some()
    }

    /// Closest surface point to `point` no farther than `max_distance`
    fn nearest(&self, point: Vec3, max_distance: f32) -> Option<Hit>;

    /// Every intersection segment of `plane` with this surface, for a crawl
    /// that started from `ray`
    fn plane_intersection_crawl(&self, ray: &Ray, plane: &Plane) -> Vec<Crossing> {
        let _ = ray;
        self.plane_intersections_crawl(plane)
    }

    /// Intersection curve of `plane` walked through connected topology from
    /// the face hit by `ray`
    fn plane_intersection_walk_crawl(&self, ray: &Ray, plane: &Plane) -> Vec<Crossing>;

    /// Every intersection segment of `plane` with this surface
    fn plane_intersections_crawl(&self, plane: &Plane) -> Vec<Crossing>;
}

/// Indexed triangle soup used to build a [`SourceMesh`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleData {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleData {
    /// Applies a uniform scale then a translation to every position
    pub fn transformed(mut self, scale: f32, offset: Vec3) -> Self {
        for p in &mut self.positions {
            *p = *p * scale + offset;
        }
        self
    }
}

/// An immutable triangle mesh with its own BVH
#[derive(Debug, Clone)]
pub struct SourceMesh {
    name: String,
    triangles: Vec<[Vec3; 3]>,
    normals: Vec<Vec3>,
    neighbors: Vec<[Option<u32>; 3]>,
    bvh: Bvh,
    max_crawl_steps: usize,
}

impl SourceMesh {
    pub fn new(name: impl Into<String>, data: TriangleData) -> Result<Self, MeshError> {
        let name = name.into();
        if data.triangles.is_empty() {
            return Err(MeshError::InvalidSource {
                reason: format!("{} has no triangles", name),
            });
        }
        let vertex_count = data.positions.len();
        let mut triangles = Vec::with_capacity(data.triangles.len());
        for (f, tri) in data.triangles.iter().enumerate() {
            if let Some(bad) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::InvalidSource {
                    reason: format!("triangle {} references missing vertex {}", f, bad),
                });
            }
            triangles.push(tri.map(|i| data.positions[i as usize]));
        }

        let normals = triangles
            .iter()
            .map(|t| (t[1] - t[0]).cross(t[2] - t[0]).normalize_or_zero())
            .collect();
        let neighbors = build_neighbors(&data.triangles);
        let bvh = Bvh::build(&triangles, DEFAULT_MAX_LEAF_SIZE);
        debug!(source = %name, triangles = triangles.len(), "built source mesh");

        Ok(Self {
            name,
            max_crawl_steps: triangles.len(),
            triangles,
            normals,
            neighbors,
            bvh,
        })
    }

    /// Caps the number of faces a walking crawl may visit
    pub fn with_max_crawl_steps(mut self, steps: usize) -> Self {
        self.max_crawl_steps = steps.max(1);
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn face_normal(&self, face: usize) -> Option<Vec3> {
        self.normals.get(face).copied()
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    fn hit(&self, face: u32, point: Vec3, distance: f32) -> Hit {
        Hit {
            point,
            normal: self.normals[face as usize],
            face: face as usize,
            distance,
        }
    }
}

/// Per-face neighbor across each local edge. Edges shared by anything other
/// than exactly two faces have no neighbor.
fn build_neighbors(triangles: &[[u32; 3]]) -> Vec<[Option<u32>; 3]> {
    let mut by_edge: HashMap<(u32, u32), Vec<(usize, usize)>> = HashMap::new();
    for (f, tri) in triangles.iter().enumerate() {
        for e in 0..3 {
            let (a, b) = (tri[e], tri[(e + 1) % 3]);
            by_edge.entry((a.min(b), a.max(b))).or_default().push((f, e));
        }
    }

    let mut neighbors = vec![[None; 3]; triangles.len()];
    for faces in by_edge.values() {
        if let &[(f0, e0), (f1, e1)] = faces.as_slice() {
            neighbors[f0][e0] = Some(f1 as u32);
            neighbors[f1][e1] = Some(f0 as u32);
        }
    }
    neighbors
}

impl Topology for SourceMesh {
    fn triangle(&self, face: usize) -> [Vec3; 3] {
        self.triangles[face]
    }

    fn neighbor(&self, face: usize, edge: usize) -> Option<usize> {
        self.neighbors
            .get(face)
            .and_then(|n| n[edge])
            .map(|f| f as usize)
    }

    fn face_count(&self) -> usize {
        self.triangles.len()
    }
}

impl SourceSurface for SourceMesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn raycast(&self, ray: &Ray) -> Option<Hit> {
        let (face, t) = self.bvh.raycast(ray, &self.triangles)?;
        Some(self.hit(face, ray.point_at(t), t))
    }

    fn raycast_all(&self, ray: &Ray) -> Vec<Hit> {
        self.bvh
            .raycast_all(ray, &self.triangles)
            .into_iter()
            .map(|(face, t)| self.hit(face, ray.point_at(t), t))
            .collect()
    }

    fn nearest(&self, point: Vec3, max_distance: f32) -> Option<Hit> {
        let (face, closest, d) = self.bvh.nearest(point, max_distance, &self.triangles)?;
        Some(self.hit(face, closest, d))
    }

    fn plane_intersection_walk_crawl(&self, ray: &Ray, plane: &Plane) -> Vec<Crossing> {
        let Some(hit) = self.raycast(ray) else {
            return Vec::new();
        };
        crawl::walk(self, plane, hit.face, self.max_crawl_steps)
    }

    fn plane_intersections_crawl(&self, plane: &Plane) -> Vec<Crossing> {
        self.bvh
            .plane_candidates(plane, &self.triangles)
            .into_iter()
            .filter_map(|face| {
                let face = face as usize;
                crawl::face_crossing(plane, &self.triangles[face]).map(|[(_, from), (_, to)]| Crossing {
                    from,
                    to,
                    face,
                })
            })
            .collect()
    }
}
