//! Bounding volume hierarchy over the triangles of a source mesh.
//!
//! Raycasts, nearest-point and plane queries run on every pointer move, so
//! each one descends the tree and prunes subtrees by their bounding boxes
//! instead of testing every triangle.

use glam::Vec3;
use retopokit_core::{Plane, Ray, PLANE_EPSILON};
use smallvec::SmallVec;

/// Default number of triangles stored in a leaf
pub const DEFAULT_MAX_LEAF_SIZE: usize = 8;

const RAY_EPSILON: f32 = 1e-7;

/// Axis-aligned bounding box for BVH nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// An inverted box that any expansion overwrites
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn from_triangle(tri: &[Vec3; 3]) -> Self {
        Self {
            min: tri[0].min(tri[1]).min(tri[2]),
            max: tri[0].max(tri[1]).max(tri[2]),
        }
    }

    pub fn expand(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Index of the longest axis (0=X, 1=Y, 2=Z)
    pub fn longest_axis(&self) -> usize {
        let d = self.max - self.min;
        if d.x >= d.y && d.x >= d.z {
            0
        } else if d.y >= d.z {
            1
        } else {
            2
        }
    }

    /// Parametric interval where `ray` is inside the box, clipped to the
    /// ray's own extent
    pub fn ray_interval(&self, ray: &Ray) -> Option<(f32, f32)> {
        let mut t_min = ray.min;
        let mut t_max = ray.max;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            if dir.abs() < RAY_EPSILON {
                // parallel to this slab
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let mut t0 = (self.min[axis] - origin) * inv;
            let mut t1 = (self.max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some((t_min, t_max))
    }

    /// Euclidean distance from `point` to the box (0 inside)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        let clamped = point.max(self.min).min(self.max);
        clamped.distance(point)
    }

    /// Whether the plane passes through the box
    pub fn straddles_plane(&self, plane: &Plane) -> bool {
        let center = self.center();
        let half = (self.max - self.min) * 0.5;
        let radius = half.dot(plane.normal.abs());
        plane.signed_distance(center).abs() <= radius + PLANE_EPSILON
    }
}

/// BVH node containing either leaf triangles or child nodes.
#[derive(Debug, Clone)]
pub enum BvhNode {
    Leaf {
        bbox: Aabb,
        triangles: SmallVec<[u32; 8]>,
    },
    Internal {
        bbox: Aabb,
        left: Box<Self>,
        right: Box<Self>,
    },
}

impl BvhNode {
    pub fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Bounding volume hierarchy for a triangle list.
///
/// The tree stores triangle indices only; every query takes the triangle
/// positions it was built from.
#[derive(Debug, Clone)]
pub struct Bvh {
    root: Option<BvhNode>,
    triangle_count: usize,
}

impl Bvh {
    pub fn build(triangles: &[[Vec3; 3]], max_leaf_size: usize) -> Self {
        if triangles.is_empty() {
            return Self {
                root: None,
                triangle_count: 0,
            };
        }

        let boxes: Vec<(u32, Aabb)> = triangles
            .iter()
            .enumerate()
            .map(|(i, tri)| (i as u32, Aabb::from_triangle(tri)))
            .collect();
        let indices: Vec<usize> = (0..boxes.len()).collect();
        let root = Self::build_recursive(&boxes, indices, max_leaf_size.max(1));

        Self {
            root: Some(root),
            triangle_count: triangles.len(),
        }
    }

    fn build_recursive(boxes: &[(u32, Aabb)], indices: Vec<usize>, max_leaf_size: usize) -> BvhNode {
        let mut bbox = Aabb::empty();
        for &i in &indices {
            bbox.expand(&boxes[i].1);
        }

        if indices.len() <= max_leaf_size {
            return BvhNode::Leaf {
                bbox,
                triangles: indices.iter().map(|&i| boxes[i].0).collect(),
            };
        }

        // median split along the longest axis
        let axis = bbox.longest_axis();
        let mut sorted = indices;
        sorted.sort_by(|&a, &b| {
            let ca = boxes[a].1.center()[axis];
            let cb = boxes[b].1.center()[axis];
            ca.total_cmp(&cb)
        });
        let right_half = sorted.split_off(sorted.len() / 2);

        BvhNode::Internal {
            bbox,
            left: Box::new(Self::build_recursive(boxes, sorted, max_leaf_size)),
            right: Box::new(Self::build_recursive(boxes, right_half, max_leaf_size)),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.root.as_ref().map(|r| *r.bbox())
    }

    /// Closest triangle hit along `ray` as `(triangle, t)`
    pub fn raycast(&self, ray: &Ray, triangles: &[[Vec3; 3]]) -> Option<(u32, f32)> {
        let root = self.root.as_ref()?;
        let mut best: Option<(u32, f32)> = None;
        Self::raycast_node(root, ray, triangles, &mut best);
        best
    }

    fn raycast_node(node: &BvhNode, ray: &Ray, triangles: &[[Vec3; 3]], best: &mut Option<(u32, f32)>) {
        let Some((t_enter, _)) = node.bbox().ray_interval(ray) else {
            return;
        };
        if let Some((_, best_t)) = best {
            if t_enter > *best_t {
                return;
            }
        }
        match node {
            BvhNode::Leaf { triangles: ids, .. } => {
                for &id in ids {
                    let Some(t) = ray_triangle_intersect(ray, &triangles[id as usize]) else {
                        continue;
                    };
                    if best.map_or(true, |(_, bt)| t < bt) {
                        *best = Some((id, t));
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                Self::raycast_node(left, ray, triangles, best);
                Self::raycast_node(right, ray, triangles, best);
            }
        }
    }

    /// Every triangle hit along `ray`, sorted by distance
    pub fn raycast_all(&self, ray: &Ray, triangles: &[[Vec3; 3]]) -> Vec<(u32, f32)> {
        let mut hits = Vec::new();
        if let Some(root) = &self.root {
            Self::raycast_all_node(root, ray, triangles, &mut hits);
        }
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }

    fn raycast_all_node(node: &BvhNode, ray: &Ray, triangles: &[[Vec3; 3]], hits: &mut Vec<(u32, f32)>) {
        if node.bbox().ray_interval(ray).is_none() {
            return;
        }
        match node {
            BvhNode::Leaf { triangles: ids, .. } => {
                hits.extend(
                    ids.iter()
                        .filter_map(|&id| ray_triangle_intersect(ray, &triangles[id as usize]).map(|t| (id, t))),
                );
            }
            BvhNode::Internal { left, right, .. } => {
                Self::raycast_all_node(left, ray, triangles, hits);
                Self::raycast_all_node(right, ray, triangles, hits);
            }
        }
    }

    /// Closest surface point to `point` no farther than `max_distance`,
    /// as `(triangle, point, distance)`
    pub fn nearest(&self, point: Vec3, max_distance: f32, triangles: &[[Vec3; 3]]) -> Option<(u32, Vec3, f32)> {
        let root = self.root.as_ref()?;
        let mut best: Option<(u32, Vec3, f32)> = None;
        let mut limit = max_distance;
        Self::nearest_node(root, point, triangles, &mut limit, &mut best);
        best
    }

    fn nearest_node(
        node: &BvhNode,
        point: Vec3,
        triangles: &[[Vec3; 3]],
        limit: &mut f32,
        best: &mut Option<(u32, Vec3, f32)>,
    ) {
        if node.bbox().distance_to_point(point) > *limit {
            return;
        }
        match node {
            BvhNode::Leaf { triangles: ids, .. } => {
                for &id in ids {
                    let closest = closest_point_on_triangle(point, &triangles[id as usize]);
                    let d = closest.distance(point);
                    if d > *limit {
                        continue;
                    }
                    if best.map_or(true, |(_, _, bd)| d < bd) {
                        *best = Some((id, closest, d));
                        *limit = d;
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                // visit the nearer child first so the limit tightens sooner
                let dl = left.bbox().distance_to_point(point);
                let dr = right.bbox().distance_to_point(point);
                let (first, second) = if dl <= dr { (left, right) } else { (right, left) };
                Self::nearest_node(first, point, triangles, limit, best);
                Self::nearest_node(second, point, triangles, limit, best);
            }
        }
    }

    /// Triangles whose boxes the plane passes through, in index order
    pub fn plane_candidates(&self, plane: &Plane, triangles: &[[Vec3; 3]]) -> Vec<u32> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            Self::plane_node(root, plane, triangles, &mut out);
        }
        out.sort_unstable();
        out
    }

    fn plane_node(node: &BvhNode, plane: &Plane, triangles: &[[Vec3; 3]], out: &mut Vec<u32>) {
        if !node.bbox().straddles_plane(plane) {
            return;
        }
        match node {
            BvhNode::Leaf { triangles: ids, .. } => out.extend(
                ids.iter()
                    .copied()
                    .filter(|&id| Aabb::from_triangle(&triangles[id as usize]).straddles_plane(plane)),
            ),
            BvhNode::Internal { left, right, .. } => {
                Self::plane_node(left, plane, triangles, out);
                Self::plane_node(right, plane, triangles, out);
            }
        }
    }
}

/// Möller–Trumbore ray/triangle intersection. Returns the ray parameter of
/// the hit when it lies within the ray's extent.
pub fn ray_triangle_intersect(ray: &Ray, tri: &[Vec3; 3]) -> Option<f32> {
    let edge1 = tri[1] - tri[0];
    let edge2 = tri[2] - tri[0];

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < RAY_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - tri[0];
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > RAY_EPSILON && ray.contains(t)).then_some(t)
}

/// Closest point on a triangle to `p` (Ericson, Real-Time Collision Detection 5.1.5)
pub fn closest_point_on_triangle(p: Vec3, tri: &[Vec3; 3]) -> Vec3 {
    let [a, b, c] = *tri;
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
    }

    let denom = 1.0 / (va + vb + vc);
    a + ab * (vb * denom) + ac * (vc * denom)
}
