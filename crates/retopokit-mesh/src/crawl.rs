//! Plane/surface intersection over a triangle mesh.
//!
//! A triangle is split by the plane when its corners fall on both sides; the
//! corners are classified with `d >= 0` so that every split triangle has
//! exactly two crossed edges. Local edge `i` runs from corner `i` to corner
//! `(i + 1) % 3`.

use glam::Vec3;
use retopokit_core::Plane;
use serde::{Deserialize, Serialize};

/// One segment of a plane/surface intersection curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crossing {
    pub from: Vec3,
    pub to: Vec3,
    /// Source triangle the segment lies on
    pub face: usize,
}

impl Crossing {
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            face: self.face,
        }
    }

    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }
}

/// Where the plane enters and leaves a triangle: `(local edge, point)` pairs
pub type FaceCrossing = [(usize, Vec3); 2];

/// Computes the two crossed edges of `tri`, if the plane splits it
pub fn face_crossing(plane: &Plane, tri: &[Vec3; 3]) -> Option<FaceCrossing> {
    let d = tri.map(|p| plane.signed_distance(p));
    let mut hits = [(0usize, Vec3::ZERO); 2];
    let mut count = 0;
    for edge in 0..3 {
        let (i, j) = (edge, (edge + 1) % 3);
        if (d[i] >= 0.0) == (d[j] >= 0.0) {
            continue;
        }
        let t = d[i] / (d[i] - d[j]);
        if count < 2 {
            hits[count] = (edge, tri[i].lerp(tri[j], t));
        }
        count += 1;
    }
    (count == 2).then_some(hits)
}

/// Face adjacency used by the walking crawl
pub trait Topology {
    fn triangle(&self, face: usize) -> [Vec3; 3];

    /// Face across local edge `edge`, if that edge has exactly two faces
    fn neighbor(&self, face: usize, edge: usize) -> Option<usize>;

    fn face_count(&self) -> usize;
}

/// Walks the intersection curve through connected faces starting at `start`.
///
/// Follows the curve in both directions until it reaches a boundary or
/// non-manifold edge, returns to the start face, or `max_steps` faces have
/// been visited. Segments are returned in curve order.
pub fn walk<T: Topology + ?Sized>(
    mesh: &T,
    plane: &Plane,
    start: usize,
    max_steps: usize,
) -> Vec<Crossing> {
    if start >= mesh.face_count() {
        return Vec::new();
    }
    let Some([(entry_edge, entry), (exit_edge, exit)]) = face_crossing(plane, &mesh.triangle(start)) else {
        return Vec::new();
    };

    let mut visited = vec![false; mesh.face_count()];
    visited[start] = true;
    let mut steps = 1;

    let mut forward = vec![Crossing {
        from: entry,
        to: exit,
        face: start,
    }];
    let closed = follow(mesh, plane, start, exit_edge, exit, &mut visited, &mut steps, max_steps, &mut forward);
    if closed {
        return forward;
    }

    let mut backward = Vec::new();
    follow(mesh, plane, start, entry_edge, entry, &mut visited, &mut steps, max_steps, &mut backward);

    backward
        .into_iter()
        .rev()
        .map(Crossing::reversed)
        .chain(forward)
        .collect()
}

/// Steps across faces from `face` through `edge`, appending segments.
/// Returns true when the curve closes back on the start face.
#[allow(clippy::too_many_arguments)]
fn follow<T: Topology + ?Sized>(
    mesh: &T,
    plane: &Plane,
    start: usize,
    mut edge: usize,
    mut point: Vec3,
    visited: &mut [bool],
    steps: &mut usize,
    max_steps: usize,
    out: &mut Vec<Crossing>,
) -> bool {
    let mut face = start;
    loop {
        let Some(next) = mesh.neighbor(face, edge) else {
            return false;
        };
        if next == start {
            return true;
        }
        if visited[next] || *steps >= max_steps {
            return false;
        }
        let Some(crossing) = face_crossing(plane, &mesh.triangle(next)) else {
            return false;
        };
        // the exit is whichever crossed edge does not lead back to `face`
        let exit = if mesh.neighbor(next, crossing[0].0) == Some(face) {
            crossing[1]
        } else {
            crossing[0]
        };

        visited[next] = true;
        *steps += 1;
        out.push(Crossing {
            from: point,
            to: exit.1,
            face: next,
        });
        face = next;
        edge = exit.0;
        point = exit.1;
    }
}
