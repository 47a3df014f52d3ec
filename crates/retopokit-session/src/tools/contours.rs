use glam::{Vec2, Vec3};
use retopokit_core::{Plane, ToolError, ToolResult};
use retopokit_mesh::VertexId;
use tracing::debug;

use crate::actions::names;
use crate::session::Session;
use crate::tool::Tool;

/// Closed curves whose ends are this close count as loops
const CLOSE_EPSILON: f32 = 1e-4;

/// Cuts the source under the pointer with a view-aligned plane and turns the
/// cut into a target edge loop
#[derive(Debug)]
pub struct Contours {
    /// Vertices per created loop
    pub count: usize,
}

impl Default for Contours {
    fn default() -> Self {
        Self { count: 16 }
    }
}

impl Contours {
    pub const NAME: &'static str = "Contours";
}

impl Tool for Contours {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn help(&self) -> &str {
        "insert: cut a horizontal contour through the surface under the pointer"
    }

    fn modal(&mut self, session: &mut Session) -> ToolResult {
        if !session.actions().pressed(names::INSERT) {
            return Ok(());
        }
        let Some(xy) = session.actions().mouse() else {
            return Ok(());
        };
        let view = session.viewpoint();
        let (Some(ray), Some(right)) = (
            view.screen_point_to_ray(xy),
            view.screen_point_to_ray(xy + Vec2::X),
        ) else {
            return Ok(());
        };
        let Some(hit) = session.raycast(&ray) else {
            return Ok(());
        };

        // contains the view ray and the screen's horizontal axis
        let normal = ray.direction.cross(right.direction - ray.direction);
        if normal.length_squared() <= f32::EPSILON * f32::EPSILON {
            return Err(ToolError::assertion("degenerate contour plane"));
        }
        let plane = Plane::new(hit.point, normal);

        let points: Vec<Vec3> = {
            let mut crawl = session.single_crawl(&ray, &plane, true).peekable();
            let Some(first) = crawl.peek().map(|s| s.from) else {
                return Ok(());
            };
            std::iter::once(first).chain(crawl.map(|s| s.to)).collect()
        };
        let closed = points.len() > 2
            && points
                .first()
                .zip(points.last())
                .is_some_and(|(a, b)| a.distance(*b) < CLOSE_EPSILON);
        let samples = resample(&points, self.count, closed);
        if samples.len() < 2 {
            return Ok(());
        }

        session.undo_push("contours", false);
        let normals: Vec<Vec3> = samples
            .iter()
            .map(|&p| session.nearest_point(p, 1e-2).map_or(hit.normal, |h| h.normal))
            .collect();
        let target = session.target_mut();
        target.deselect_all();
        let verts: Vec<VertexId> = samples
            .iter()
            .zip(normals)
            .map(|(&p, n)| target.add_vertex(p, n))
            .collect();
        for pair in verts.windows(2) {
            target.add_edge(pair[0], pair[1])?;
        }
        if closed {
            if let (Some(&first), Some(&last)) = (verts.first(), verts.last()) {
                target.add_edge(last, first)?;
            }
        }
        for &v in &verts {
            target.select_vertex(v, true)?;
        }
        debug!(vertices = verts.len(), closed, "contour created");
        Ok(())
    }
}

/// Resamples a polyline to `count` points evenly spaced by arc length.
///
/// A closed polyline (first point repeated at the end) yields `count`
/// distinct points around the loop; an open one keeps both end points.
fn resample(points: &[Vec3], count: usize, closed: bool) -> Vec<Vec3> {
    if points.len() < 2 || count < 2 {
        return points.to_vec();
    }
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    cumulative.push(0.0);
    for pair in points.windows(2) {
        total += pair[0].distance(pair[1]);
        cumulative.push(total);
    }
    if total <= f32::EPSILON {
        return vec![points[0]];
    }

    let step = if closed {
        total / count as f32
    } else {
        total / (count - 1) as f32
    };
    let mut out = Vec::with_capacity(count);
    let mut segment = 0;
    for i in 0..count {
        let s = (step * i as f32).min(total);
        while segment + 2 < cumulative.len() && cumulative[segment + 1] < s {
            segment += 1;
        }
        let (s0, s1) = (cumulative[segment], cumulative[segment + 1]);
        let t = if s1 > s0 { (s - s0) / (s1 - s0) } else { 0.0 };
        out.push(points[segment].lerp(points[segment + 1], t));
    }
    out
}
