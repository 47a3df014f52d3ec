//! Spatial queries fanned out over every source surface.
//!
//! Every single-result query shares one reduction: keep the hit with the
//! strictly smallest distance, never let a miss replace a kept hit, and on
//! equal distances keep the hit found first.

use glam::{Vec2, Vec3};
use retopokit_core::{Point2D, Ray, SourceId};
use retopokit_mesh::Hit;

use crate::host::Viewpoint;
use crate::sources::SourceSet;

/// Line-of-sight rays stop this far short of the tested point
pub const VISIBILITY_OFFSET: f32 = -0.001;

/// Reduces per-source results to the nearest hit
pub fn reduce_nearest<I>(results: I) -> Option<(SourceId, Hit)>
where
    I: IntoIterator<Item = (SourceId, Option<Hit>)>,
{
    let mut best: Option<(SourceId, Hit)> = None;
    for (source, hit) in results {
        let Some(hit) = hit else {
            continue;
        };
        if best.map_or(true, |(_, b)| hit.distance < b.distance) {
            best = Some((source, hit));
        }
    }
    best
}

/// Query front end over a [`SourceSet`]
#[derive(Clone, Copy)]
pub struct QueryAggregator<'a> {
    sources: &'a SourceSet,
}

impl<'a> QueryAggregator<'a> {
    pub fn new(sources: &'a SourceSet) -> Self {
        Self { sources }
    }

    /// Nearest hit along `ray` together with the source that owns it
    pub fn raycast_with_source(&self, ray: &Ray) -> Option<(SourceId, Hit)> {
        reduce_nearest(self.sources.iter().map(|(id, s)| (id, s.raycast(ray))))
    }

    /// Nearest hit along `ray` across all sources
    pub fn raycast(&self, ray: &Ray) -> Option<Hit> {
        self.raycast_with_source(ray).map(|(_, hit)| hit)
    }

    /// Every hit along `ray` across all sources, unordered.
    ///
    /// Sources are queried as the iterator is consumed.
    pub fn raycast_all(&self, ray: Ray) -> impl Iterator<Item = Hit> + 'a {
        self.sources
            .iter()
            .flat_map(move |(_, s)| s.raycast_all(&ray))
    }

    /// Raycast from a screen point; `None` when the point is unmapped
    pub fn raycast_from_screen(&self, view: &dyn Viewpoint, xy: Option<Point2D>) -> Option<Hit> {
        let ray = view.screen_point_to_ray(xy?)?;
        self.raycast(&ray)
    }

    /// Every hit under a screen point; empty when the point is unmapped
    pub fn raycast_all_from_screen(
        &self,
        view: &dyn Viewpoint,
        xy: Option<Point2D>,
    ) -> impl Iterator<Item = Hit> + 'a {
        let ray = xy.and_then(|xy| view.screen_point_to_ray(xy));
        let sources = self.sources;
        ray.into_iter().flat_map(move |ray| {
            sources
                .iter()
                .flat_map(move |(_, s)| s.raycast_all(&ray))
                .collect::<Vec<_>>()
        })
    }

    /// Projects a world point to the screen, then raycasts through it
    pub fn raycast_point(&self, view: &dyn Viewpoint, point: Vec3) -> Option<Hit> {
        self.raycast_from_screen(view, view.world_point_to_screen(point))
    }

    /// Nearest surface point within `max_distance` across all sources
    pub fn nearest_point(&self, point: Vec3, max_distance: f32) -> Option<Hit> {
        reduce_nearest(
            self.sources
                .iter()
                .map(|(id, s)| (id, s.nearest(point, max_distance))),
        )
        .map(|(_, hit)| hit)
        // a source may pad its own limit; the aggregate never does
        .filter(|hit| hit.distance <= max_distance)
    }

    /// Whether `point` is on screen, unobstructed and (when a normal is
    /// given) facing the viewer
    pub fn is_visible(
        &self,
        view: &dyn Viewpoint,
        viewport: Vec2,
        point: Vec3,
        normal: Option<Vec3>,
    ) -> bool {
        let Some(xy) = view.world_point_to_screen(point) else {
            return false;
        };
        if xy.x < 0.0 || xy.x > viewport.x || xy.y < 0.0 || xy.y > viewport.y {
            return false;
        }
        let Some(ray) = view.point_to_ray(point, VISIBILITY_OFFSET) else {
            return false;
        };
        if normal.is_some_and(|n| n.dot(ray.direction) >= 0.0) {
            return false;
        }
        !self.sources.iter().any(|(_, s)| s.raycast_hit(&ray))
    }
}
