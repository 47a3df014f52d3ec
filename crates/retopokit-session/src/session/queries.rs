//! Spatial queries answered against the session's sources and viewpoint.

use glam::Vec3;
use retopokit_core::{Plane, Point2D, Ray};
use retopokit_mesh::Hit;

use super::Session;
use crate::crawl::{Crawl, PlaneCrawler};
use crate::query::QueryAggregator;

impl Session {
    fn query(&self) -> QueryAggregator<'_> {
        QueryAggregator::new(&self.sources)
    }

    pub fn raycast(&self, ray: &Ray) -> Option<Hit> {
        self.query().raycast(ray)
    }

    pub fn raycast_all(&self, ray: Ray) -> impl Iterator<Item = Hit> + '_ {
        self.query().raycast_all(ray)
    }

    pub fn raycast_from_screen(&self, xy: Option<Point2D>) -> Option<Hit> {
        self.query()
            .raycast_from_screen(self.host.viewpoint.as_ref(), xy)
    }

    pub fn raycast_all_from_screen(&self, xy: Option<Point2D>) -> impl Iterator<Item = Hit> + '_ {
        self.query()
            .raycast_all_from_screen(self.host.viewpoint.as_ref(), xy)
    }

    /// Raycast through the screen position of a world point
    pub fn raycast_point(&self, point: Vec3) -> Option<Hit> {
        self.query()
            .raycast_point(self.host.viewpoint.as_ref(), point)
    }

    /// Raycast under the current pointer position
    pub fn raycast_pointer(&self) -> Option<Hit> {
        self.raycast_from_screen(self.actions.mouse())
    }

    pub fn nearest_point(&self, point: Vec3, max_distance: f32) -> Option<Hit> {
        self.query().nearest_point(point, max_distance)
    }

    pub fn is_visible(&self, point: Vec3, normal: Option<Vec3>) -> bool {
        self.query().is_visible(
            self.host.viewpoint.as_ref(),
            self.actions.size(),
            point,
            normal,
        )
    }

    pub fn single_crawl(&self, ray: &Ray, plane: &Plane, walk: bool) -> Crawl<'_> {
        PlaneCrawler::new(&self.sources).single_crawl(ray, plane, walk)
    }

    pub fn all_crawl(&self, plane: &Plane) -> Crawl<'_> {
        PlaneCrawler::new(&self.sources).all_crawl(plane)
    }

    pub(super) fn update_pointer_hit(&mut self) {
        self.pointer_hit = self.raycast_pointer().map(|hit| (hit.point, hit.normal));
    }
}
