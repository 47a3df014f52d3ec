use glam::{Mat4, Vec2, Vec3};
use retopokit_core::{Point2D, Ray};

use crate::host::Viewpoint;

/// A perspective camera looking from `eye` at `target`, Z-up.
///
/// Screen coordinates are pixels from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveView {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov: f32, // degrees
    pub near: f32,
    pub far: f32,
    pub viewport: Vec2,
}

impl Default for PerspectiveView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, -10.0, 0.0),
            target: Vec3::ZERO,
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
            viewport: Vec2::new(800.0, 600.0),
        }
    }
}

impl PerspectiveView {
    pub fn new(eye: Vec3, target: Vec3, width: f32, height: f32) -> Self {
        Self {
            eye,
            target,
            viewport: Vec2::new(width, height),
            ..Default::default()
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    pub fn get_view_matrix(&self) -> Mat4 {
        let forward = (self.target - self.eye).normalize_or_zero();
        // looking straight up or down: fall back to Y as up
        let up = if forward.cross(Vec3::Z).length_squared() < 0.001 {
            Vec3::Y
        } else {
            Vec3::Z
        };
        Mat4::look_at_rh(self.eye, self.target, up)
    }

    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect_ratio(), self.near, self.far)
    }

    fn view_projection(&self) -> Mat4 {
        self.get_projection_matrix() * self.get_view_matrix()
    }
}

impl Viewpoint for PerspectiveView {
    fn screen_point_to_ray(&self, xy: Point2D) -> Option<Ray> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        let ndc = xy / self.viewport * 2.0 - Vec2::ONE;
        let inverse = self.view_projection().inverse();
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = far - self.eye;
        if !direction.is_finite() || direction.length_squared() <= f32::EPSILON {
            return None;
        }
        Some(Ray::new(self.eye, direction))
    }

    fn world_point_to_screen(&self, point: Vec3) -> Option<Point2D> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some((ndc.truncate() + Vec2::ONE) * 0.5 * self.viewport)
    }
}
