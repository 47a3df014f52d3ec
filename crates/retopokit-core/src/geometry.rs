//! Geometry primitives shared by the mesh and session crates.
//!
//! World space is right-handed; screen space is measured in pixels from the
//! bottom-left corner of the viewport.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A point in screen space (pixels)
pub type Point2D = Vec2;

/// Tolerance used when classifying points against planes
pub const PLANE_EPSILON: f32 = 1e-6;

/// A half-open ray segment `origin + t * direction` for `t` in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit-length direction
    pub direction: Vec3,
    pub min: f32,
    pub max: f32,
}

impl Ray {
    /// Creates an unbounded ray. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            min: 0.0,
            max: f32::INFINITY,
        }
    }

    /// Creates a ray from `from` towards `to` whose extent ends `max_offset`
    /// past `to` (negative offsets stop short of it).
    ///
    /// Returns `None` when the two points coincide.
    pub fn between(from: Vec3, to: Vec3, max_offset: f32) -> Option<Self> {
        let delta = to - from;
        let length = delta.length();
        if length <= f32::EPSILON {
            return None;
        }
        Some(Self {
            origin: from,
            direction: delta / length,
            min: 0.0,
            max: (length + max_offset).max(0.0),
        })
    }

    /// Returns a copy with a different maximum extent
    pub fn with_max(mut self, max: f32) -> Self {
        self.max = max;
        self
    }

    /// Point along the ray at parameter `t`
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether a hit at parameter `t` lies within the ray's extent
    pub fn contains(&self, t: f32) -> bool {
        t >= self.min && t <= self.max
    }
}

/// An infinite plane through `origin` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// Creates a plane. The normal is normalized.
    pub fn new(origin: Vec3, normal: Vec3) -> Self {
        Self {
            origin,
            normal: normal.normalize_or_zero(),
        }
    }

    /// Signed distance of `point` from the plane (positive on the normal side)
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.normal)
    }

    /// Side of the plane: 1 in front, -1 behind, 0 on the plane
    pub fn side(&self, point: Vec3) -> i8 {
        let d = self.signed_distance(point);
        if d > PLANE_EPSILON {
            1
        } else if d < -PLANE_EPSILON {
            -1
        } else {
            0
        }
    }

    /// Intersection of segment `a`-`b` with the plane, if it crosses or touches it
    pub fn segment_intersection(&self, a: Vec3, b: Vec3) -> Option<Vec3> {
        let da = self.signed_distance(a);
        let db = self.signed_distance(b);
        if da.abs() <= PLANE_EPSILON {
            return Some(a);
        }
        if db.abs() <= PLANE_EPSILON {
            return Some(b);
        }
        if (da > 0.0) == (db > 0.0) {
            return None;
        }
        let t = da / (da - db);
        Some(a.lerp(b, t))
    }

    /// Projects `point` onto the plane
    pub fn project(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.signed_distance(point)
    }
}
