//! Pointer hit-testing against the on-screen button.

use crate::config::ButtonConfig;
use crate::math::{add, scale, Vec3};

/// Picking ray from the camera through the click point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Axis-aligned rectangle in the plane z = `center.z`, hit from either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonRect {
    pub center: Vec3,
    pub half_width: f32,
    pub half_height: f32,
}

impl ButtonRect {
    pub fn from_config(config: &ButtonConfig) -> Self {
        Self {
            center: config.center,
            half_width: config.width / 2.0,
            half_height: config.height / 2.0,
        }
    }

    /// Distance along the ray to the button, if the ray crosses it in front of the origin.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        if ray.direction.z.abs() < 1e-6 {
            return None;
        }
        let t = (self.center.z - ray.origin.z) / ray.direction.z;
        if t < 0.0 {
            return None;
        }
        let p = add(ray.origin, scale(ray.direction, t));
        let inside = (p.x - self.center.x).abs() <= self.half_width
            && (p.y - self.center.y).abs() <= self.half_height;
        inside.then_some(t)
    }

    pub fn hit(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }
}
