// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::warp::sample_uniform_disk_concentric;

/// Pinhole or thin-lens perspective camera.
pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
    lens_radius: Float,
    focus_distance: Float,
    width: usize,
    height: usize,
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_degrees: Float,
               width: usize,
               height: usize) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();
        let aspect = if height > 0 { width as Float / height as Float } else { 1.0 };

        Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_degrees.to_radians()).tan(),
            aspect,
            lens_radius: 0.0,
            focus_distance: 1.0,
            width,
            height,
        }
    }

    /// Enables depth of field. An aperture of zero keeps the pinhole model.
    pub fn with_lens(mut self, aperture: Float, focus_distance: Float) -> Self {
        self.lens_radius = 0.5 * aperture.max(0.0);
        if focus_distance > 0.0 {
            self.focus_distance = focus_distance;
        }
        self
    }
}

impl Sensor for PerspectiveCamera {
    fn generate_ray(&self, pixel: &Vector2f, lens: &Vector2f) -> Ray3f {
        let u = pixel.x / self.width.max(1) as Float;
        let v = pixel.y / self.height.max(1) as Float;
        let px = (2.0 * u - 1.0) * self.aspect * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * v) * self.tan_half_fov_y;

        let on_focus_plane = self.origin
            + (self.right * px + self.up * py + self.forward) * self.focus_distance;

        let origin = if self.lens_radius > 0.0 {
            let d = sample_uniform_disk_concentric(lens) * self.lens_radius;
            self.origin + self.right * d.x + self.up * d.y
        } else {
            self.origin
        };

        Ray3f::new(origin, on_focus_plane - origin, None, None)
    }

    fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn describe(&self) -> String {
        format!("PerspectiveCamera [{}x{}, origin={:?}, forward={:?}, lens_radius={}, focus_distance={}]",
                self.width, self.height, self.origin.as_slice(), self.forward.as_slice(),
                self.lens_radius, self.focus_distance)
    }
}
