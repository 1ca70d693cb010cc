// Copyright @yucwang 2026

use crate::math::constants::Vector2f;
use crate::math::ray::Ray3f;

/// Camera model: turns a continuous raster position plus a lens sample into
/// a world-space ray.
pub trait Sensor: Send + Sync {
    /// `pixel` is in raster units, `(0, 0)` the top-left corner of the image.
    /// `lens` is uniform in `[0, 1)^2`.
    fn generate_ray(&self, pixel: &Vector2f, lens: &Vector2f) -> Ray3f;
    fn resolution(&self) -> (usize, usize);
    fn describe(&self) -> String {
        String::from("Sensor")
    }
}
