// Copyright @yucwang 2023

use crate::core::interaction::SurfaceIntersection;
use crate::math::ray::Ray3f;

pub trait Shape: Send + Sync {
    /// Closest hit inside the ray's `[min_t, max_t]` segment.
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection<'_>>;

    fn describe(&self) -> String {
        String::from("Shape")
    }
}
