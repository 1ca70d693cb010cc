// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::material::Material;
use crate::core::shape::Shape;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

use std::sync::Arc;

/// Parallelogram spanned by `edge_u` and `edge_v` from `corner`.
pub struct Rectangle {
    corner: Vector3f,
    edge_u: Vector3f,
    edge_v: Vector3f,
    normal: Vector3f,
    // n / (n . n) for the unnormalized n = edge_u x edge_v; projects onto
    // the edge coordinates.
    w: Vector3f,
    area: Float,
    material: Arc<dyn Material>,
}

impl Rectangle {
    pub fn new(corner: Vector3f, edge_u: Vector3f, edge_v: Vector3f, material: Arc<dyn Material>) -> Self {
        let n = edge_u.cross(&edge_v);
        let area = n.norm();
        let (normal, w) = if area > 0.0 {
            (n / area, n / n.dot(&n))
        } else {
            (Vector3f::zeros(), Vector3f::zeros())
        };

        Self { corner, edge_u, edge_v, normal, w, area, material }
    }

    fn intersect_local(&self, ray: &Ray3f) -> Option<(Float, Vector2f)> {
        let denom = self.normal.dot(&ray.dir());
        if denom.abs() < EPSILON || self.area <= 0.0 {
            return None;
        }

        let t = self.normal.dot(&(self.corner - ray.origin())) / denom;
        if !ray.test_segment(t) {
            return None;
        }

        let d = ray.at(t) - self.corner;
        let alpha = self.w.dot(&d.cross(&self.edge_v));
        let beta = self.w.dot(&self.edge_u.cross(&d));
        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return None;
        }

        Some((t, Vector2f::new(alpha, beta)))
    }
}

impl Shape for Rectangle {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection<'_>> {
        let (t, uv) = self.intersect_local(ray)?;
        Some(SurfaceIntersection::new(ray, t, self.normal, uv, self.material.as_ref()))
    }

    fn describe(&self) -> String {
        format!("Rectangle [corner={:?}, area={}, material={}]",
                self.corner.as_slice(), self.area, self.material.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::absorber::Absorber;

    fn floor() -> Rectangle {
        Rectangle::new(
            Vector3f::new(-1.0, 0.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Arc::new(Absorber::new()),
        )
    }

    #[test]
    fn test_rectangle_hit_center() {
        let rect = floor();
        let ray = Ray3f::new(Vector3f::new(0.0, 2.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), Some(1e-4), None);
        let hit = rect.ray_intersection(&ray).expect("expected intersection");
        assert!((hit.t() - 2.0).abs() < 1e-5);
        assert!((hit.uv() - Vector2f::new(0.5, 0.5)).norm() < 1e-5);
        assert!(hit.normal().dot(&ray.dir()) < 0.0);
    }

    #[test]
    fn test_rectangle_miss_outside_edges() {
        let rect = floor();
        let ray = Ray3f::new(Vector3f::new(1.5, 2.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), None, None);
        assert!(rect.ray_intersection(&ray).is_none());
    }

    #[test]
    fn test_rectangle_parallel_ray_misses() {
        let rect = floor();
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0), None, None);
        assert!(rect.ray_intersection(&ray).is_none());
    }
}
