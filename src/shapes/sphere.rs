// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::material::Material;
use crate::core::shape::Shape;
use crate::math::constants::{Float, PI, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

use std::sync::Arc;

pub struct Sphere {
    center: Vector3f,
    radius: Float,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Negative radii are clamped to zero.
    pub fn new(center: Vector3f, radius: Float, material: Arc<dyn Material>) -> Self {
        Self { center, radius: radius.max(0.0), material }
    }

    fn uv(&self, n: &Vector3f) -> Vector2f {
        let phi = n.z.atan2(n.x) + PI;
        let theta = n.y.max(-1.0).min(1.0).acos();
        Vector2f::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Shape for Sphere {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection<'_>> {
        let oc = self.center - ray.origin();
        // Direction is unit length, so a == 1.
        let h = ray.dir().dot(&oc);
        let c = oc.norm_squared() - self.radius * self.radius;
        let discriminant = h * h - c;
        if discriminant < 0.0 || self.radius <= 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let mut root = h - sqrtd;
        if !ray.test_segment(root) {
            root = h + sqrtd;
            if !ray.test_segment(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        let uv = self.uv(&outward_normal);
        Some(SurfaceIntersection::new(ray, root, outward_normal, uv, self.material.as_ref()))
    }

    fn describe(&self) -> String {
        format!("Sphere [center={:?}, radius={}, material={}]",
                self.center.as_slice(), self.radius, self.material.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::absorber::Absorber;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vector3f::new(0.0, 0.0, -3.0), 1.0, Arc::new(Absorber::new()))
    }

    #[test]
    fn test_sphere_hit_from_outside() {
        let sphere = unit_sphere();
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0), Some(1e-4), None);
        let hit = sphere.ray_intersection(&ray).expect("expected intersection");
        assert!((hit.t() - 2.0).abs() < 1e-5);
        assert!(hit.front_face());
        assert!((hit.normal() - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_inside_flips_normal() {
        let sphere = unit_sphere();
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, -3.0), Vector3f::new(1.0, 0.0, 0.0), Some(1e-4), None);
        let hit = sphere.ray_intersection(&ray).expect("expected intersection");
        assert!((hit.t() - 1.0).abs() < 1e-5);
        assert!(!hit.front_face());
        assert!(hit.normal().dot(&ray.dir()) < 0.0);
    }

    #[test]
    fn test_sphere_miss_and_segment() {
        let sphere = unit_sphere();
        let miss = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None);
        assert!(sphere.ray_intersection(&miss).is_none());

        let short = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0), None, Some(1.5));
        assert!(sphere.ray_intersection(&short).is_none());
    }
}
