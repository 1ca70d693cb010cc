// Copyright @yucwang 2026

use super::reflect;
use crate::core::interaction::SurfaceIntersection;
use crate::core::material::{Material, ScatterResult};
use crate::core::rng::PcgRng;
use crate::math::constants::{EPSILON, Float};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::sample_uniform_ball;

/// Mirror reflection perturbed inside a ball of radius `roughness`.
pub struct Metal {
    albedo: RGBSpectrum,
    roughness: Float,
}

impl Metal {
    pub fn new(albedo: RGBSpectrum, roughness: Float) -> Self {
        Self { albedo, roughness: roughness.max(0.0).min(1.0) }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray3f, hit: &SurfaceIntersection<'_>, rng: &mut PcgRng) -> ScatterResult {
        let mut direction = reflect(&ray_in.dir(), &hit.normal());
        if self.roughness > 0.0 {
            let u = rng.next_2d();
            direction += sample_uniform_ball(&u, rng.next_f32()) * self.roughness;
        }

        // Fuzz pushed the direction below the surface.
        if direction.dot(&hit.normal()) <= 0.0 {
            return ScatterResult::Absorbed;
        }

        ScatterResult::Scattered {
            ray: Ray3f::new(hit.p(), direction, Some(EPSILON), None),
            attenuation: self.albedo,
        }
    }
}
