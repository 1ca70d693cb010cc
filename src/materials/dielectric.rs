// Copyright @yucwang 2026

use super::reflect;
use crate::core::interaction::SurfaceIntersection;
use crate::core::material::{Material, ScatterResult};
use crate::core::rng::PcgRng;
use crate::math::constants::{EPSILON, Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Smooth glass-like interface. Chooses reflection or refraction
/// stochastically by Schlick's Fresnel approximation.
pub struct Dielectric {
    ior: Float,
}

impl Dielectric {
    pub fn new(ior: Float) -> Self {
        Self { ior }
    }
}

fn refract(uv: &Vector3f, n: &Vector3f, eta: Float) -> Vector3f {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = (uv + n * cos_theta) * eta;
    let r_out_parallel = n * -(1.0 - r_out_perp.norm_squared()).abs().sqrt();
    r_out_perp + r_out_parallel
}

fn schlick(cosine: Float, eta: Float) -> Float {
    let r0 = (1.0 - eta) / (1.0 + eta);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray3f, hit: &SurfaceIntersection<'_>, rng: &mut PcgRng) -> ScatterResult {
        let eta = if hit.front_face() { 1.0 / self.ior } else { self.ior };
        let dir = ray_in.dir();
        let n = hit.normal();

        let cos_theta = (-dir).dot(&n).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let cannot_refract = eta * sin_theta > 1.0;

        let direction = if cannot_refract || schlick(cos_theta, eta) > rng.next_f32() {
            reflect(&dir, &n)
        } else {
            refract(&dir, &n, eta)
        };

        ScatterResult::Scattered {
            ray: Ray3f::new(hit.p(), direction, Some(EPSILON), None),
            attenuation: RGBSpectrum::splat(1.0),
        }
    }
}
