// Copyright @yucwang 2023

use crate::core::interaction::SurfaceIntersection;
use crate::core::material::{Material, ScatterResult};
use crate::core::rng::PcgRng;
use crate::math::constants::EPSILON;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::sample_uniform_sphere;

pub struct LambertianDiffuse {
    albedo: RGBSpectrum
}

impl Material for LambertianDiffuse {
    // normal + uniform unit vector gives a cosine-weighted direction, so the
    // attenuation is just the albedo.
    fn scatter(&self, _ray_in: &Ray3f, hit: &SurfaceIntersection<'_>, rng: &mut PcgRng) -> ScatterResult {
        let n = hit.normal();
        let mut direction = n + sample_uniform_sphere(&rng.next_2d());
        if direction.norm_squared() < 1e-8 {
            direction = n;
        }

        ScatterResult::Scattered {
            ray: Ray3f::new(hit.p(), direction, Some(EPSILON), None),
            attenuation: self.albedo,
        }
    }
}

impl LambertianDiffuse {
    pub fn new(albedo: RGBSpectrum) -> Self {
        Self { albedo }
    }
}
