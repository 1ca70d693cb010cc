// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::material::{Material, ScatterResult};
use crate::core::rng::PcgRng;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Emits `radiance` from both sides and never scatters.
pub struct DiffuseLight {
    radiance: RGBSpectrum,
}

impl DiffuseLight {
    pub fn new(radiance: RGBSpectrum) -> Self {
        Self { radiance }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray3f, _hit: &SurfaceIntersection<'_>, _rng: &mut PcgRng) -> ScatterResult {
        ScatterResult::Absorbed
    }

    fn emitted(&self, _hit: &SurfaceIntersection<'_>) -> RGBSpectrum {
        self.radiance
    }
}
