// Copyright @yucwang 2023

use crate::core::interaction::SurfaceIntersection;
use crate::core::rng::PcgRng;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Outcome of asking a material to continue a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScatterResult {
    Scattered { ray: Ray3f, attenuation: RGBSpectrum },
    Absorbed,
}

impl ScatterResult {
    pub fn is_absorbed(&self) -> bool {
        matches!(self, ScatterResult::Absorbed)
    }
}

pub trait Material: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Randomness must come from `rng`, the calling worker's stream.
    fn scatter(&self, ray_in: &Ray3f, hit: &SurfaceIntersection<'_>, rng: &mut PcgRng) -> ScatterResult;

    fn emitted(&self, _hit: &SurfaceIntersection<'_>) -> RGBSpectrum {
        RGBSpectrum::black()
    }
}
