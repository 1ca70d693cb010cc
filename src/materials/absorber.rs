// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::material::{Material, ScatterResult};
use crate::core::rng::PcgRng;
use crate::math::ray::Ray3f;

/// Black body: absorbs every incoming path and emits nothing.
#[derive(Debug, Default)]
pub struct Absorber;

impl Absorber {
    pub fn new() -> Self {
        Absorber
    }
}

impl Material for Absorber {
    fn scatter(&self, _ray_in: &Ray3f, _hit: &SurfaceIntersection<'_>, _rng: &mut PcgRng) -> ScatterResult {
        ScatterResult::Absorbed
    }
}
