// Copyright @yucwang 2026

use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Radiance arriving along rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Constant(RGBSpectrum),
    /// Blend from `horizon` (direction y = -1) to `zenith` (y = +1).
    Gradient { horizon: RGBSpectrum, zenith: RGBSpectrum },
}

impl Default for Background {
    fn default() -> Self {
        Background::Constant(RGBSpectrum::black())
    }
}

impl Background {
    pub fn eval(&self, ray: &Ray3f) -> RGBSpectrum {
        match self {
            Background::Constant(color) => *color,
            Background::Gradient { horizon, zenith } => {
                let t = 0.5 * (ray.dir().y + 1.0);
                *horizon * (1.0 - t) + *zenith * t
            }
        }
    }
}
