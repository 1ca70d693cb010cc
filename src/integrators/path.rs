// Copyright @yucwang 2026

use crate::core::error::TraceError;
use crate::core::integrator::{Integrator, MAX_DEPTH};
use crate::core::material::ScatterResult;
use crate::core::rng::PcgRng;
use crate::core::scene::Scene;
use crate::core::stats::ThreadStats;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Unidirectional path tracer with a hard depth bound.
///
/// A path ends when it leaves the scene (background), when the material
/// absorbs it, or when it reaches `max_depth`. Truncated paths drop their
/// unscattered continuation, which biases the estimate slightly low for
/// very deep light transport.
pub struct PathIntegrator {
    max_depth: u32,
}

impl Default for PathIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl PathIntegrator {
    pub fn new() -> Self {
        Self { max_depth: MAX_DEPTH }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

impl Integrator for PathIntegrator {
    fn radiance(&self,
                scene: &Scene,
                ray: &Ray3f,
                depth: u32,
                rng: &mut PcgRng,
                stats: &mut ThreadStats) -> Result<RGBSpectrum, TraceError> {
        let hit = match scene.intersect(ray, stats) {
            Some(hit) => hit,
            None => {
                stats.background_hits += 1;
                return Ok(scene.background(ray));
            }
        };

        let material = hit.material();
        let emitted = material.emitted(&hit);

        if depth >= self.max_depth {
            stats.depth_truncated_paths += 1;
            return Ok(emitted);
        }

        match material.scatter(ray, &hit, rng) {
            ScatterResult::Absorbed => {
                stats.absorbed_paths += 1;
                Ok(emitted)
            }
            ScatterResult::Scattered { ray: scattered, attenuation } => {
                if !scattered.is_finite() {
                    return Err(TraceError::NonFiniteDirection { material: material.name(), depth });
                }
                if !attenuation.is_finite() {
                    return Err(TraceError::NonFiniteAttenuation { material: material.name(), depth });
                }
                if attenuation.has_negative() {
                    return Err(TraceError::NegativeAttenuation { material: material.name(), depth });
                }

                stats.scattered_rays += 1;
                let incoming = self.radiance(scene, &scattered, depth + 1, rng, stats)?;
                Ok(emitted + attenuation * incoming)
            }
        }
    }
}
