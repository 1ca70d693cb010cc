// Copyright @yucwang 2026

use crate::core::error::TraceError;
use crate::core::rng::PcgRng;
use crate::core::scene::Scene;
use crate::core::stats::ThreadStats;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Deepest recursion level a path may reach; scattering at this depth is
/// not evaluated and the path keeps only its emission.
pub const MAX_DEPTH: u32 = 64;

pub trait Integrator: Sync {
    /// Radiance arriving at the origin of `ray`. `depth` is 0 for camera
    /// rays. All randomness comes from `rng` and all counting goes to
    /// `stats`; both belong to the calling worker.
    fn radiance(&self,
                scene: &Scene,
                ray: &Ray3f,
                depth: u32,
                rng: &mut PcgRng,
                stats: &mut ThreadStats) -> Result<RGBSpectrum, TraceError>;
}
