// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Per-worker random source.
///
/// Never shared between threads: every unit of work builds its own stream
/// with [`PcgRng::for_stream`], so results only depend on the base seed and
/// the unit index.
pub struct PcgRng {
    inner: Pcg32,
}

impl PcgRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: Pcg32::seed_from_u64(seed) }
    }

    /// Stream `stream` derived from `base_seed`. Distinct stream ids select
    /// distinct PCG increments and scrambled start states.
    pub fn for_stream(base_seed: u64, stream: u64) -> Self {
        let state = splitmix64(base_seed ^ splitmix64(stream));
        Self { inner: Pcg32::new(state, stream) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.inner.gen()
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> Float {
        self.inner.gen::<Float>()
    }

    pub fn next_2d(&mut self) -> Vector2f {
        let u = self.next_f32();
        let v = self.next_f32();
        Vector2f::new(u, v)
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
