// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// A ray segment `origin + t * dir` restricted to `[min_t, max_t]`.
///
/// The direction is normalized on construction and the ray is never
/// mutated afterwards; narrowing the segment produces a new ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
    min_t: Float,
    max_t: Float
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f,
               min_t: Option<Float>, max_t: Option<Float>) -> Self {
        Self { origin: o, dir: d.normalize(),
               min_t: min_t.unwrap_or(0.0),
               max_t: max_t.unwrap_or(Float::MAX) }
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn min_t(&self) -> Float {
        self.min_t
    }

    pub fn max_t(&self) -> Float {
        self.max_t
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    /// Same ray with the far end of the segment moved to `t`.
    pub fn with_max_t(&self, t: Float) -> Self {
        Self { max_t: t, ..*self }
    }

    pub fn test_segment(&self, t: Float) -> bool {
        t >= self.min_t && t <= self.max_t
    }

    /// False when a degenerate direction (zero length or NaN input) slipped in.
    pub fn is_finite(&self) -> bool {
        self.origin.iter().all(|c| c.is_finite()) && self.dir.iter().all(|c| c.is_finite())
    }
}

/* Tests for Ray */
