// Copyright @yucwang 2026

use crate::core::background::Background;
use crate::core::error::RenderError;
use crate::core::interaction::SurfaceIntersection;
use crate::core::sensor::Sensor;
use crate::core::shape::Shape;
use crate::core::stats::ThreadStats;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::shapes::group::ShapeGroup;

/// Seed used when a description does not name one.
pub const DEFAULT_SEED: u64 = 53;

/// Everything a render reads. Built once, then only borrowed immutably,
/// so it can be shared by all workers without locking.
pub struct Scene {
    sensor: Box<dyn Sensor>,
    shapes: ShapeGroup,
    background: Background,
    samples_per_pixel: u32,
    seed: u64,
    description: String,
}

impl Scene {
    pub fn new(sensor: Box<dyn Sensor>, shapes: ShapeGroup) -> Self {
        Self {
            sensor,
            shapes,
            background: Background::default(),
            samples_per_pixel: 1,
            seed: DEFAULT_SEED,
            description: String::new(),
        }
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_samples_per_pixel(mut self, spp: u32) -> Self {
        self.samples_per_pixel = spp;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Source text the scene was parsed from; embedded in saved images.
    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn camera(&self) -> &dyn Sensor {
        self.sensor.as_ref()
    }

    pub fn shapes(&self) -> &ShapeGroup {
        &self.shapes
    }

    pub fn resolution(&self) -> (usize, usize) {
        self.sensor.resolution()
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Closest hit along `ray`. Counts exactly one traced ray per call.
    pub fn intersect(&self, ray: &Ray3f, stats: &mut ThreadStats) -> Option<SurfaceIntersection<'_>> {
        stats.rays_traced += 1;
        self.shapes.ray_intersection(ray)
    }

    pub fn background(&self, ray: &Ray3f) -> RGBSpectrum {
        self.background.eval(ray)
    }

    /// Rejects configurations that must not start a render.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::Config(String::from("sample count must be at least 1")));
        }
        let (width, height) = self.resolution();
        if width == 0 || height == 0 {
            return Err(RenderError::Config(format!(
                "image resolution must be positive, got {}x{}", width, height)));
        }
        Ok(())
    }
}
