// Copyright @yucwang 2026

//! Small hand-built scenes and mock collaborators shared by unit tests.

use crate::core::background::Background;
use crate::core::interaction::SurfaceIntersection;
use crate::core::material::{Material, ScatterResult};
use crate::core::rng::PcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::core::shape::Shape;
use crate::math::constants::{Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::shapes::group::ShapeGroup;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Orthographic camera looking down -z; raster (x, y) maps to world (x, -y).
pub struct FlatSensor {
    width: usize,
    height: usize,
}

impl FlatSensor {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

impl Sensor for FlatSensor {
    fn generate_ray(&self, pixel: &Vector2f, _lens: &Vector2f) -> Ray3f {
        Ray3f::new(Vector3f::new(pixel.x, -pixel.y, 0.0), Vector3f::new(0.0, 0.0, -1.0), None, None)
    }

    fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

/// Infinite plane z = -1 facing +z; fills the view of a [`FlatSensor`].
pub struct Wall {
    material: Arc<dyn Material>,
}

impl Wall {
    pub fn new(material: Arc<dyn Material>) -> Self {
        Self { material }
    }
}

impl Shape for Wall {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection<'_>> {
        let dz = ray.dir().z;
        if dz.abs() < 1e-6 {
            return None;
        }
        let t = (-1.0 - ray.origin().z) / dz;
        if !ray.test_segment(t) {
            return None;
        }
        Some(SurfaceIntersection::new(ray, t, Vector3f::new(0.0, 0.0, 1.0), Vector2f::zeros(), self.material.as_ref()))
    }
}

/// Wraps a shape and counts how often it is queried.
pub struct CountingShape {
    inner: Box<dyn Shape>,
    calls: Arc<AtomicUsize>,
}

impl CountingShape {
    pub fn new(inner: Box<dyn Shape>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Self { inner, calls: Arc::clone(&calls) }, calls)
    }
}

impl Shape for CountingShape {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection<'_>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.ray_intersection(ray)
    }
}

/// Reflects straight back along the normal with a fixed attenuation.
pub struct Bouncer {
    pub attenuation: RGBSpectrum,
    pub emission: RGBSpectrum,
}

impl Material for Bouncer {
    fn scatter(&self, _ray_in: &Ray3f, hit: &SurfaceIntersection<'_>, _rng: &mut PcgRng) -> ScatterResult {
        ScatterResult::Scattered {
            ray: Ray3f::new(hit.p(), hit.normal(), Some(1e-4), None),
            attenuation: self.attenuation,
        }
    }

    fn emitted(&self, _hit: &SurfaceIntersection<'_>) -> RGBSpectrum {
        self.emission
    }
}

/// Hands back a degenerate scattered ray.
pub struct BrokenMaterial;

impl Material for BrokenMaterial {
    fn scatter(&self, _ray_in: &Ray3f, hit: &SurfaceIntersection<'_>, _rng: &mut PcgRng) -> ScatterResult {
        ScatterResult::Scattered {
            ray: Ray3f::new(hit.p(), Vector3f::zeros(), None, None),
            attenuation: RGBSpectrum::splat(1.0),
        }
    }
}

pub fn uniform_scene(background: RGBSpectrum, width: usize, height: usize, spp: u32) -> Scene {
    Scene::new(Box::new(FlatSensor::new(width, height)), ShapeGroup::new())
        .with_background(Background::Constant(background))
        .with_samples_per_pixel(spp)
}

pub fn wall_scene(material: Arc<dyn Material>, background: RGBSpectrum,
                  width: usize, height: usize, spp: u32) -> Scene {
    let mut shapes = ShapeGroup::new();
    shapes.add(Box::new(Wall::new(material)));
    Scene::new(Box::new(FlatSensor::new(width, height)), shapes)
        .with_background(Background::Constant(background))
        .with_samples_per_pixel(spp)
}
