// Copyright @yucwang 2026

use crate::core::error::{RenderError, TraceError};
use crate::core::integrator::Integrator;
use crate::core::rng::PcgRng;
use crate::core::scene::Scene;
use crate::core::stats::ThreadStats;
use crate::math::constants::{Float, Vector2f};
use crate::math::spectrum::RGBSpectrum;

/// Plain Monte Carlo estimate of pixel `(x, y)`: the average radiance of
/// `samples_per_pixel` camera rays, each jittered uniformly inside the pixel.
pub fn sample_pixel(integrator: &dyn Integrator,
                    scene: &Scene,
                    x: usize,
                    y: usize,
                    samples_per_pixel: u32,
                    rng: &mut PcgRng,
                    stats: &mut ThreadStats) -> Result<RGBSpectrum, RenderError> {
    if samples_per_pixel == 0 {
        return Err(RenderError::Config(String::from("sample count must be at least 1")));
    }

    let camera = scene.camera();
    let base = Vector2f::new(x as Float, y as Float);
    let mut color = RGBSpectrum::black();
    for _ in 0..samples_per_pixel {
        let jitter = rng.next_2d();
        let lens = rng.next_2d();
        let ray = camera.generate_ray(&(base + jitter), &lens);
        if !ray.is_finite() {
            return Err(RenderError::Trace { x, y, source: TraceError::NonFiniteCameraRay });
        }
        stats.camera_rays += 1;
        color += integrator
            .radiance(scene, &ray, 0, rng, stats)
            .map_err(|source| RenderError::Trace { x, y, source })?;
    }
    stats.pixels += 1;

    Ok(color / samples_per_pixel as Float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_scenes::{uniform_scene, wall_scene, BrokenMaterial};
    use crate::core::sensor::Sensor;
    use crate::integrators::path::PathIntegrator;
    use crate::math::constants::Vector3f;
    use crate::math::ray::Ray3f;
    use crate::shapes::group::ShapeGroup;
    use std::sync::Arc;

    #[test]
    fn test_sample_pixel_averages_constant_radiance() {
        let c = RGBSpectrum::new(0.25, 0.5, 1.0);
        let scene = uniform_scene(c, 4, 4, 8);
        let mut rng = PcgRng::new(7);
        let mut stats = ThreadStats::default();
        let l = sample_pixel(&PathIntegrator::new(), &scene, 1, 2, 8, &mut rng, &mut stats).unwrap();
        assert_eq!(l, c);
        assert_eq!(stats.camera_rays, 8);
        assert_eq!(stats.rays_traced, 8);
        assert_eq!(stats.pixels, 1);
    }

    #[test]
    fn test_sample_pixel_rejects_zero_samples() {
        let scene = uniform_scene(RGBSpectrum::splat(1.0), 1, 1, 1);
        let mut rng = PcgRng::new(7);
        let mut stats = ThreadStats::default();
        let result = sample_pixel(&PathIntegrator::new(), &scene, 0, 0, 0, &mut rng, &mut stats);
        assert!(matches!(result, Err(RenderError::Config(_))));
        assert_eq!(stats.rays_traced, 0);
    }

    #[test]
    fn test_sample_pixel_reports_failing_coordinates() {
        let scene = wall_scene(Arc::new(BrokenMaterial), RGBSpectrum::splat(1.0), 8, 8, 1);
        let mut rng = PcgRng::new(7);
        let mut stats = ThreadStats::default();
        match sample_pixel(&PathIntegrator::new(), &scene, 5, 3, 1, &mut rng, &mut stats) {
            Err(RenderError::Trace { x, y, .. }) => assert_eq!((x, y), (5, 3)),
            other => panic!("expected a trace error, got {:?}", other),
        }
    }

    struct DegenerateSensor;

    impl Sensor for DegenerateSensor {
        fn generate_ray(&self, _pixel: &Vector2f, _lens: &Vector2f) -> Ray3f {
            Ray3f::new(Vector3f::zeros(), Vector3f::zeros(), None, None)
        }

        fn resolution(&self) -> (usize, usize) {
            (2, 2)
        }
    }

    #[test]
    fn test_sample_pixel_rejects_non_finite_camera_ray() {
        let scene = Scene::new(Box::new(DegenerateSensor), ShapeGroup::new());
        let mut rng = PcgRng::new(7);
        let mut stats = ThreadStats::default();
        match sample_pixel(&PathIntegrator::new(), &scene, 1, 0, 4, &mut rng, &mut stats) {
            Err(RenderError::Trace { x, y, source }) => {
                assert_eq!((x, y), (1, 0));
                assert!(matches!(source, TraceError::NonFiniteCameraRay));
            }
            other => panic!("expected a trace error, got {:?}", other),
        }
        assert_eq!(stats.camera_rays, 0);
        assert_eq!(stats.rays_traced, 0);
    }

    #[test]
    fn test_sample_pixel_is_deterministic_for_a_stream() {
        use crate::materials::lambertian_diffuse::LambertianDiffuse;
        let scene = wall_scene(Arc::new(LambertianDiffuse::new(RGBSpectrum::splat(0.5))),
                               RGBSpectrum::new(1.0, 0.5, 0.25), 4, 4, 16);
        let run = || {
            let mut rng = PcgRng::for_stream(53, 2);
            let mut stats = ThreadStats::default();
            sample_pixel(&PathIntegrator::new(), &scene, 2, 2, 16, &mut rng, &mut stats).unwrap()
        };
        assert_eq!(run(), run());
    }
}
