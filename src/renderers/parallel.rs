// Copyright @yucwang 2021

use crate::core::error::RenderError;
use crate::core::integrator::Integrator;
use crate::core::rng::PcgRng;
use crate::core::scene::Scene;
use crate::core::stats::{StatValue, StatsRegistry, ThreadStats};
use crate::io::image_io::{self, ImageFormat, ImageMetadata};
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;
use crate::renderers::pixel_sampler::sample_pixel;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Instant;

pub use super::renderer::Renderer;

fn check_output_path(path: &Path) -> Result<(), RenderError> {
    match ImageFormat::from_path(path) {
        Some(_) => Ok(()),
        None => Err(RenderError::io(path, "unsupported image extension")),
    }
}

/// Renders image rows on a fixed pool of scoped worker threads.
///
/// Rows are handed out from a shared queue of disjoint `&mut` row slices,
/// so each pixel has exactly one writer and the image itself needs no
/// lock. Row `y` always draws from RNG stream `y` of the scene seed, which
/// makes the output independent of the number of threads and of the order
/// rows are picked up in.
pub struct ParallelRenderer {
    integrator: Box<dyn Integrator>,
    thread_count: usize,
    show_progress: bool,
    stats: StatsRegistry,
}

impl ParallelRenderer {
    pub fn new(integrator: Box<dyn Integrator>) -> Self {
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            integrator,
            thread_count,
            show_progress: true,
            stats: StatsRegistry::new(),
        }
    }

    pub fn with_threads(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count.max(1);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Counters merged from every completed render since the last clear.
    pub fn stats(&self) -> &StatsRegistry {
        &self.stats
    }

    /// Renders `scene`, reports and clears the statistics, then writes
    /// `outfile` and, when `outfile_hdr` is non-empty, a second copy there.
    ///
    /// Nothing is written if the render fails. Output paths whose extension
    /// names no known format are rejected before any ray is traced.
    pub fn raytrace<P, Q>(&mut self,
                          scene: &Scene,
                          outfile: P,
                          outfile_hdr: Q,
                          exposure: Float) -> Result<Bitmap, RenderError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let outfile = outfile.as_ref();
        let outfile_hdr = outfile_hdr.as_ref();
        let write_hdr = !outfile_hdr.as_os_str().is_empty();
        check_output_path(outfile)?;
        if write_hdr {
            check_output_path(outfile_hdr)?;
        }

        let image = self.render(scene)?;

        info!("{}", self.stats.stats_report());
        self.stats.clear_stats();

        let metadata = ImageMetadata::for_scene(scene.description());
        info!("Writing rendered image to file \"{}\"...", outfile.display());
        image_io::save(&image, outfile, exposure, &metadata)?;

        if write_hdr {
            info!("Writing rendered image to file \"{}\"...", outfile_hdr.display());
            image_io::save(&image, outfile_hdr, exposure, &metadata)?;
        }

        info!("done!");
        Ok(image)
    }

    fn progress_bar(&self, rows: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let progress = ProgressBar::new(rows as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rows ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress
    }
}

/// Shared state every worker reads while rendering.
struct RowJob<'a> {
    integrator: &'a dyn Integrator,
    scene: &'a Scene,
    samples_per_pixel: u32,
    seed: u64,
    abort: &'a AtomicBool,
    progress: &'a ProgressBar,
}

impl RowJob<'_> {
    /// Pulls rows until the queue is empty or another worker failed.
    fn run<'img, I>(&self, queue: &Mutex<I>) -> Result<ThreadStats, RenderError>
    where
        I: Iterator<Item = (usize, &'img mut [RGBSpectrum])>,
    {
        let mut stats = ThreadStats::default();
        loop {
            if self.abort.load(Ordering::Relaxed) {
                break;
            }
            let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
            let (y, row) = match next {
                Some(unit) => unit,
                None => break,
            };

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.render_row(y, row, &mut stats)));
            match outcome {
                Ok(Ok(())) => self.progress.inc(1),
                Ok(Err(err)) => {
                    self.abort.store(true, Ordering::Relaxed);
                    return Err(err);
                }
                Err(_) => {
                    self.abort.store(true, Ordering::Relaxed);
                    return Err(RenderError::WorkerPanic { row: Some(y) });
                }
            }
        }
        Ok(stats)
    }

    fn render_row(&self, y: usize, row: &mut [RGBSpectrum], stats: &mut ThreadStats) -> Result<(), RenderError> {
        let mut rng = PcgRng::for_stream(self.seed, y as u64);
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = sample_pixel(self.integrator, self.scene, x, y,
                                  self.samples_per_pixel, &mut rng, stats)?;
        }
        Ok(())
    }
}

impl Renderer for ParallelRenderer {
    fn render(&mut self, scene: &Scene) -> Result<Bitmap, RenderError> {
        scene.validate()?;

        let (width, height) = scene.resolution();
        let thread_count = self.thread_count.min(height).max(1);
        debug!("Rendering {}x{} at {} spp on {} threads (seed {})",
               width, height, scene.samples_per_pixel(), thread_count, scene.seed());

        let progress = self.progress_bar(height);
        let abort = AtomicBool::new(false);
        let job = RowJob {
            integrator: self.integrator.as_ref(),
            scene,
            samples_per_pixel: scene.samples_per_pixel(),
            seed: scene.seed(),
            abort: &abort,
            progress: &progress,
        };

        let start = Instant::now();
        let mut image = Bitmap::new(width, height);
        let outcomes: Vec<Result<ThreadStats, RenderError>> = {
            let queue = Mutex::new(image.rows_mut().enumerate());
            thread::scope(|scope| {
                let handles: Vec<_> = (0..thread_count)
                    .map(|_| scope.spawn(|| job.run(&queue)))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or(Err(RenderError::WorkerPanic { row: None })))
                    .collect()
            })
        };
        progress.finish_and_clear();

        let mut worker_stats = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            worker_stats.push(outcome?);
        }
        self.stats.accumulate_thread_stats(worker_stats);
        self.stats.record("Render/Wall time (s)", StatValue::Float(start.elapsed().as_secs_f64()));

        info!("Rendered {}x{} in {:.2?}", width, height, start.elapsed());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::background::Background;
    use crate::core::material::{Material, ScatterResult};
    use crate::core::interaction::SurfaceIntersection;
    use crate::core::stats::RAYS_TRACED;
    use crate::core::test_scenes::{uniform_scene, wall_scene, BrokenMaterial, CountingShape, FlatSensor, Wall};
    use crate::integrators::path::PathIntegrator;
    use crate::materials::absorber::Absorber;
    use crate::materials::diffuse_light::DiffuseLight;
    use crate::materials::lambertian_diffuse::LambertianDiffuse;
    use crate::math::constants::Vector3f;
    use crate::math::ray::Ray3f;
    use crate::shapes::group::ShapeGroup;
    use crate::shapes::sphere::Sphere;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn renderer(threads: usize) -> ParallelRenderer {
        ParallelRenderer::new(Box::new(PathIntegrator::new()))
            .with_threads(threads)
            .with_progress(false)
    }

    fn assert_all_pixels(image: &Bitmap, expected: RGBSpectrum) {
        for y in 0..image.height() {
            for x in 0..image.width() {
                assert_eq!(image[(x, y)], expected, "pixel ({}, {})", x, y);
            }
        }
    }

    /// Diffuse sphere on a diffuse wall under a sky gradient.
    fn noisy_scene(seed: u64) -> Scene {
        let mut shapes = ShapeGroup::new();
        shapes.add(Box::new(Wall::new(Arc::new(LambertianDiffuse::new(RGBSpectrum::splat(0.6))))));
        shapes.add(Box::new(Sphere::new(Vector3f::new(4.0, -3.0, -0.5), 0.45,
                                        Arc::new(LambertianDiffuse::new(RGBSpectrum::new(0.8, 0.3, 0.3))))));
        Scene::new(Box::new(FlatSensor::new(9, 7)), shapes)
            .with_background(Background::Gradient {
                horizon: RGBSpectrum::splat(1.0),
                zenith: RGBSpectrum::new(0.5, 0.7, 1.0),
            })
            .with_samples_per_pixel(4)
            .with_seed(seed)
    }

    #[test]
    fn test_pure_background_fills_image() {
        let c = RGBSpectrum::new(0.3, 0.6, 0.9);
        let scene = uniform_scene(c, 2, 2, 1);
        let image = renderer(2).render(&scene).unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
        assert_all_pixels(&image, c);
    }

    #[test]
    fn test_absorbing_wall_is_black() {
        let scene = wall_scene(Arc::new(Absorber::new()), RGBSpectrum::splat(5.0), 4, 3, 2);
        let image = renderer(3).render(&scene).unwrap();
        assert_all_pixels(&image, RGBSpectrum::black());
    }

    #[test]
    fn test_emissive_wall_shows_emission() {
        let e = RGBSpectrum::new(3.0, 2.0, 1.0);
        let scene = wall_scene(Arc::new(DiffuseLight::new(e)), RGBSpectrum::splat(0.1), 5, 4, 4);
        let image = renderer(4).render(&scene).unwrap();
        assert_all_pixels(&image, e);
    }

    #[test]
    fn test_render_is_independent_of_thread_count() {
        let reference = renderer(1).render(&noisy_scene(53)).unwrap();
        for threads in [2, 3, 8, 32] {
            let image = renderer(threads).render(&noisy_scene(53)).unwrap();
            assert_eq!(image, reference, "{} threads", threads);
        }
    }

    #[test]
    fn test_render_depends_on_seed() {
        let a = renderer(2).render(&noisy_scene(1)).unwrap();
        let b = renderer(2).render(&noisy_scene(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rays_traced_matches_intersection_queries() {
        let (counting, calls) = CountingShape::new(Box::new(Wall::new(
            Arc::new(LambertianDiffuse::new(RGBSpectrum::splat(0.7))))));
        let mut shapes = ShapeGroup::new();
        shapes.add(Box::new(counting));
        let scene = Scene::new(Box::new(FlatSensor::new(6, 5)), shapes)
            .with_background(Background::Constant(RGBSpectrum::splat(1.0)))
            .with_samples_per_pixel(3);

        let mut renderer = renderer(4);
        renderer.render(&scene).unwrap();

        let totals = *renderer.stats().totals();
        assert_eq!(totals.rays_traced, calls.load(Ordering::Relaxed) as u64);
        assert_eq!(renderer.stats().report().count(RAYS_TRACED), totals.rays_traced);
        assert_eq!(totals.camera_rays, 6 * 5 * 3);
        assert_eq!(totals.pixels, 6 * 5);
        assert_eq!(totals.rays_traced, totals.camera_rays + totals.scattered_rays);
    }

    #[test]
    fn test_zero_samples_is_rejected_before_rendering() {
        let (counting, calls) = CountingShape::new(Box::new(Wall::new(Arc::new(Absorber::new()))));
        let mut shapes = ShapeGroup::new();
        shapes.add(Box::new(counting));
        let scene = Scene::new(Box::new(FlatSensor::new(2, 2)), shapes).with_samples_per_pixel(0);

        let result = renderer(2).render(&scene);
        assert!(matches!(result, Err(RenderError::Config(_))));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_trace_error_fails_whole_render() {
        let scene = wall_scene(Arc::new(BrokenMaterial), RGBSpectrum::splat(1.0), 4, 4, 1);
        let mut renderer = renderer(2);
        match renderer.render(&scene) {
            Err(RenderError::Trace { x, y, .. }) => assert!(x < 4 && y < 4),
            other => panic!("expected a trace error, got {:?}", other.map(|_| ())),
        }
        assert_eq!(renderer.stats().totals().rays_traced, 0);
    }

    struct PanickingMaterial;

    impl Material for PanickingMaterial {
        fn scatter(&self, _ray_in: &Ray3f, _hit: &SurfaceIntersection<'_>, _rng: &mut PcgRng) -> ScatterResult {
            panic!("material exploded");
        }
    }

    #[test]
    fn test_worker_panic_is_reported_with_row() {
        let scene = wall_scene(Arc::new(PanickingMaterial), RGBSpectrum::splat(1.0), 3, 3, 1);
        match renderer(2).render(&scene) {
            Err(RenderError::WorkerPanic { row: Some(row) }) => assert!(row < 3),
            other => panic!("expected a worker panic, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_raytrace_clears_stats_after_reporting() {
        let dir = std::env::temp_dir();
        let out = dir.join(format!("tracelet_raytrace_{}.exr", std::process::id()));
        let scene = uniform_scene(RGBSpectrum::splat(0.5), 2, 2, 1)
            .with_description(String::from("<scene/>"));

        let mut renderer = renderer(2);
        let image = renderer.raytrace(&scene, &out, "", 1.0).unwrap();
        assert_all_pixels(&image, RGBSpectrum::splat(0.5));
        assert!(out.exists());
        assert_eq!(*renderer.stats().totals(), ThreadStats::default());
        std::fs::remove_file(&out).unwrap();
    }

    #[test]
    fn test_failed_raytrace_writes_nothing() {
        let dir = std::env::temp_dir();
        let out = dir.join(format!("tracelet_failed_{}.png", std::process::id()));
        let hdr = dir.join(format!("tracelet_failed_{}.exr", std::process::id()));
        let scene = wall_scene(Arc::new(BrokenMaterial), RGBSpectrum::splat(1.0), 2, 2, 1);

        assert!(renderer(1).raytrace(&scene, &out, &hdr, 1.0).is_err());
        assert!(!out.exists());
        assert!(!hdr.exists());
    }

    #[test]
    fn test_unsupported_output_extension_fails_before_rendering() {
        let dir = std::env::temp_dir();
        let out = dir.join(format!("tracelet_early_{}.png", std::process::id()));
        let bad = dir.join(format!("tracelet_early_{}.xyz", std::process::id()));
        let (counting, calls) = CountingShape::new(Box::new(Wall::new(Arc::new(Absorber::new()))));
        let mut shapes = ShapeGroup::new();
        shapes.add(Box::new(counting));
        let scene = Scene::new(Box::new(FlatSensor::new(2, 2)), shapes);

        let mut renderer = renderer(2);
        for (outfile, hdr) in [(&bad, &out), (&out, &bad)] {
            match renderer.raytrace(&scene, outfile, hdr, 1.0) {
                Err(RenderError::Io { path, .. }) => assert_eq!(path, bad),
                other => panic!("expected an i/o error, got {:?}", other.map(|_| ())),
            }
        }
        assert_eq!(calls.load(Ordering::Relaxed), 0);
        assert!(!out.exists());
        assert!(!bad.exists());
        assert_eq!(*renderer.stats().totals(), ThreadStats::default());
    }
}
