// Copyright @yucwang 2026

pub mod absorber;
pub mod dielectric;
pub mod diffuse_light;
pub mod lambertian_diffuse;
pub mod metal;

use crate::math::constants::Vector3f;

pub(crate) fn reflect(v: &Vector3f, n: &Vector3f) -> Vector3f {
    v - n * (2.0 * v.dot(n))
}

#[cfg(test)]
mod tests {
    use super::absorber::Absorber;
    use super::lambertian_diffuse::LambertianDiffuse;
    use super::metal::Metal;
    use crate::core::interaction::SurfaceIntersection;
    use crate::core::material::{Material, ScatterResult};
    use crate::core::rng::PcgRng;
    use crate::math::constants::{Vector2f, Vector3f};
    use crate::math::ray::Ray3f;
    use crate::math::spectrum::RGBSpectrum;

    fn incoming() -> Ray3f {
        Ray3f::new(Vector3f::new(1.0, 1.0, 0.0), Vector3f::new(-1.0, -1.0, 0.0), None, None)
    }

    fn hit_floor<'a>(ray: &Ray3f, material: &'a dyn Material) -> SurfaceIntersection<'a> {
        SurfaceIntersection::new(ray, 2.0_f32.sqrt(), Vector3f::new(0.0, 1.0, 0.0), Vector2f::zeros(), material)
    }

    #[test]
    fn test_lambertian_scatters_above_surface() {
        let material = LambertianDiffuse::new(RGBSpectrum::splat(0.5));
        let ray = incoming();
        let hit = hit_floor(&ray, &material);
        let mut rng = PcgRng::new(3);
        for _ in 0..256 {
            match material.scatter(&ray, &hit, &mut rng) {
                ScatterResult::Scattered { ray, attenuation } => {
                    assert!(ray.dir().y >= 0.0);
                    assert_eq!(attenuation, RGBSpectrum::splat(0.5));
                }
                ScatterResult::Absorbed => panic!("lambertian never absorbs"),
            }
        }
    }

    #[test]
    fn test_smooth_metal_is_a_mirror() {
        let material = Metal::new(RGBSpectrum::splat(0.9), 0.0);
        let ray = incoming();
        let hit = hit_floor(&ray, &material);
        let mut rng = PcgRng::new(3);
        match material.scatter(&ray, &hit, &mut rng) {
            ScatterResult::Scattered { ray, .. } => {
                let expected = Vector3f::new(-1.0, 1.0, 0.0).normalize();
                assert!((ray.dir() - expected).norm() < 1e-5);
            }
            ScatterResult::Absorbed => panic!("mirror reflection was absorbed"),
        }
    }

    #[test]
    fn test_absorber_absorbs() {
        let material = Absorber::new();
        let ray = incoming();
        let hit = hit_floor(&ray, &material);
        let mut rng = PcgRng::new(3);
        assert!(material.scatter(&ray, &hit, &mut rng).is_absorbed());
        assert!(material.emitted(&hit).is_black());
    }
}
