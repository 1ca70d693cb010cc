// Copyright @yucwang 2023

use super::constants::{ PI, Float, Vector2f, Vector3f };

pub fn sample_uniform_sphere(u: &Vector2f) -> Vector3f {
    let z: Float = 1.0 - 2.0 * u.x;
    let r: Float = (1.0 - z * z).max(0.0).sqrt();
    let phi: Float = 2.0 * PI * u.y;

    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Maps the unit square onto the unit disk, keeping strata adjacent.
pub fn sample_uniform_disk_concentric(u: &Vector2f) -> Vector2f {
    let r1: Float = 2.0 * u.x - 1.0;
    let r2: Float = 2.0 * u.y - 1.0;

    let phi: Float;
    let r:   Float;

    if r1 == 0. && r2 == 0. {
        r = 0.0;
        phi = 0.0;
    } else if r1 * r1 > r2 * r2 {
        r = r1;
        phi = (PI / 4.0) * (r2 / r1);
    } else {
        r = r2;
        phi = (PI / 2.0) - (r1 / r2) * (PI / 4.0);
    }

    let (sin_phi, cos_phi) = phi.sin_cos();

    Vector2f::new(r * cos_phi, r * sin_phi)
}

/// Uniform point inside the unit ball.
pub fn sample_uniform_ball(u: &Vector2f, u_radius: Float) -> Vector3f {
    sample_uniform_sphere(u) * u_radius.cbrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sphere_is_unit() {
        for i in 0..16 {
            for j in 0..16 {
                let u = Vector2f::new(i as Float / 16.0, j as Float / 16.0);
                assert!((sample_uniform_sphere(&u).norm() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_concentric_disk_stays_inside() {
        for i in 0..=10 {
            for j in 0..=10 {
                let u = Vector2f::new(i as Float / 10.0, j as Float / 10.0);
                assert!(sample_uniform_disk_concentric(&u).norm() <= 1.0 + 1e-5);
            }
        }
        let center = sample_uniform_disk_concentric(&Vector2f::new(0.5, 0.5));
        assert_eq!(center, Vector2f::new(0.0, 0.0));
    }

    #[test]
    fn test_uniform_ball_stays_inside() {
        let p = sample_uniform_ball(&Vector2f::new(0.3, 0.8), 0.999);
        assert!(p.norm() < 1.0);
    }
}
