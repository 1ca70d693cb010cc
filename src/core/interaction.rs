// Copyright @yucwang 2023

use crate::core::material::Material;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::ray::Ray3f;

/// Closest-hit record. Borrows the material from the scene, so it cannot
/// outlive the render that produced it.
#[derive(Clone, Copy)]
pub struct SurfaceIntersection<'a> {
    p: Vector3f,
    normal: Vector3f,
    front_face: bool,
    uv: Vector2f,
    t: Float,
    material: &'a dyn Material,
}

impl<'a> SurfaceIntersection<'a> {
    /// `outward_normal` must be unit length. The stored normal is flipped
    /// to face against `ray`.
    pub fn new(ray: &Ray3f,
               t: Float,
               outward_normal: Vector3f,
               uv: Vector2f,
               material: &'a dyn Material) -> Self {
        let front_face = ray.dir().dot(&outward_normal) < 0.0;
        let normal = if front_face { outward_normal } else { -outward_normal };
        Self { p: ray.at(t), normal, front_face, uv, t, material }
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn uv(&self) -> Vector2f {
        self.uv
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    pub fn front_face(&self) -> bool {
        self.front_face
    }

    pub fn material(&self) -> &'a dyn Material {
        self.material
    }
}

impl std::fmt::Debug for SurfaceIntersection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceIntersection")
            .field("p", &self.p)
            .field("normal", &self.normal)
            .field("front_face", &self.front_face)
            .field("t", &self.t)
            .field("material", &self.material.name())
            .finish()
    }
}
