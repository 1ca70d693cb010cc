// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::math::ray::Ray3f;

/// Linear list of shapes answering closest-hit queries.
#[derive(Default)]
pub struct ShapeGroup {
    shapes: Vec<Box<dyn Shape>>,
}

impl ShapeGroup {
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    pub fn add(&mut self, shape: Box<dyn Shape>) {
        self.shapes.push(shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Shape for ShapeGroup {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection<'_>> {
        let mut closest: Option<SurfaceIntersection<'_>> = None;
        let mut segment = *ray;
        for shape in &self.shapes {
            if let Some(hit) = shape.ray_intersection(&segment) {
                segment = segment.with_max_t(hit.t());
                closest = Some(hit);
            }
        }
        closest
    }

    fn describe(&self) -> String {
        let mut out = format!("ShapeGroup [{} shapes]", self.shapes.len());
        for shape in &self.shapes {
            out.push_str("\n  ");
            out.push_str(&shape.describe());
        }
        out
    }
}
