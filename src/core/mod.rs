// Copyright @yucwang 2021

pub mod background;
pub mod error;
pub mod integrator;
pub mod interaction;
pub mod material;
pub mod rng;
pub mod scene;
pub mod scene_loader;
pub mod sensor;
pub mod shape;
pub mod stats;

#[cfg(test)]
pub mod test_scenes;
