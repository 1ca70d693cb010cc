// Copyright @yucwang 2021

pub mod parallel;
pub mod pixel_sampler;
pub mod renderer;
