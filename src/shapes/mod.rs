// Copyright @yucwang 2021

pub mod group;
pub mod rectangle;
pub mod sphere;
