// Copyright @yucwang 2021

//! Output dispatch for finished renders.
//!
//! The file extension picks the format. EXR gets linear radiance, everything
//! else gets 8-bit sRGB. EXR and PNG carry the scene description and a fixed
//! comment so a render can be reproduced from the image alone.

use crate::core::error::RenderError;
use crate::io::{exr_utils, png_utils};
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;
use crate::math::spectrum::linear_to_srgb;

use log::warn;
use std::path::Path;

pub const SCENE_KEY: &str = "scene";
pub const COMMENTS_KEY: &str = "comments";
pub const PROVENANCE_COMMENT: &str = "Rendered with tracelet";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    pub scene: String,
    pub comments: String,
}

impl ImageMetadata {
    pub fn for_scene(description: &str) -> Self {
        Self {
            scene: description.to_string(),
            comments: PROVENANCE_COMMENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Exr,
    Png,
    Jpeg,
    Bmp,
    Tga,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "exr" => Some(ImageFormat::Exr),
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "bmp" => Some(ImageFormat::Bmp),
            "tga" => Some(ImageFormat::Tga),
            _ => None,
        }
    }

    pub fn supports_metadata(&self) -> bool {
        matches!(self, ImageFormat::Exr | ImageFormat::Png)
    }
}

/// Exposure-scaled, sRGB-encoded, quantized RGB8 pixels in row-major order.
pub fn to_srgb8(image: &Bitmap, exposure: Float) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(image.pixels().len() * 3);
    for pixel in image.pixels() {
        let scaled = *pixel * exposure;
        for c in 0..3 {
            let v = linear_to_srgb(scaled[c]);
            bytes.push((v * 255.0 + 0.5).clamp(0.0, 255.0) as u8);
        }
    }
    bytes
}

/// Writes `image` to `path` in the format its extension names.
pub fn save<P: AsRef<Path>>(image: &Bitmap,
                            path: P,
                            exposure: Float,
                            metadata: &ImageMetadata) -> Result<(), RenderError> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)
        .ok_or_else(|| RenderError::io(path, "unsupported image extension"))?;

    match format {
        ImageFormat::Exr => exr_utils::write_exr_to_file(image, exposure, metadata, path),
        ImageFormat::Png => png_utils::write_png_to_file(image, exposure, metadata, path),
        _ => {
            if !format.supports_metadata() {
                warn!("{} cannot carry metadata; the scene description is not embedded.", path.display());
            }
            let bytes = to_srgb8(image, exposure);
            image::save_buffer(path, &bytes, image.width() as u32, image.height() as u32,
                               image::ColorType::Rgb8)
                .map_err(|err| RenderError::io(path, err))
        }
    }
}

/// Recovers the metadata embedded by [`save`] from an EXR or PNG file.
pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<ImageMetadata, RenderError> {
    let path = path.as_ref();
    match ImageFormat::from_path(path) {
        Some(ImageFormat::Exr) => Ok(exr_utils::read_exr_from_file(path)?.1),
        Some(ImageFormat::Png) => png_utils::read_png_metadata(path),
        _ => Err(RenderError::io(path, "format carries no metadata")),
    }
}
