// Copyright @yucwang 2021

use crate::core::error::RenderError;
use crate::io::image_io::{to_srgb8, ImageMetadata, COMMENTS_KEY, SCENE_KEY};
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Writes an 8-bit sRGB PNG with the metadata stored in iTXt chunks.
pub fn write_png_to_file(image: &Bitmap,
                         exposure: Float,
                         metadata: &ImageMetadata,
                         file_path: &Path) -> Result<(), RenderError> {
    log::info!("Starting writing png image: {}.", file_path.display());

    let io_err = |err: png::EncodingError| RenderError::io(file_path, err);
    let file = File::create(file_path).map_err(|err| RenderError::io(file_path, err))?;

    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width() as u32, image.height() as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.add_itxt_chunk(SCENE_KEY.to_string(), metadata.scene.clone()).map_err(io_err)?;
    encoder.add_itxt_chunk(COMMENTS_KEY.to_string(), metadata.comments.clone()).map_err(io_err)?;

    let mut writer = encoder.write_header().map_err(io_err)?;
    writer.write_image_data(&to_srgb8(image, exposure)).map_err(io_err)?;
    writer.finish().map_err(io_err)
}

pub fn read_png_metadata(file_path: &Path) -> Result<ImageMetadata, RenderError> {
    let file = File::open(file_path).map_err(|err| RenderError::io(file_path, err))?;
    let reader = png::Decoder::new(file)
        .read_info()
        .map_err(|err| RenderError::io(file_path, err))?;

    let mut metadata = ImageMetadata::default();
    let info = reader.info();
    for chunk in &info.utf8_text {
        let text = chunk.get_text().map_err(|err| RenderError::io(file_path, err))?;
        match chunk.keyword.as_str() {
            SCENE_KEY => metadata.scene = text,
            COMMENTS_KEY => metadata.comments = text,
            _ => {}
        }
    }
    for chunk in &info.uncompressed_latin1_text {
        match chunk.keyword.as_str() {
            SCENE_KEY if metadata.scene.is_empty() => metadata.scene = chunk.text.clone(),
            COMMENTS_KEY if metadata.comments.is_empty() => metadata.comments = chunk.text.clone(),
            _ => {}
        }
    }
    Ok(metadata)
}
