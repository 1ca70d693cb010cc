/* Copyright 2020 @TwoCookingMice */

use crate::core::error::RenderError;
use crate::io::image_io::{ImageMetadata, COMMENTS_KEY, SCENE_KEY};
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

use exr::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::result::Result;

/// EXR text attributes are byte strings. Each UTF-8 byte is stored as one
/// Latin-1 character so any text survives the trip.
fn to_exr_text(value: &str) -> Text {
    let bytes: String = value.bytes().map(char::from).collect();
    Text::from(bytes.as_str())
}

/// Inverse of [`to_exr_text`]. Attributes written by other tools that are
/// not valid UTF-8 are read as plain Latin-1.
fn from_exr_text(text: &Text) -> String {
    let latin1 = text.to_string();
    let bytes: Vec<u8> = latin1.chars().map(|c| c as u32 as u8).collect();
    String::from_utf8(bytes).unwrap_or(latin1)
}

fn text_attribute(attributes: &HashMap<Text, AttributeValue>, key: &str) -> Option<String> {
    match attributes.get(&Text::from(key)) {
        Some(AttributeValue::Text(text)) => Some(from_exr_text(text)),
        _ => None,
    }
}

// Write EXR Image to file
pub fn write_exr_to_file(image: &Bitmap,
                         exposure: Float,
                         metadata: &ImageMetadata,
                         file_path: &Path) -> Result<(), RenderError> {
    log::info!("Starting writing openexr images: {}.", file_path.display());

    let width = image.width();
    let mut attributes = LayerAttributes::default();
    attributes.comments = Some(to_exr_text(&metadata.comments));
    attributes.other.insert(Text::from(SCENE_KEY), AttributeValue::Text(to_exr_text(&metadata.scene)));

    let layer = Layer::new(
        (width, image.height()),
        attributes,
        Encoding::FAST_LOSSLESS,
        SpecificChannels::rgb(|position: Vec2<usize>| {
            let pixel = image.pixels()[position.y() * width + position.x()] * exposure;
            pixel.to_tuple()
        }),
    );

    Image::from_layer(layer)
        .write()
        .to_file(file_path)
        .map_err(|err| RenderError::io(file_path, err))
}

// Read EXR Image from file
pub fn read_exr_from_file(file_path: &Path) -> Result<(Bitmap, ImageMetadata), RenderError> {
    log::info!("Starting reading OpenEXR image from: {}.", file_path.display());

    let image = read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _| Bitmap::new(resolution.width(), resolution.height()),
            |bitmap: &mut Bitmap, position, (r, g, b, _): (f32, f32, f32, f32)| {
                bitmap[(position.x(), position.y())] = RGBSpectrum::new(r, g, b);
            },
        )
        .first_valid_layer()
        .all_attributes()
        .from_file(file_path)
        .map_err(|err| RenderError::io(file_path, err))?;

    let layer_attributes = &image.layer_data.attributes;
    let shared = &image.attributes.other;
    let scene = text_attribute(&layer_attributes.other, SCENE_KEY)
        .or_else(|| text_attribute(shared, SCENE_KEY))
        .unwrap_or_default();
    let comments = layer_attributes
        .comments
        .as_ref()
        .map(from_exr_text)
        .or_else(|| text_attribute(&layer_attributes.other, COMMENTS_KEY))
        .or_else(|| text_attribute(shared, COMMENTS_KEY))
        .unwrap_or_default();

    let bitmap = image.layer_data.channel_data.pixels;
    log::info!("OpenEXR loaded, width = {}, height = {}.", bitmap.width(), bitmap.height());
    Ok((bitmap, ImageMetadata { scene, comments }))
}
