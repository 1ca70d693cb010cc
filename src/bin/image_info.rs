use tracelet::io::exr_utils::read_exr_from_file;
use tracelet::io::image_io::{read_metadata, ImageFormat, ImageMetadata};
use std::path::Path;

fn print_metadata(metadata: &ImageMetadata) {
    println!("Comments: {}", metadata.comments);
    println!("Scene description ({} bytes):", metadata.scene.len());
    println!("{}", metadata.scene);
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image.exr|image.png>", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if ImageFormat::from_path(path) != Some(ImageFormat::Exr) {
        let metadata = read_metadata(path)
            .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
        print_metadata(&metadata);
        return;
    }

    let (img, metadata) = read_exr_from_file(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));

    let mut min = (f32::INFINITY, f32::INFINITY, f32::INFINITY);
    let mut max = (f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
    let mut sum = (0.0f64, 0.0f64, 0.0f64);

    for pixel in img.pixels() {
        let (r, g, b) = pixel.to_tuple();
        min = (min.0.min(r), min.1.min(g), min.2.min(b));
        max = (max.0.max(r), max.1.max(g), max.2.max(b));
        sum.0 += r as f64;
        sum.1 += g as f64;
        sum.2 += b as f64;
    }

    let n = img.pixels().len().max(1) as f64;
    println!("Size: {}x{} ({} pixels)", img.width(), img.height(), img.pixels().len());
    println!("Min RGB: {:.6}, {:.6}, {:.6}", min.0, min.1, min.2);
    println!("Max RGB: {:.6}, {:.6}, {:.6}", max.0, max.1, max.2);
    println!("Mean RGB: {:.6}, {:.6}, {:.6}", sum.0 / n, sum.1 / n, sum.2 / n);
    print_metadata(&metadata);
}
