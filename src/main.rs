// Copyright 2020 TwoCookingMice

use tracelet::core::error::RenderError;
use tracelet::core::scene_loader::load_scene;
use tracelet::integrators::path::PathIntegrator;
use tracelet::math::constants::Float;
use tracelet::renderers::parallel::ParallelRenderer;

use console::style;
use log::info;
use std::env;
use std::process;

const USAGE: &str = "<scene.xml> <outfile> [outfile_hdr] [--spp N] [--seed N] [--threads N] [--exposure F]";

/// Command line overrides on top of the scene description.
#[derive(Debug, Clone, PartialEq)]
struct RenderSettings {
    scene_path: String,
    outfile: String,
    outfile_hdr: String,
    spp: Option<u32>,
    seed: Option<u64>,
    threads: Option<usize>,
    exposure: Float,
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} expects a value", flag))?;
    value.parse::<T>().map_err(|_| format!("invalid value for {}: {}", flag, value))
}

fn parse_args(args: &[String]) -> Result<RenderSettings, String> {
    let mut positional: Vec<&String> = Vec::new();
    let mut settings = RenderSettings {
        scene_path: String::new(),
        outfile: String::new(),
        outfile_hdr: String::new(),
        spp: None,
        seed: None,
        threads: None,
        exposure: 1.0,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--spp" => {
                i += 1;
                settings.spp = Some(parse_value("--spp", args.get(i))?);
            }
            "--seed" => {
                i += 1;
                settings.seed = Some(parse_value("--seed", args.get(i))?);
            }
            "--threads" => {
                i += 1;
                settings.threads = Some(parse_value("--threads", args.get(i))?);
            }
            "--exposure" => {
                i += 1;
                settings.exposure = parse_value("--exposure", args.get(i))?;
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
            _ => positional.push(&args[i]),
        }
        i += 1;
    }

    match positional.as_slice() {
        [scene, outfile] => {
            settings.scene_path = scene.to_string();
            settings.outfile = outfile.to_string();
        }
        [scene, outfile, outfile_hdr] => {
            settings.scene_path = scene.to_string();
            settings.outfile = outfile.to_string();
            settings.outfile_hdr = outfile_hdr.to_string();
        }
        _ => return Err(String::from("expected a scene file and at least one output file")),
    }
    Ok(settings)
}

fn run(settings: &RenderSettings) -> Result<(), RenderError> {
    let mut scene = load_scene(&settings.scene_path)?;
    if let Some(spp) = settings.spp {
        scene = scene.with_samples_per_pixel(spp);
    }
    if let Some(seed) = settings.seed {
        scene = scene.with_seed(seed);
    }
    let (width, height) = scene.resolution();
    info!("Scene loaded: {}x{}, {} spp, seed {}.", width, height, scene.samples_per_pixel(), scene.seed());

    let mut renderer = ParallelRenderer::new(Box::new(PathIntegrator::new()));
    if let Some(threads) = settings.threads {
        renderer = renderer.with_threads(threads);
    }
    renderer.raytrace(&scene, &settings.outfile, &settings.outfile_hdr, settings.exposure)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let settings = match parse_args(&args) {
        Ok(settings) => settings,
        Err(msg) => {
            eprintln!("{} {}", style("error:").red().bold(), msg);
            eprintln!("Usage: {} {}", args.first().map(String::as_str).unwrap_or("tracelet"), USAGE);
            process::exit(2);
        }
    };

    if let Err(err) = run(&settings) {
        eprintln!("{} {} failed: {}", style("error:").red().bold(), style(err.stage()).bold(), err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("tracelet").chain(list.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn test_parse_positional_and_flags() {
        let settings = parse_args(&args(&["scene.xml", "out.png", "out.exr", "--spp", "8",
                                          "--threads", "3", "--exposure", "0.5"])).unwrap();
        assert_eq!(settings.scene_path, "scene.xml");
        assert_eq!(settings.outfile, "out.png");
        assert_eq!(settings.outfile_hdr, "out.exr");
        assert_eq!(settings.spp, Some(8));
        assert_eq!(settings.threads, Some(3));
        assert_eq!(settings.seed, None);
        assert_eq!(settings.exposure, 0.5);
    }

    #[test]
    fn test_hdr_output_is_optional() {
        let settings = parse_args(&args(&["--seed", "9", "scene.xml", "out.png"])).unwrap();
        assert_eq!(settings.outfile_hdr, "");
        assert_eq!(settings.seed, Some(9));
    }

    #[test]
    fn test_bad_arguments_are_rejected() {
        assert!(parse_args(&args(&["scene.xml"])).is_err());
        assert!(parse_args(&args(&["scene.xml", "out.png", "--spp"])).is_err());
        assert!(parse_args(&args(&["scene.xml", "out.png", "--spp", "many"])).is_err());
        assert!(parse_args(&args(&["scene.xml", "out.png", "--fast"])).is_err());
    }
}
