// Copyright @yucwang 2026

use crate::core::scene_loader::SceneLoadError;

use std::fmt;
use std::path::{Path, PathBuf};

/// A material handed back something the integrator cannot continue with.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceError {
    NonFiniteDirection { material: &'static str, depth: u32 },
    NonFiniteAttenuation { material: &'static str, depth: u32 },
    NegativeAttenuation { material: &'static str, depth: u32 },
    NonFiniteCameraRay,
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::NonFiniteDirection { material, depth } => {
                write!(f, "{} scattered a non-finite ray at depth {}", material, depth)
            }
            TraceError::NonFiniteAttenuation { material, depth } => {
                write!(f, "{} returned a non-finite attenuation at depth {}", material, depth)
            }
            TraceError::NegativeAttenuation { material, depth } => {
                write!(f, "{} returned a negative attenuation at depth {}", material, depth)
            }
            TraceError::NonFiniteCameraRay => write!(f, "camera generated a non-finite ray"),
        }
    }
}

impl std::error::Error for TraceError {}

#[derive(Debug)]
pub enum RenderError {
    Config(String),
    Scene(SceneLoadError),
    Trace { x: usize, y: usize, source: TraceError },
    WorkerPanic { row: Option<usize> },
    Io { path: PathBuf, message: String },
}

impl RenderError {
    pub fn io<P: AsRef<Path>, E: fmt::Display>(path: P, err: E) -> Self {
        RenderError::Io { path: path.as_ref().to_path_buf(), message: err.to_string() }
    }

    /// Which stage of a render produced the error.
    pub fn stage(&self) -> &'static str {
        match self {
            RenderError::Config(_) | RenderError::Scene(_) => "loading",
            RenderError::Trace { .. } | RenderError::WorkerPanic { .. } => "rendering",
            RenderError::Io { .. } => "saving",
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Config(msg) => write!(f, "invalid render configuration: {}", msg),
            RenderError::Scene(err) => write!(f, "{}", err),
            RenderError::Trace { x, y, source } => {
                write!(f, "tracing pixel ({}, {}) failed: {}", x, y, source)
            }
            RenderError::WorkerPanic { row: Some(row) } => {
                write!(f, "render worker panicked while processing row {}", row)
            }
            RenderError::WorkerPanic { row: None } => write!(f, "render worker panicked"),
            RenderError::Io { path, message } => {
                write!(f, "image i/o on {} failed: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Scene(err) => Some(err),
            RenderError::Trace { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SceneLoadError> for RenderError {
    fn from(err: SceneLoadError) -> Self {
        RenderError::Scene(err)
    }
}
