//! Error taxonomy for geometry construction, asset loading, and GPU setup.

use std::fmt;

/// Errors that can occur while building or loading a custom layer.
#[derive(Debug, Clone)]
pub enum LayerError {
    /// A polygon chain was empty or under-specified. Raised before any
    /// GPU allocation happens.
    InvalidGeometry(String),
    /// A shader source or raster asset could not be fetched or decoded.
    ResourceLoad(String),
    /// A shader failed to compile or a program failed to link. Carries
    /// the driver's info log.
    ShaderBuild(String),
    /// The layer was configured with unusable parameters (for example an
    /// animation cycle with zero frames).
    Config(String),
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            LayerError::ResourceLoad(msg) => write!(f, "Resource load failed: {}", msg),
            LayerError::ShaderBuild(msg) => write!(f, "Shader build failed: {}", msg),
            LayerError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for LayerError {}
