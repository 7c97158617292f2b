//! Geo-referenced 3D structures as custom layers for a WebGL map host.
//!
//! The crate turns geographic polygon chains into solid bridge meshes
//! and renders an animated water surface, both anchored precisely on a
//! Web Mercator basemap. Double-precision coordinates are split into
//! high/low [`f32`] pairs so the GPU can subtract the camera anchor
//! without visible jitter, and every layer follows the host's
//! add/render/remove lifecycle with asynchronous asset loading.

pub mod animation;
pub mod assets;
pub mod coord;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod render;

pub use error::LayerError;
pub use layer::{
    BridgeConfig, BridgeLayer, CustomLayer, FrameParams, LayerPhase, WaterConfig,
    WaterSurfaceLayer,
};
