//! Time-driven animation over pre-baked raster frame sequences.
//!
//! A water surface is animated by cycling through a small fixed set of
//! pre-baked height/velocity rasters. The statistics describing each
//! raster (physical min/max ranges used to decode its encoded values)
//! are loaded once from a manifest; a deterministic controller then
//! maps wall-clock elapsed time to a frame pair and blend fraction.

mod controller;
mod frames;

pub use controller::{AnimationClock, FrameSample, SurfaceAnimator};
pub use frames::{AnimationFrame, FrameStatsManifest, Range};
