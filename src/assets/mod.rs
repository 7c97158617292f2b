//! Asynchronous asset acquisition for layer setup.

mod fetch;

pub use fetch::{AssetChannel, AssetPayload, AssetReply, RasterImage};
