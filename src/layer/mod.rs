//! Custom layer implementations and the host-facing contract.

mod bridge;
mod host;
mod phase;
mod water;

pub use bridge::{BridgeConfig, BridgeLayer};
pub use host::{CustomLayer, FrameParams};
pub use phase::LayerPhase;
pub use water::{WaterConfig, WaterSurfaceLayer};
