//! Pre-baked animation frame statistics.
//!
//! Each raster in the cyclic sequence encodes water height and flow
//! velocity into color channels; decoding on the GPU needs the
//! per-frame physical min/max ranges that were used when the rasters
//! were baked. Those statistics ship in a small JSON manifest next to
//! the raster assets.

use serde::Deserialize;

use crate::error::LayerError;

/// An inclusive physical value range used to rescale encoded raster
/// channels back to real units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// One entry in the fixed cyclic frame sequence.
///
/// The full table is computed once from the manifest and immutable
/// thereafter. GPU texture handles are held by the owning layer in a
/// table parallel to this one, keyed by `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub index: usize,
    pub raster_path: String,
    pub height: Range,
    pub velocity_u: Range,
    pub velocity_v: Range,
}

/// Raw manifest as baked by the preprocessing pipeline: parallel
/// per-frame arrays plus scene-wide terrain statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameStatsManifest {
    /// Duration of one frame-to-frame transition, in milliseconds.
    pub cycle_period_ms: u64,
    /// Paths of the height/velocity rasters, in cycle order.
    pub raster_paths: Vec<String>,
    pub height_min: Vec<f32>,
    pub height_max: Vec<f32>,
    pub velocity_u_min: Vec<f32>,
    pub velocity_u_max: Vec<f32>,
    pub velocity_v_min: Vec<f32>,
    pub velocity_v_max: Vec<f32>,
    /// Terrain height raster range, shared by every frame.
    pub terrain_height_min: f32,
    pub terrain_height_max: f32,
}

impl FrameStatsManifest {
    pub fn from_json(text: &str) -> Result<Self, LayerError> {
        serde_json::from_str(text)
            .map_err(|e| LayerError::ResourceLoad(format!("Failed to parse frame manifest: {}", e)))
    }

    /// Builds the immutable frame table, validating that every
    /// statistics array covers every raster.
    pub fn frames(&self) -> Result<Vec<AnimationFrame>, LayerError> {
        let count = self.raster_paths.len();
        if count == 0 {
            return Err(LayerError::Config(
                "frame manifest lists no rasters".to_string(),
            ));
        }

        let arrays = [
            ("height_min", self.height_min.len()),
            ("height_max", self.height_max.len()),
            ("velocity_u_min", self.velocity_u_min.len()),
            ("velocity_u_max", self.velocity_u_max.len()),
            ("velocity_v_min", self.velocity_v_min.len()),
            ("velocity_v_max", self.velocity_v_max.len()),
        ];
        for (name, len) in arrays {
            if len < count {
                return Err(LayerError::Config(format!(
                    "frame manifest array {} has {} entries for {} rasters",
                    name, len, count
                )));
            }
        }

        Ok(self
            .raster_paths
            .iter()
            .enumerate()
            .map(|(index, path)| AnimationFrame {
                index,
                raster_path: path.clone(),
                height: Range::new(self.height_min[index], self.height_max[index]),
                velocity_u: Range::new(self.velocity_u_min[index], self.velocity_u_max[index]),
                velocity_v: Range::new(self.velocity_v_min[index], self.velocity_v_max[index]),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn manifest_json() -> &'static str {
        r#"{
            "cycle_period_ms": 2000,
            "raster_paths": ["huv/huv_0.png", "huv/huv_1.png", "huv/huv_2.png"],
            "height_min": [0.0, 0.0, 0.0],
            "height_max": [12.16, 12.41, 12.06],
            "velocity_u_min": [-0.32, -1.13, -1.55],
            "velocity_u_max": [3.73, 0.52, 0.26],
            "velocity_v_min": [-1.33, -0.43, -1.46],
            "velocity_v_max": [3.33, 0.51, 1.13],
            "terrain_height_min": -11.35,
            "terrain_height_max": 847.3
        }"#
    }

    #[test]
    fn test_manifest_roundtrip() {
        let manifest = FrameStatsManifest::from_json(manifest_json()).unwrap();
        assert_eq!(manifest.cycle_period_ms, 2000);

        let frames = manifest.frames().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].index, 1);
        assert_eq!(frames[1].raster_path, "huv/huv_1.png");
        assert_eq!(frames[1].height, Range::new(0.0, 12.41));
        assert_eq!(frames[2].velocity_u, Range::new(-1.55, 0.26));
    }

    #[test]
    fn test_manifest_rejects_short_arrays() {
        let mut manifest = FrameStatsManifest::from_json(manifest_json()).unwrap();
        manifest.velocity_v_max.pop();
        assert!(matches!(manifest.frames(), Err(LayerError::Config(_))));
    }

    #[test]
    fn test_manifest_rejects_zero_rasters() {
        let mut manifest = FrameStatsManifest::from_json(manifest_json()).unwrap();
        manifest.raster_paths.clear();
        assert!(matches!(manifest.frames(), Err(LayerError::Config(_))));
    }

    #[test]
    fn test_malformed_json_is_resource_error() {
        assert!(matches!(
            FrameStatsManifest::from_json("{not json"),
            Err(LayerError::ResourceLoad(_))
        ));
    }
}
