//! Animated water surface layer over raster-displaced terrain.
//!
//! Two passes share one regular grid mesh: an opaque terrain surface
//! displaced by a height raster, then a blended water surface displaced
//! by a cyclic sequence of pre-baked height/velocity (HUV) rasters.
//! Shader sources, the frame-statistics manifest, the terrain raster,
//! and every HUV raster are fetched asynchronously after the host's add
//! call; the layer polls for completions during render and promotes
//! itself to Ready once all GPU objects are built.

use std::time::Duration;

use glow::HasContext;

use crate::animation::{AnimationClock, FrameStatsManifest, SurfaceAnimator};
use crate::assets::{AssetChannel, AssetPayload, RasterImage};
use crate::coord::{encode, relative_transform, GeoPoint};
use crate::error::LayerError;
use crate::geometry::build_surface_grid;
use crate::render::{
    build_program, create_raster_texture, GridBuffers, ScopedRenderState, TextureFilter,
};

use super::{CustomLayer, FrameParams, LayerPhase};

const MANIFEST_KEY: &str = "manifest";
const VERTEX_KEY: &str = "vertex";
const FRAGMENT_KEY: &str = "fragment";
const TERRAIN_VERTEX_KEY: &str = "terrain_vertex";
const TERRAIN_FRAGMENT_KEY: &str = "terrain_fragment";
const TERRAIN_KEY: &str = "terrain";
const FRAME_KEY_PREFIX: &str = "frame:";

/// Static description of one water surface.
#[derive(Debug, Clone)]
pub struct WaterConfig {
    pub id: String,
    /// Geographic center of the surface extent.
    pub center: GeoPoint,
    /// Extent in meters (east-west, north-south).
    pub extent_m: (f64, f64),
    /// Grid subdivisions (columns, rows).
    pub grid_cells: (u32, u32),
    /// URL of the frame-statistics manifest (JSON).
    pub manifest_url: String,
    pub vertex_shader_url: String,
    pub fragment_shader_url: String,
    pub terrain_vertex_shader_url: String,
    pub terrain_fragment_shader_url: String,
    /// URL of the terrain height raster.
    pub terrain_raster_url: String,
    /// Prefix prepended to the raster paths listed in the manifest.
    pub asset_base: String,
    pub water_alpha: f32,
}

impl WaterConfig {
    pub fn new(id: impl Into<String>, center: GeoPoint, extent_m: (f64, f64)) -> Self {
        Self {
            id: id.into(),
            center,
            extent_m,
            grid_cells: (640, 640),
            manifest_url: "assets/water_manifest.json".to_string(),
            vertex_shader_url: "assets/shaders/water.vert".to_string(),
            fragment_shader_url: "assets/shaders/water.frag".to_string(),
            terrain_vertex_shader_url: "assets/shaders/terrain.vert".to_string(),
            terrain_fragment_shader_url: "assets/shaders/terrain.frag".to_string(),
            terrain_raster_url: "assets/terrain_height.png".to_string(),
            asset_base: "assets/".to_string(),
            water_alpha: 0.8,
        }
    }
}

/// Assets collected while Loading. Dropping this mid-flight drops the
/// channel receiver, so any completion arriving after removal simply
/// fails to send and is discarded.
struct PendingAssets {
    channel: AssetChannel,
    vertex_src: Option<String>,
    fragment_src: Option<String>,
    terrain_vertex_src: Option<String>,
    terrain_fragment_src: Option<String>,
    manifest: Option<FrameStatsManifest>,
    terrain: Option<RasterImage>,
    frame_rasters: Vec<Option<RasterImage>>,
    frames_requested: bool,
}

impl PendingAssets {
    fn complete(&self) -> bool {
        self.vertex_src.is_some()
            && self.fragment_src.is_some()
            && self.terrain_vertex_src.is_some()
            && self.terrain_fragment_src.is_some()
            && self.manifest.is_some()
            && self.terrain.is_some()
            && self.frames_requested
            && self.frame_rasters.iter().all(Option::is_some)
    }
}

fn frame_index(key: &str) -> Option<usize> {
    key.strip_prefix(FRAME_KEY_PREFIX)?.parse().ok()
}

/// Uniform locations resolved once at setup. Sampler units and the
/// time-invariant ranges are written once; only the time-varying
/// subset (matrix, anchor, blend, frame ranges) is rewritten per frame.
struct WaterUniforms {
    matrix: Option<glow::UniformLocation>,
    center_high: Option<glow::UniformLocation>,
    center_low: Option<glow::UniformLocation>,
    blend: Option<glow::UniformLocation>,
    terrain_map: Option<glow::UniformLocation>,
    huv_before: Option<glow::UniformLocation>,
    huv_after: Option<glow::UniformLocation>,
    height_range_before: Option<glow::UniformLocation>,
    height_range_after: Option<glow::UniformLocation>,
    velocity_u_range_before: Option<glow::UniformLocation>,
    velocity_u_range_after: Option<glow::UniformLocation>,
    velocity_v_range_before: Option<glow::UniformLocation>,
    velocity_v_range_after: Option<glow::UniformLocation>,
    terrain_height_range: Option<glow::UniformLocation>,
    water_alpha: Option<glow::UniformLocation>,
    meter_scale: Option<glow::UniformLocation>,
}

impl WaterUniforms {
    fn locate(gl: &glow::Context, program: glow::Program) -> Self {
        unsafe {
            Self {
                matrix: gl.get_uniform_location(program, "u_matrix"),
                center_high: gl.get_uniform_location(program, "u_center_pos_high"),
                center_low: gl.get_uniform_location(program, "u_center_pos_low"),
                blend: gl.get_uniform_location(program, "u_blend"),
                terrain_map: gl.get_uniform_location(program, "u_terrain_map"),
                huv_before: gl.get_uniform_location(program, "u_huv_before"),
                huv_after: gl.get_uniform_location(program, "u_huv_after"),
                height_range_before: gl.get_uniform_location(program, "u_height_range_before"),
                height_range_after: gl.get_uniform_location(program, "u_height_range_after"),
                velocity_u_range_before: gl
                    .get_uniform_location(program, "u_velocity_u_range_before"),
                velocity_u_range_after: gl
                    .get_uniform_location(program, "u_velocity_u_range_after"),
                velocity_v_range_before: gl
                    .get_uniform_location(program, "u_velocity_v_range_before"),
                velocity_v_range_after: gl
                    .get_uniform_location(program, "u_velocity_v_range_after"),
                terrain_height_range: gl.get_uniform_location(program, "u_terrain_height_range"),
                water_alpha: gl.get_uniform_location(program, "u_water_alpha"),
                meter_scale: gl.get_uniform_location(program, "u_meter_scale"),
            }
        }
    }
}

/// Uniform locations for the opaque terrain pass, resolved once at
/// setup; samplers, height range, and meter scale are written once.
struct TerrainUniforms {
    matrix: Option<glow::UniformLocation>,
    center_high: Option<glow::UniformLocation>,
    center_low: Option<glow::UniformLocation>,
    terrain_map: Option<glow::UniformLocation>,
    terrain_height_range: Option<glow::UniformLocation>,
    meter_scale: Option<glow::UniformLocation>,
}

impl TerrainUniforms {
    fn locate(gl: &glow::Context, program: glow::Program) -> Self {
        unsafe {
            Self {
                matrix: gl.get_uniform_location(program, "u_matrix"),
                center_high: gl.get_uniform_location(program, "u_center_pos_high"),
                center_low: gl.get_uniform_location(program, "u_center_pos_low"),
                terrain_map: gl.get_uniform_location(program, "u_terrain_map"),
                terrain_height_range: gl.get_uniform_location(program, "u_terrain_height_range"),
                meter_scale: gl.get_uniform_location(program, "u_meter_scale"),
            }
        }
    }
}

struct WaterGpu {
    program: glow::Program,
    uniforms: WaterUniforms,
    terrain_program: glow::Program,
    terrain_uniforms: TerrainUniforms,
    buffers: GridBuffers,
    terrain_texture: glow::Texture,
    /// One texture per animation frame, indexed by frame index.
    frame_textures: Vec<glow::Texture>,
}

/// Custom layer rendering an animated water surface.
pub struct WaterSurfaceLayer {
    config: WaterConfig,
    phase: LayerPhase,
    pending: Option<PendingAssets>,
    failure: Option<LayerError>,
    animator: Option<SurfaceAnimator>,
    clock: AnimationClock,
    gpu: Option<WaterGpu>,
}

impl WaterSurfaceLayer {
    pub fn new(config: WaterConfig) -> Self {
        Self {
            config,
            phase: LayerPhase::Uninitialized,
            pending: None,
            failure: None,
            animator: None,
            clock: AnimationClock::new(),
            gpu: None,
        }
    }

    pub fn phase(&self) -> LayerPhase {
        self.phase
    }

    /// The error that permanently disabled this layer, if any.
    pub fn failure(&self) -> Option<&LayerError> {
        self.failure.as_ref()
    }

    /// Starts asynchronous asset acquisition. Needs no GL access; GPU
    /// objects are built later, once everything has arrived.
    fn begin_loading(&mut self) {
        let channel = AssetChannel::new();
        channel.request_text(MANIFEST_KEY, &self.config.manifest_url);
        channel.request_text(VERTEX_KEY, &self.config.vertex_shader_url);
        channel.request_text(FRAGMENT_KEY, &self.config.fragment_shader_url);
        channel.request_text(TERRAIN_VERTEX_KEY, &self.config.terrain_vertex_shader_url);
        channel.request_text(TERRAIN_FRAGMENT_KEY, &self.config.terrain_fragment_shader_url);
        channel.request_image(TERRAIN_KEY, &self.config.terrain_raster_url);

        self.pending = Some(PendingAssets {
            channel,
            vertex_src: None,
            fragment_src: None,
            terrain_vertex_src: None,
            terrain_fragment_src: None,
            manifest: None,
            terrain: None,
            frame_rasters: Vec::new(),
            frames_requested: false,
        });
        self.phase = LayerPhase::Loading;
    }

    /// Records a loading failure: logged once, layer permanently
    /// non-renderable, in-flight completions discarded.
    fn fail_loading(&mut self, error: LayerError) {
        log::error!("water layer {}: {}", self.config.id, error);
        self.failure = Some(error);
        self.pending = None;
    }

    /// Drains completed asset loads and promotes the layer to Ready
    /// once everything is in place.
    fn poll_assets(&mut self, gl: &glow::Context) {
        let mut failure = None;

        if let Some(pending) = self.pending.as_mut() {
            while let Some((key, result)) = pending.channel.try_recv() {
                let payload = match result {
                    Ok(payload) => payload,
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                };

                match (key.as_str(), payload) {
                    (MANIFEST_KEY, AssetPayload::Text(text)) => {
                        let manifest = match FrameStatsManifest::from_json(&text) {
                            Ok(manifest) => manifest,
                            Err(e) => {
                                failure = Some(e);
                                break;
                            }
                        };
                        // Second request wave: the rasters the manifest lists.
                        pending.frame_rasters = vec![None; manifest.raster_paths.len()];
                        for (index, path) in manifest.raster_paths.iter().enumerate() {
                            pending.channel.request_image(
                                format!("{}{}", FRAME_KEY_PREFIX, index),
                                format!("{}{}", self.config.asset_base, path),
                            );
                        }
                        pending.frames_requested = true;
                        pending.manifest = Some(manifest);
                    }
                    (VERTEX_KEY, AssetPayload::Text(text)) => pending.vertex_src = Some(text),
                    (FRAGMENT_KEY, AssetPayload::Text(text)) => pending.fragment_src = Some(text),
                    (TERRAIN_VERTEX_KEY, AssetPayload::Text(text)) => {
                        pending.terrain_vertex_src = Some(text)
                    }
                    (TERRAIN_FRAGMENT_KEY, AssetPayload::Text(text)) => {
                        pending.terrain_fragment_src = Some(text)
                    }
                    (TERRAIN_KEY, AssetPayload::Raster(raster)) => pending.terrain = Some(raster),
                    (key, AssetPayload::Raster(raster)) if frame_index(key).is_some() => {
                        let index = frame_index(key).unwrap_or_default();
                        if let Some(slot) = pending.frame_rasters.get_mut(index) {
                            *slot = Some(raster);
                        }
                    }
                    (key, _) => {
                        log::warn!("water layer {}: unexpected asset {}", self.config.id, key);
                    }
                }
            }
        }

        if let Some(e) = failure {
            self.fail_loading(e);
            return;
        }

        if self.pending.as_ref().is_some_and(PendingAssets::complete) {
            let pending = match self.pending.take() {
                Some(pending) => pending,
                None => return,
            };
            match self.build_gpu(gl, pending) {
                Ok(()) => {
                    log::info!("water layer {}: ready", self.config.id);
                    self.phase = LayerPhase::Ready;
                }
                Err(e) => self.fail_loading(e),
            }
        }
    }

    /// Creates every GPU object from the collected assets. Partially
    /// created objects are released on any failure.
    fn build_gpu(&mut self, gl: &glow::Context, pending: PendingAssets) -> Result<(), LayerError> {
        let manifest = pending
            .manifest
            .ok_or_else(|| LayerError::Config("manifest missing at GPU build".to_string()))?;
        let frames = manifest.frames()?;
        let animator = SurfaceAnimator::new(
            frames,
            Duration::from_millis(manifest.cycle_period_ms),
        )?;

        let grid = build_surface_grid(
            &self.config.center,
            self.config.extent_m.0,
            self.config.extent_m.1,
            self.config.grid_cells.0,
            self.config.grid_cells.1,
        )?;

        let terrain_raster = pending
            .terrain
            .ok_or_else(|| LayerError::Config("terrain raster missing at GPU build".to_string()))?;

        let vertex_src = pending.vertex_src.unwrap_or_default();
        let fragment_src = pending.fragment_src.unwrap_or_default();
        let program = build_program(gl, &vertex_src, &fragment_src)?;
        let uniforms = WaterUniforms::locate(gl, program);

        let terrain_vertex_src = pending.terrain_vertex_src.unwrap_or_default();
        let terrain_fragment_src = pending.terrain_fragment_src.unwrap_or_default();
        let terrain_program = match build_program(gl, &terrain_vertex_src, &terrain_fragment_src) {
            Ok(terrain_program) => terrain_program,
            Err(e) => {
                unsafe { gl.delete_program(program) };
                return Err(e);
            }
        };
        let terrain_uniforms = TerrainUniforms::locate(gl, terrain_program);

        let release = |gl: &glow::Context, mut buffers: GridBuffers, textures: &[glow::Texture]| {
            buffers.destroy(gl);
            unsafe {
                gl.delete_program(program);
                gl.delete_program(terrain_program);
                for &texture in textures {
                    gl.delete_texture(texture);
                }
            }
        };

        let buffers = match GridBuffers::upload(gl, &grid) {
            Ok(buffers) => buffers,
            Err(e) => {
                unsafe {
                    gl.delete_program(program);
                    gl.delete_program(terrain_program);
                }
                return Err(e);
            }
        };

        let terrain_texture =
            match create_raster_texture(gl, &terrain_raster, TextureFilter::Nearest) {
                Ok(texture) => texture,
                Err(e) => {
                    release(gl, buffers, &[]);
                    return Err(e);
                }
            };

        let mut frame_textures = Vec::with_capacity(pending.frame_rasters.len());
        for raster in pending.frame_rasters.into_iter().flatten() {
            match create_raster_texture(gl, &raster, TextureFilter::NearestLinear) {
                Ok(texture) => frame_textures.push(texture),
                Err(e) => {
                    let mut created = frame_textures;
                    created.push(terrain_texture);
                    release(gl, buffers, &created);
                    return Err(e);
                }
            }
        }

        // Time-invariant uniforms, written once per program.
        let meter_scale = crate::coord::meter_in_mercator_units(self.config.center.lat()) as f32;
        unsafe {
            gl.use_program(Some(program));
            gl.uniform_1_i32(uniforms.terrain_map.as_ref(), 0);
            gl.uniform_1_i32(uniforms.huv_before.as_ref(), 1);
            gl.uniform_1_i32(uniforms.huv_after.as_ref(), 2);
            gl.uniform_2_f32(
                uniforms.terrain_height_range.as_ref(),
                manifest.terrain_height_min,
                manifest.terrain_height_max,
            );
            gl.uniform_1_f32(uniforms.water_alpha.as_ref(), self.config.water_alpha);
            gl.uniform_1_f32(uniforms.meter_scale.as_ref(), meter_scale);

            gl.use_program(Some(terrain_program));
            gl.uniform_1_i32(terrain_uniforms.terrain_map.as_ref(), 0);
            gl.uniform_2_f32(
                terrain_uniforms.terrain_height_range.as_ref(),
                manifest.terrain_height_min,
                manifest.terrain_height_max,
            );
            gl.uniform_1_f32(terrain_uniforms.meter_scale.as_ref(), meter_scale);
            gl.use_program(None);
        }

        self.animator = Some(animator);
        self.gpu = Some(WaterGpu {
            program,
            uniforms,
            terrain_program,
            terrain_uniforms,
            buffers,
            terrain_texture,
            frame_textures,
        });
        Ok(())
    }

    /// Drops any in-flight loading state; part of teardown.
    fn release_assets(&mut self) {
        self.pending = None;
        self.animator = None;
        self.phase = LayerPhase::Removed;
    }

    fn draw(&mut self, gl: &glow::Context, params: &FrameParams) {
        let elapsed = self.clock.elapsed();
        let Some(animator) = self.animator.as_ref() else {
            return;
        };
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };
        let sample = animator.sample(elapsed);

        let matrix = relative_transform(&params.matrix, &params.camera_center);
        let anchor_x = encode(params.camera_center.x);
        let anchor_y = encode(params.camera_center.y);

        let _state = ScopedRenderState::capture(gl);
        unsafe {
            gl.enable(glow::DEPTH_TEST);

            // Opaque terrain surface first, then the blended water
            // above it.
            gl.disable(glow::BLEND);
            gl.use_program(Some(gpu.terrain_program));
            gl.uniform_matrix_4_f32_slice(
                gpu.terrain_uniforms.matrix.as_ref(),
                false,
                &matrix.to_cols_array(),
            );
            gl.uniform_2_f32(
                gpu.terrain_uniforms.center_high.as_ref(),
                anchor_x.high,
                anchor_y.high,
            );
            gl.uniform_2_f32(
                gpu.terrain_uniforms.center_low.as_ref(),
                anchor_x.low,
                anchor_y.low,
            );
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(gpu.terrain_texture));
            gpu.buffers.draw(gl);

            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            gl.use_program(Some(gpu.program));

            gl.uniform_matrix_4_f32_slice(
                gpu.uniforms.matrix.as_ref(),
                false,
                &matrix.to_cols_array(),
            );
            gl.uniform_2_f32(
                gpu.uniforms.center_high.as_ref(),
                anchor_x.high,
                anchor_y.high,
            );
            gl.uniform_2_f32(gpu.uniforms.center_low.as_ref(), anchor_x.low, anchor_y.low);

            gl.uniform_1_f32(gpu.uniforms.blend.as_ref(), sample.blend);
            gl.uniform_2_f32(
                gpu.uniforms.height_range_before.as_ref(),
                sample.current.height.min,
                sample.current.height.max,
            );
            gl.uniform_2_f32(
                gpu.uniforms.height_range_after.as_ref(),
                sample.next.height.min,
                sample.next.height.max,
            );
            gl.uniform_2_f32(
                gpu.uniforms.velocity_u_range_before.as_ref(),
                sample.current.velocity_u.min,
                sample.current.velocity_u.max,
            );
            gl.uniform_2_f32(
                gpu.uniforms.velocity_u_range_after.as_ref(),
                sample.next.velocity_u.min,
                sample.next.velocity_u.max,
            );
            gl.uniform_2_f32(
                gpu.uniforms.velocity_v_range_before.as_ref(),
                sample.current.velocity_v.min,
                sample.current.velocity_v.max,
            );
            gl.uniform_2_f32(
                gpu.uniforms.velocity_v_range_after.as_ref(),
                sample.next.velocity_v.min,
                sample.next.velocity_v.max,
            );

            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(gpu.terrain_texture));
            gl.active_texture(glow::TEXTURE1);
            gl.bind_texture(
                glow::TEXTURE_2D,
                gpu.frame_textures.get(sample.current.index).copied(),
            );
            gl.active_texture(glow::TEXTURE2);
            gl.bind_texture(
                glow::TEXTURE_2D,
                gpu.frame_textures.get(sample.next.index).copied(),
            );
            gl.active_texture(glow::TEXTURE0);

            gpu.buffers.draw(gl);
        }
    }
}

impl CustomLayer for WaterSurfaceLayer {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn on_add(&mut self, _gl: &glow::Context) {
        if self.phase != LayerPhase::Uninitialized {
            log::warn!(
                "water layer {}: on_add in phase {}, ignoring",
                self.config.id,
                self.phase.label()
            );
            return;
        }
        self.begin_loading();
    }

    fn render(&mut self, gl: &glow::Context, params: &FrameParams) {
        if self.phase == LayerPhase::Loading {
            self.poll_assets(gl);
        }
        if !self.phase.is_renderable() {
            return;
        }
        self.draw(gl, params);
    }

    fn on_remove(&mut self, gl: &glow::Context) {
        if let Some(gpu) = self.gpu.take() {
            let mut buffers = gpu.buffers;
            buffers.destroy(gl);
            unsafe {
                gl.delete_program(gpu.program);
                gl.delete_program(gpu.terrain_program);
                gl.delete_texture(gpu.terrain_texture);
                for texture in gpu.frame_textures {
                    gl.delete_texture(texture);
                }
            }
        }
        self.release_assets();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WaterConfig {
        let mut config = WaterConfig::new(
            "water",
            GeoPoint::new(114.028140134, 22.472900679),
            (25155.0, 13765.0),
        );
        // Point at paths that will never resolve so loads stay pending
        // or fail predictably.
        config.manifest_url = "/nonexistent/manifest.json".to_string();
        config.vertex_shader_url = "/nonexistent/water.vert".to_string();
        config.fragment_shader_url = "/nonexistent/water.frag".to_string();
        config.terrain_vertex_shader_url = "/nonexistent/terrain.vert".to_string();
        config.terrain_fragment_shader_url = "/nonexistent/terrain.frag".to_string();
        config.terrain_raster_url = "/nonexistent/terrain.png".to_string();
        config
    }

    #[test]
    fn test_frame_key_parsing() {
        assert_eq!(frame_index("frame:0"), Some(0));
        assert_eq!(frame_index("frame:12"), Some(12));
        assert_eq!(frame_index("frame:"), None);
        assert_eq!(frame_index("terrain"), None);
        assert_eq!(frame_index("frame:x"), None);
    }

    #[test]
    fn test_pending_assets_completeness() {
        let mut pending = PendingAssets {
            channel: AssetChannel::new(),
            vertex_src: Some("v".to_string()),
            fragment_src: Some("f".to_string()),
            terrain_vertex_src: Some("tv".to_string()),
            terrain_fragment_src: None,
            manifest: None,
            terrain: Some(RasterImage::new(1, 1, vec![0; 4]).unwrap()),
            frame_rasters: vec![Some(RasterImage::new(1, 1, vec![0; 4]).unwrap())],
            frames_requested: true,
        };
        // Both the terrain shader pair and the manifest gate readiness.
        assert!(!pending.complete());
        pending.terrain_fragment_src = Some("tf".to_string());
        assert!(!pending.complete());

        pending.manifest = Some(
            FrameStatsManifest::from_json(
                r#"{
                    "cycle_period_ms": 2000,
                    "raster_paths": ["a.png"],
                    "height_min": [0.0], "height_max": [1.0],
                    "velocity_u_min": [0.0], "velocity_u_max": [1.0],
                    "velocity_v_min": [0.0], "velocity_v_max": [1.0],
                    "terrain_height_min": 0.0, "terrain_height_max": 1.0
                }"#,
            )
            .unwrap(),
        );
        assert!(pending.complete());

        pending.frame_rasters.push(None);
        assert!(!pending.complete());
    }

    #[test]
    fn test_removal_during_loading_reaches_removed() {
        // Remove before any fetch resolves: the layer must settle in
        // Removed and the late completions must be discarded silently.
        let mut layer = WaterSurfaceLayer::new(config());
        layer.begin_loading();
        assert_eq!(layer.phase(), LayerPhase::Loading);

        layer.release_assets();
        assert_eq!(layer.phase(), LayerPhase::Removed);
        assert!(layer.pending.is_none());

        // Give the spawned loaders time to finish; their sends fail
        // harmlessly against the dropped channel.
        std::thread::sleep(std::time::Duration::from_millis(30));
        assert_eq!(layer.phase(), LayerPhase::Removed);
    }

    #[test]
    fn test_failure_disables_layer_permanently() {
        let mut layer = WaterSurfaceLayer::new(config());
        layer.begin_loading();
        layer.fail_loading(LayerError::ResourceLoad("fetch failed".to_string()));

        assert!(layer.failure().is_some());
        assert!(layer.pending.is_none());
        assert!(!layer.phase().is_renderable());
    }

    #[test]
    fn test_new_layer_starts_uninitialized() {
        let layer = WaterSurfaceLayer::new(config());
        assert_eq!(layer.phase(), LayerPhase::Uninitialized);
        assert_eq!(layer.id(), "water");
    }
}
