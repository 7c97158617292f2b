//! Bridge structure layer: an extruded deck slab plus a set of piers,
//! drawn filled with a wireframe overlay.
//!
//! All geometry is built synchronously at add time (the shaders are
//! embedded, so there is nothing to fetch); the layer reaches Ready
//! within `on_add` or stays non-renderable if geometry or shader setup
//! fails.

use glow::HasContext;

use crate::coord::{encode, relative_transform, PolygonChain};
use crate::error::LayerError;
use crate::geometry::{build_solid, build_solids, SolidMesh};
use crate::render::{build_program, ScopedRenderState, SolidMeshBuffers};

use super::{CustomLayer, FrameParams, LayerPhase};

/// Vertex shader shared by the fill and wireframe passes. Vertices are
/// translated against the camera anchor in two precision stages before
/// the (already camera-relative) matrix is applied.
const SOLID_VERTEX_SHADER: &str = r#"#version 300 es
uniform mat4 u_matrix;
uniform vec2 u_center_pos_high;
uniform vec2 u_center_pos_low;
layout(location = 0) in vec3 a_pos;

vec2 translate(vec2 high, vec2 low) {
    vec2 high_diff = high - u_center_pos_high;
    vec2 low_diff = low - u_center_pos_low;
    return high_diff + low_diff;
}

void main() {
    vec2 translated = translate(a_pos.xy, vec2(0.0));
    gl_Position = u_matrix * vec4(translated, a_pos.z, 1.0);
}
"#;

const SOLID_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
uniform vec4 u_color;
out vec4 out_color;

void main() {
    out_color = u_color;
}
"#;

/// Static description of one bridge: deck ring, pier rings, and their
/// extrusion parameters.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub id: String,
    /// Deck outline; bottom vertices sit at `deck_base_height` meters
    /// unless a point carries its own altitude.
    pub deck: PolygonChain,
    pub deck_base_height: f64,
    /// Deck slab thickness in meters.
    pub deck_thickness: f64,
    /// Pier footprints, extruded from ground level.
    pub piers: Vec<PolygonChain>,
    /// Pier extrusion height in meters.
    pub pier_height: f64,
    pub fill_color: [f32; 4],
    pub edge_color: [f32; 4],
}

impl BridgeConfig {
    pub fn new(
        id: impl Into<String>,
        deck: PolygonChain,
        deck_thickness: f64,
        piers: Vec<PolygonChain>,
        pier_height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            deck,
            deck_base_height: 5.0,
            deck_thickness,
            piers,
            pier_height,
            fill_color: [0.8, 0.8, 0.8, 1.0],
            edge_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Uniform locations resolved once at setup.
struct SolidUniforms {
    matrix: Option<glow::UniformLocation>,
    center_high: Option<glow::UniformLocation>,
    center_low: Option<glow::UniformLocation>,
    color: Option<glow::UniformLocation>,
}

impl SolidUniforms {
    fn locate(gl: &glow::Context, program: glow::Program) -> Self {
        unsafe {
            Self {
                matrix: gl.get_uniform_location(program, "u_matrix"),
                center_high: gl.get_uniform_location(program, "u_center_pos_high"),
                center_low: gl.get_uniform_location(program, "u_center_pos_low"),
                color: gl.get_uniform_location(program, "u_color"),
            }
        }
    }
}

struct BridgeGpu {
    program: glow::Program,
    uniforms: SolidUniforms,
    buffers: SolidMeshBuffers,
}

/// Custom layer rendering one bridge structure.
pub struct BridgeLayer {
    config: BridgeConfig,
    phase: LayerPhase,
    gpu: Option<BridgeGpu>,
}

impl BridgeLayer {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            phase: LayerPhase::Uninitialized,
            gpu: None,
        }
    }

    pub fn phase(&self) -> LayerPhase {
        self.phase
    }

    /// Builds the combined deck + pier mesh. Fails before any GPU work
    /// if a chain is degenerate.
    fn assemble_mesh(config: &BridgeConfig) -> Result<SolidMesh, LayerError> {
        let deck = build_solid(&config.deck, config.deck_base_height, config.deck_thickness)?;
        let piers = build_solids(&config.piers, 0.0, config.pier_height)?;
        Ok(SolidMesh::merge(vec![deck, piers]))
    }

    fn setup(&self, gl: &glow::Context) -> Result<BridgeGpu, LayerError> {
        let mesh = Self::assemble_mesh(&self.config)?;

        let program = build_program(gl, SOLID_VERTEX_SHADER, SOLID_FRAGMENT_SHADER)?;
        let uniforms = SolidUniforms::locate(gl, program);
        let buffers = match SolidMeshBuffers::upload(gl, &mesh) {
            Ok(buffers) => buffers,
            Err(e) => {
                unsafe { gl.delete_program(program) };
                return Err(e);
            }
        };

        log::info!(
            "bridge layer {}: uploaded {} vertices ({} piers)",
            self.config.id,
            mesh.vertex_count(),
            self.config.piers.len()
        );

        Ok(BridgeGpu {
            program,
            uniforms,
            buffers,
        })
    }
}

impl CustomLayer for BridgeLayer {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn on_add(&mut self, gl: &glow::Context) {
        if self.phase != LayerPhase::Uninitialized {
            log::warn!(
                "bridge layer {}: on_add in phase {}, ignoring",
                self.config.id,
                self.phase.label()
            );
            return;
        }
        self.phase = LayerPhase::Loading;

        match self.setup(gl) {
            Ok(gpu) => {
                self.gpu = Some(gpu);
                self.phase = LayerPhase::Ready;
            }
            Err(e) => {
                // Stays in Loading, permanently non-renderable.
                log::error!("bridge layer {}: setup failed: {}", self.config.id, e);
            }
        }
    }

    fn render(&mut self, gl: &glow::Context, params: &FrameParams) {
        if !self.phase.is_renderable() {
            return;
        }
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };

        let matrix = relative_transform(&params.matrix, &params.camera_center);
        let anchor_x = encode(params.camera_center.x);
        let anchor_y = encode(params.camera_center.y);

        let _state = ScopedRenderState::capture(gl);
        unsafe {
            gl.enable(glow::DEPTH_TEST);
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

            gl.disable(glow::BLEND);
            let fill = self.config.fill_color;
            gl.uniform_4_f32(gpu.uniforms.color.as_ref(), fill[0], fill[1], fill[2], fill[3]);
            gpu.buffers.draw_fill(gl);

            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            let edge = self.config.edge_color;
            gl.uniform_4_f32(gpu.uniforms.color.as_ref(), edge[0], edge[1], edge[2], edge[3]);
            gpu.buffers.draw_edges(gl);
        }
    }

    fn on_remove(&mut self, gl: &glow::Context) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.buffers.destroy(gl);
            unsafe { gl.delete_program(gpu.program) };
        }
        self.phase = LayerPhase::Removed;
    }
}
