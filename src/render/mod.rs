//! GPU resource handling on top of `glow`.
//!
//! Shader program construction with diagnostics, buffer/texture upload
//! for the procedural meshes, and scoped save/restore of the GL state
//! the layers share with their host.

mod buffers;
mod shader;
mod state_guard;
mod texture;

pub use buffers::{GridBuffers, SolidMeshBuffers};
pub use shader::build_program;
pub use state_guard::ScopedRenderState;
pub use texture::{create_raster_texture, TextureFilter};
