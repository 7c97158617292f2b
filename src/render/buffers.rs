//! Vertex array and buffer upload for procedural meshes.
//!
//! Mesh data is uploaded once at setup and treated as immutable
//! afterwards. Every GPU handle is held in an `Option` and released
//! with `take()`, making teardown idempotent.

use glow::HasContext;

use crate::error::LayerError;
use crate::geometry::{SolidMesh, SurfaceGrid};

fn f32_bytes(data: &[f32]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr().cast(), std::mem::size_of_val(data)) }
}

fn u32_bytes(data: &[u32]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr().cast(), std::mem::size_of_val(data)) }
}

fn alloc_err(what: &str, detail: String) -> LayerError {
    LayerError::ResourceLoad(format!("GPU {} allocation failed: {}", what, detail))
}

/// GPU buffers for one merged solid mesh: a shared position buffer with
/// separate vertex-array/index-buffer pairs for filled triangles and
/// the wireframe overlay.
pub struct SolidMeshBuffers {
    vertex_buffer: Option<glow::Buffer>,
    fill_vao: Option<glow::VertexArray>,
    fill_index_buffer: Option<glow::Buffer>,
    edge_vao: Option<glow::VertexArray>,
    edge_index_buffer: Option<glow::Buffer>,
    fill_index_count: i32,
    edge_index_count: i32,
}

impl SolidMeshBuffers {
    /// Uploads a mesh, creating both draw configurations.
    pub fn upload(gl: &glow::Context, mesh: &SolidMesh) -> Result<Self, LayerError> {
        unsafe {
            let vertex_buffer = gl.create_buffer().map_err(|e| alloc_err("buffer", e))?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                f32_bytes(&mesh.vertices),
                glow::STATIC_DRAW,
            );

            let (fill_vao, fill_index_buffer) =
                indexed_vao(gl, vertex_buffer, &mesh.face_indices)?;
            let (edge_vao, edge_index_buffer) =
                indexed_vao(gl, vertex_buffer, &mesh.edge_indices)?;

            gl.bind_vertex_array(None);

            Ok(Self {
                vertex_buffer: Some(vertex_buffer),
                fill_vao: Some(fill_vao),
                fill_index_buffer: Some(fill_index_buffer),
                edge_vao: Some(edge_vao),
                edge_index_buffer: Some(edge_index_buffer),
                fill_index_count: mesh.face_indices.len() as i32,
                edge_index_count: mesh.edge_indices.len() as i32,
            })
        }
    }

    /// Draws the filled triangles; assumes the fill program is bound.
    pub fn draw_fill(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_vertex_array(self.fill_vao);
            gl.draw_elements(
                glow::TRIANGLES,
                self.fill_index_count,
                glow::UNSIGNED_INT,
                0,
            );
        }
    }

    /// Draws the wireframe overlay; assumes the edge program is bound.
    pub fn draw_edges(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_vertex_array(self.edge_vao);
            gl.draw_elements(glow::LINES, self.edge_index_count, glow::UNSIGNED_INT, 0);
        }
    }

    /// Releases all owned GL objects. Safe to call repeatedly.
    pub fn destroy(&mut self, gl: &glow::Context) {
        unsafe {
            if let Some(vao) = self.fill_vao.take() {
                gl.delete_vertex_array(vao);
            }
            if let Some(vao) = self.edge_vao.take() {
                gl.delete_vertex_array(vao);
            }
            if let Some(buffer) = self.fill_index_buffer.take() {
                gl.delete_buffer(buffer);
            }
            if let Some(buffer) = self.edge_index_buffer.take() {
                gl.delete_buffer(buffer);
            }
            if let Some(buffer) = self.vertex_buffer.take() {
                gl.delete_buffer(buffer);
            }
        }
    }
}

/// Creates a vertex array over the shared position buffer with its own
/// element buffer.
unsafe fn indexed_vao(
    gl: &glow::Context,
    vertex_buffer: glow::Buffer,
    indices: &[u32],
) -> Result<(glow::VertexArray, glow::Buffer), LayerError> {
    let vao = gl
        .create_vertex_array()
        .map_err(|e| alloc_err("vertex array", e))?;
    gl.bind_vertex_array(Some(vao));

    gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
    gl.enable_vertex_attrib_array(0);
    gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, 0, 0);

    let index_buffer = gl.create_buffer().map_err(|e| alloc_err("buffer", e))?;
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
    gl.buffer_data_u8_slice(
        glow::ELEMENT_ARRAY_BUFFER,
        u32_bytes(indices),
        glow::STATIC_DRAW,
    );

    Ok((vao, index_buffer))
}

/// GPU buffers for a surface grid: interleaved (x, y, u, v) vertices
/// with one triangle index buffer.
pub struct GridBuffers {
    vao: Option<glow::VertexArray>,
    vertex_buffer: Option<glow::Buffer>,
    index_buffer: Option<glow::Buffer>,
    index_count: i32,
}

impl GridBuffers {
    pub fn upload(gl: &glow::Context, grid: &SurfaceGrid) -> Result<Self, LayerError> {
        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(|e| alloc_err("vertex array", e))?;
            gl.bind_vertex_array(Some(vao));

            let vertex_buffer = gl.create_buffer().map_err(|e| alloc_err("buffer", e))?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                f32_bytes(&grid.vertices),
                glow::STATIC_DRAW,
            );

            // location 0: plan position, location 1: raster uv.
            let stride = 4 * std::mem::size_of::<f32>() as i32;
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, stride, 8);

            let index_buffer = gl.create_buffer().map_err(|e| alloc_err("buffer", e))?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                u32_bytes(&grid.indices),
                glow::STATIC_DRAW,
            );

            gl.bind_vertex_array(None);

            Ok(Self {
                vao: Some(vao),
                vertex_buffer: Some(vertex_buffer),
                index_buffer: Some(index_buffer),
                index_count: grid.indices.len() as i32,
            })
        }
    }

    pub fn draw(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_vertex_array(self.vao);
            gl.draw_elements(glow::TRIANGLES, self.index_count, glow::UNSIGNED_INT, 0);
        }
    }

    /// Releases all owned GL objects. Safe to call repeatedly.
    pub fn destroy(&mut self, gl: &glow::Context) {
        unsafe {
            if let Some(vao) = self.vao.take() {
                gl.delete_vertex_array(vao);
            }
            if let Some(buffer) = self.index_buffer.take() {
                gl.delete_buffer(buffer);
            }
            if let Some(buffer) = self.vertex_buffer.take() {
                gl.delete_buffer(buffer);
            }
        }
    }
}
