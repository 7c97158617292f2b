//! Scoped save/restore of shared GL state.
//!
//! The GL context belongs to the host map engine; any capability a
//! layer toggles for its own draws (depth test, blending, face
//! culling) must be put back before the host's next draw. The guard
//! captures the current state on construction and restores it when
//! dropped, bracketing each render call.

use glow::HasContext;

pub struct ScopedRenderState<'a> {
    gl: &'a glow::Context,
    depth_test: bool,
    blend: bool,
    cull_face: bool,
}

impl<'a> ScopedRenderState<'a> {
    pub fn capture(gl: &'a glow::Context) -> Self {
        unsafe {
            Self {
                gl,
                depth_test: gl.is_enabled(glow::DEPTH_TEST),
                blend: gl.is_enabled(glow::BLEND),
                cull_face: gl.is_enabled(glow::CULL_FACE),
            }
        }
    }
}

impl Drop for ScopedRenderState<'_> {
    fn drop(&mut self) {
        unsafe {
            set_capability(self.gl, glow::DEPTH_TEST, self.depth_test);
            set_capability(self.gl, glow::BLEND, self.blend);
            set_capability(self.gl, glow::CULL_FACE, self.cull_face);
            self.gl.bind_vertex_array(None);
        }
    }
}

unsafe fn set_capability(gl: &glow::Context, capability: u32, enabled: bool) {
    if enabled {
        gl.enable(capability);
    } else {
        gl.disable(capability);
    }
}
