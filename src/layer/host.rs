//! The contract between a custom layer and its host map engine.

use glam::DMat4;

use crate::coord::MercatorPoint;

/// Per-frame inputs supplied by the host.
#[derive(Debug, Clone, Copy)]
pub struct FrameParams {
    /// Combined projection-view matrix for the current frame.
    pub matrix: DMat4,
    /// The camera's current reference point in Mercator world space,
    /// used as the precision anchor for this frame.
    pub camera_center: MercatorPoint,
}

impl FrameParams {
    pub fn new(matrix: DMat4, camera_center: MercatorPoint) -> Self {
        Self {
            matrix,
            camera_center,
        }
    }

    /// Builds frame parameters from the host's column-major matrix
    /// array, as map engines typically hand it over.
    pub fn from_column_major(matrix: &[f64; 16], camera_center: MercatorPoint) -> Self {
        Self {
            matrix: DMat4::from_cols_array(matrix),
            camera_center,
        }
    }
}

/// The three-method custom-layer contract the host invokes.
///
/// `on_add` starts setup and returns immediately (asset loading
/// continues asynchronously); `render` is called every frame and must
/// be a no-op until the layer is ready; `on_remove` tears down all
/// owned GPU resources and is safe to call at any point, including
/// while loading is still in flight.
pub trait CustomLayer {
    fn id(&self) -> &str;

    fn on_add(&mut self, gl: &glow::Context);

    fn render(&mut self, gl: &glow::Context, params: &FrameParams);

    fn on_remove(&mut self, gl: &glow::Context);
}
