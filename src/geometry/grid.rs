//! Regular surface grids for raster-displaced terrain and water.

use crate::coord::{meter_in_mercator_units, GeoPoint, MercatorPoint};
use crate::error::LayerError;

/// A flat, regularly subdivided grid over a geographic extent.
///
/// Vertices interleave Mercator plan position and raster texture
/// coordinates as (x, y, u, v); elevation is applied on the GPU from
/// the height rasters, so no z component is stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceGrid {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl SurfaceGrid {
    pub fn vertex_count(&self) -> u32 {
        (self.vertices.len() / 4) as u32
    }
}

/// Builds a grid of `cols` x `rows` cells centered on `center`,
/// spanning `width_m` x `height_m` meters at the center's latitude.
///
/// The V texture coordinate is flipped so the raster's top row maps to
/// the extent's northern edge (Mercator y grows southward).
pub fn build_surface_grid(
    center: &GeoPoint,
    width_m: f64,
    height_m: f64,
    cols: u32,
    rows: u32,
) -> Result<SurfaceGrid, LayerError> {
    if cols == 0 || rows == 0 {
        return Err(LayerError::Config(format!(
            "surface grid needs at least 1x1 cells, got {}x{}",
            cols, rows
        )));
    }
    if width_m <= 0.0 || height_m <= 0.0 {
        return Err(LayerError::Config(format!(
            "surface grid extent must be positive, got {}x{} m",
            width_m, height_m
        )));
    }

    let origin = MercatorPoint::from_geo(center, 0.0);
    let scale = meter_in_mercator_units(center.lat());
    let width = width_m * scale;
    let height = height_m * scale;

    let mut grid = SurfaceGrid {
        vertices: Vec::with_capacity(((cols + 1) * (rows + 1) * 4) as usize),
        indices: Vec::with_capacity((cols * rows * 6) as usize),
    };

    for j in 0..=rows {
        let v = j as f64 / rows as f64;
        let y = origin.y + (v - 0.5) * height;
        for i in 0..=cols {
            let u = i as f64 / cols as f64;
            let x = origin.x + (u - 0.5) * width;
            grid.vertices
                .extend_from_slice(&[x as f32, y as f32, u as f32, (1.0 - v) as f32]);
        }
    }

    let stride = cols + 1;
    for j in 0..rows {
        for i in 0..cols {
            let a = j * stride + i;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            grid.indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    Ok(grid)
}
