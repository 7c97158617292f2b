//! Procedural geometry for geo-referenced structures.
//!
//! Turns ordered geographic polygon chains into extruded solid meshes
//! (deck slabs, piers), merges independently built sub-meshes into one
//! combined buffer set, and builds the regular surface grids used by
//! raster-displaced terrain and water.

mod builder;
mod grid;
mod mesh;

pub use builder::{build_solid, build_solids};
pub use grid::{build_surface_grid, SurfaceGrid};
pub use mesh::SolidMesh;
