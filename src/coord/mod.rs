//! Geographic coordinates and GPU precision handling.
//!
//! This module provides the coordinate types used by every layer:
//! geographic points and polygon chains, their Web Mercator world-space
//! conversion, and the high/low split that keeps those world coordinates
//! numerically stable inside a single-precision GPU pipeline.

mod encode;
mod geo;

pub use encode::{encode, relative_transform, DoubleCoordinate};
pub use geo::{meter_in_mercator_units, GeoPoint, MercatorPoint, PolygonChain};
