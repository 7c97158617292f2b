//! High/low precision encoding for single-precision GPU pipelines.
//!
//! Web Mercator world coordinates are doubles with most of their
//! precision far from the origin; uploading them as `f32` loses enough
//! bits to make geometry visibly jitter near the camera. The fix used
//! by every layer here: split each scalar into a `(high, low)` pair of
//! `f32`s, subtract a camera-anchored reference on the GPU in two
//! stages, and fold the reference translation into the draw matrix so
//! all per-vertex arithmetic happens on small numbers near zero.

use glam::{DMat4, DVec3, Mat4};

use super::MercatorPoint;

/// One world-space scalar split into reduced-precision halves.
///
/// `high` is the value truncated to `f32`; `low` is the residual left
/// over by that truncation. The pair carries roughly 48 mantissa bits,
/// so `high as f64 + low as f64` recovers the value to a relative
/// error of about 2⁻⁴⁸ — far below one Mercator unit of jitter, though
/// not bit-exact f64.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleCoordinate {
    pub high: f32,
    pub low: f32,
}

/// Splits a double-precision scalar into a high/low `f32` pair.
pub fn encode(value: f64) -> DoubleCoordinate {
    let high = value as f32;
    let low = (value - high as f64) as f32;
    DoubleCoordinate { high, low }
}

/// Composes the host's projection-view matrix with a translation by the
/// reference point, producing the matrix uploaded alongside per-vertex
/// residuals.
///
/// Composition happens in f64 and is only truncated to `f32` at the
/// end, so the large reference coordinate never passes through `f32`
/// matrix math. The reference is expected to track the camera each
/// frame; a stale reference degrades precision gradually with camera
/// distance rather than failing.
pub fn relative_transform(host_matrix: &DMat4, reference: &MercatorPoint) -> Mat4 {
    let translated = *host_matrix * DMat4::from_translation(DVec3::new(reference.x, reference.y, 0.0));
    translated.as_mat4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_reconstructs_within_split_precision() {
        // World coordinates from realistic geographic positions,
        // including one exercising the full f64 mantissa. A (high, low)
        // f32 pair carries ~48 mantissa bits, so reconstruction is
        // bounded by ~2^-48 relative error rather than bit-exact.
        let samples = [
            0.0,
            0.5,
            0.816744833705,         // Mercator x near 114°E
            0.436029841432,         // Mercator y near 22.5°N
            0.8167448337054321987,
            -0.272352917,
            1.0 - 1e-9,
        ];
        for &value in &samples {
            let split = encode(value);
            let reconstructed = split.high as f64 + split.low as f64;
            let bound = value.abs().max(1e-30) * 2f64.powi(-46);
            assert!(
                (reconstructed - value).abs() <= bound,
                "value {}: reconstructed {}",
                value,
                reconstructed
            );
        }
    }

    #[test]
    fn test_encode_residual_is_small() {
        let split = encode(0.816744833705);
        // The residual is bounded by one f32 ulp of the high part.
        assert!(split.low.abs() < 1e-7);
    }

    #[test]
    fn test_relative_transform_cancels_reference() {
        let reference = MercatorPoint {
            x: 0.816744833705,
            y: 0.436029841432,
            z: 0.0,
        };
        let matrix = relative_transform(&DMat4::IDENTITY, &reference);

        // A vertex expressed relative to the reference lands back at the
        // reference's absolute position.
        let moved = matrix.transform_point3(glam::Vec3::ZERO);
        assert!((moved.x as f64 - reference.x).abs() < 1e-6);
        assert!((moved.y as f64 - reference.y).abs() < 1e-6);
    }

    #[test]
    fn test_relative_transform_preserves_projection() {
        let projection = DMat4::from_scale(DVec3::new(2.0, 2.0, 1.0));
        let reference = MercatorPoint {
            x: 0.25,
            y: 0.5,
            z: 0.0,
        };
        let matrix = relative_transform(&projection, &reference);

        let moved = matrix.transform_point3(glam::Vec3::new(0.1, 0.0, 0.0));
        // Scale applies to the translated position: (0.25 + 0.1) * 2.
        assert!((moved.x - 0.7).abs() < 1e-6);
        assert!((moved.y - 1.0).abs() < 1e-6);
    }
}
