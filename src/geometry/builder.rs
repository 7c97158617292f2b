//! Solid geometry construction from polygon chains.
//!
//! Extrudes an implicitly-closed geographic ring into a prism: one
//! bottom and one top vertex per ring point, cap triangles fanned from
//! the first bottom/top vertices, and quad sides split into triangle
//! pairs. Cap winding follows the deck convention throughout (bottom
//! caps face down, top caps face up).

use crate::coord::{meter_in_mercator_units, MercatorPoint, PolygonChain};
use crate::error::LayerError;

use super::SolidMesh;

/// Builds a solid mesh from one polygon chain.
///
/// Each ring point contributes a bottom vertex at its own altitude (or
/// `base_height` meters when none is set) and a top vertex offset by
/// `thickness` meters, both converted to Mercator units at the chain's
/// reference latitude. Vertex `2i` is the bottom of point `i`, `2i + 1`
/// its top.
///
/// Fails with [`LayerError::InvalidGeometry`] for chains of fewer than
/// two points, before any GPU work is issued.
pub fn build_solid(
    chain: &PolygonChain,
    base_height: f64,
    thickness: f64,
) -> Result<SolidMesh, LayerError> {
    if chain.is_empty() {
        return Err(LayerError::InvalidGeometry(
            "polygon chain is empty".to_string(),
        ));
    }
    if chain.len() < 2 {
        return Err(LayerError::InvalidGeometry(format!(
            "polygon chain needs at least 2 points, got {}",
            chain.len()
        )));
    }

    // Meter offsets are scaled at the first point's latitude; chains
    // small enough to render as one structure do not span latitudes
    // where the difference matters.
    let reference = chain.first().ok_or_else(|| {
        LayerError::InvalidGeometry("polygon chain has no reference point".to_string())
    })?;
    let thickness_in_mercator = thickness * meter_in_mercator_units(reference.lat());

    let mut mesh = SolidMesh::empty();

    for point in chain.points() {
        let coord = MercatorPoint::from_geo(point, base_height);
        mesh.vertices
            .extend_from_slice(&[coord.x as f32, coord.y as f32, coord.z as f32]);
        mesh.vertices.extend_from_slice(&[
            coord.x as f32,
            coord.y as f32,
            (coord.z + thickness_in_mercator) as f32,
        ]);
    }

    let n = chain.len() as u32;
    for i in 0..n - 1 {
        // Caps fan out from the first bottom/top vertex, wrapping
        // modulo the ring length to close the last segment.
        let next = (i + 2) % n;
        mesh.face_indices.extend_from_slice(&[0, next * 2, (i + 1) * 2]);
        mesh.face_indices
            .extend_from_slice(&[1, (i + 1) * 2 + 1, next * 2 + 1]);

        // Side quad between point i and point i+1, split into two
        // triangles with outward winding.
        mesh.face_indices
            .extend_from_slice(&[i * 2, (i + 1) * 2, i * 2 + 1]);
        mesh.face_indices
            .extend_from_slice(&[(i + 1) * 2, (i + 1) * 2 + 1, i * 2 + 1]);

        // Wireframe: bottom, top, and vertical edge per point.
        mesh.edge_indices.extend_from_slice(&[
            i * 2,
            (i + 1) * 2,
            i * 2 + 1,
            (i + 1) * 2 + 1,
            i * 2,
            i * 2 + 1,
        ]);
    }

    // Closing edges from the last point back to point 0.
    mesh.edge_indices.extend_from_slice(&[
        (n - 1) * 2,
        0,
        (n - 1) * 2 + 1,
        1,
        (n - 1) * 2,
        (n - 1) * 2 + 1,
    ]);

    Ok(mesh)
}

/// Builds and merges solids for a set of chains sharing one
/// height/thickness pair (for example all piers of a bridge).
pub fn build_solids(
    chains: &[PolygonChain],
    base_height: f64,
    thickness: f64,
) -> Result<SolidMesh, LayerError> {
    let meshes = chains
        .iter()
        .map(|chain| build_solid(chain, base_height, thickness))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SolidMesh::merge(meshes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoPoint;

    fn square_chain() -> PolygonChain {
        PolygonChain::from(vec![
            (114.0280, 22.4720),
            (114.0284, 22.4720),
            (114.0284, 22.4724),
            (114.0280, 22.4724),
        ])
    }

    #[test]
    fn test_rejects_degenerate_chains() {
        let empty = PolygonChain::new(vec![]);
        assert!(matches!(
            build_solid(&empty, 0.0, 1.0),
            Err(LayerError::InvalidGeometry(_))
        ));

        let single = PolygonChain::new(vec![GeoPoint::new(114.0, 22.5)]);
        assert!(matches!(
            build_solid(&single, 0.0, 1.0),
            Err(LayerError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_square_structure_counts() {
        let mesh = build_solid(&square_chain(), 5.0, 1.0).unwrap();
        let n = 4u32;

        // Two vertices per ring point.
        assert_eq!(mesh.vertex_count(), 2 * n);
        // Per segment: 2 cap triangles + 2 side triangles.
        assert_eq!(mesh.face_indices.len() as u32, (n - 1) * 4 * 3);
        // Three wireframe segments per point, closing set included.
        assert_eq!(mesh.edge_indices.len() as u32, n * 3 * 2);

        assert!(mesh.indices_in_bounds());
    }

    #[test]
    fn test_vertex_layout_bottom_top_pairs() {
        let mesh = build_solid(&square_chain(), 5.0, 2.0).unwrap();

        for i in 0..4 {
            let bottom = &mesh.vertices[i * 6..i * 6 + 3];
            let top = &mesh.vertices[i * 6 + 3..i * 6 + 6];
            // Same plan position, top strictly above bottom.
            assert_eq!(bottom[0], top[0]);
            assert_eq!(bottom[1], top[1]);
            assert!(top[2] > bottom[2]);
        }
    }

    #[test]
    fn test_per_point_altitude_overrides_default() {
        let chain = PolygonChain::new(vec![
            GeoPoint::with_altitude(114.0280, 22.4720, 20.0),
            GeoPoint::new(114.0284, 22.4720),
            GeoPoint::new(114.0284, 22.4724),
        ]);
        let mesh = build_solid(&chain, 5.0, 1.0).unwrap();

        let scale = meter_in_mercator_units(22.4720);
        let first_bottom_z = mesh.vertices[2] as f64;
        let second_bottom_z = mesh.vertices[8] as f64;
        assert!((first_bottom_z - 20.0 * scale).abs() < 1e-9);
        assert!((second_bottom_z - 5.0 * scale).abs() < 1e-9);
    }

    #[test]
    fn test_ring_closure_edges_present() {
        let mesh = build_solid(&square_chain(), 0.0, 1.0).unwrap();
        let pairs: Vec<(u32, u32)> = mesh
            .edge_indices
            .chunks(2)
            .map(|c| (c[0], c[1]))
            .collect();

        // Last point connects back to point 0 along bottom and top.
        assert!(pairs.contains(&(6, 0)));
        assert!(pairs.contains(&(7, 1)));
        // Every point has its vertical edge.
        for i in 0..4 {
            assert!(pairs.contains(&(i * 2, i * 2 + 1)));
        }
    }

    #[test]
    fn test_consistent_cap_winding() {
        // All bottom caps share anchor vertex 0, all top caps anchor 1.
        let mesh = build_solid(&square_chain(), 0.0, 1.0).unwrap();
        for segment in mesh.face_indices.chunks(12) {
            assert_eq!(segment[0], 0);
            assert_eq!(segment[3], 1);
        }
    }

    #[test]
    fn test_build_solids_merges_piers() {
        let piers = vec![square_chain(), square_chain()];
        let merged = build_solids(&piers, 0.0, 12.0).unwrap();
        let single = build_solid(&square_chain(), 0.0, 12.0).unwrap();

        assert_eq!(merged.vertex_count(), 2 * single.vertex_count());
        assert_eq!(merged.face_indices.len(), 2 * single.face_indices.len());
        assert!(merged.indices_in_bounds());

        // Second pier's first face index is rebased past the first pier.
        let offset = single.vertex_count();
        assert_eq!(
            merged.face_indices[single.face_indices.len()],
            single.face_indices[0] + offset
        );
    }

    #[test]
    fn test_build_solids_empty_input() {
        let merged = build_solids(&[], 0.0, 1.0).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_two_point_chain_is_accepted() {
        // A two-point chain produces a degenerate (zero-area) slab but
        // valid, in-bounds topology.
        let chain = PolygonChain::from(vec![(114.0280, 22.4720), (114.0284, 22.4724)]);
        let mesh = build_solid(&chain, 0.0, 1.0).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.indices_in_bounds());
    }
}
