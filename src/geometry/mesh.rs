//! Solid mesh buffers and multi-structure merging.

/// A solid 3D mesh as flat GPU-ready buffers.
///
/// `vertices` holds interleaved x/y/z triples in Mercator world units.
/// `face_indices` holds one index triple per triangle with consistent
/// winding; `edge_indices` holds one index pair per wireframe segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolidMesh {
    pub vertices: Vec<f32>,
    pub face_indices: Vec<u32>,
    pub edge_indices: Vec<u32>,
}

impl SolidMesh {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of vertices (position triples) in the mesh.
    pub fn vertex_count(&self) -> u32 {
        (self.vertices.len() / 3) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Merges independently built sub-meshes into one combined buffer
    /// set, rebasing every face and edge index by the running vertex
    /// total so the merged indices stay valid.
    ///
    /// Per-mesh topology is preserved exactly; an empty input yields an
    /// empty mesh.
    pub fn merge(meshes: Vec<SolidMesh>) -> SolidMesh {
        let mut merged = SolidMesh::empty();
        let mut base_index = 0u32;

        for mesh in meshes {
            merged.vertices.extend_from_slice(&mesh.vertices);
            merged
                .face_indices
                .extend(mesh.face_indices.iter().map(|i| i + base_index));
            merged
                .edge_indices
                .extend(mesh.edge_indices.iter().map(|i| i + base_index));
            base_index += mesh.vertex_count();
        }

        merged
    }

    /// True when every face and edge index addresses a valid vertex.
    pub fn indices_in_bounds(&self) -> bool {
        let count = self.vertex_count();
        self.face_indices.iter().all(|&i| i < count)
            && self.edge_indices.iter().all(|&i| i < count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh(offset: f32) -> SolidMesh {
        SolidMesh {
            vertices: vec![
                offset, 0.0, 0.0, //
                offset + 1.0, 0.0, 0.0, //
                offset + 1.0, 1.0, 0.0, //
                offset, 1.0, 0.0,
            ],
            face_indices: vec![0, 1, 2, 0, 2, 3],
            edge_indices: vec![0, 1, 1, 2, 2, 3, 3, 0],
        }
    }

    #[test]
    fn test_merge_empty_input() {
        let merged = SolidMesh::merge(vec![]);
        assert!(merged.is_empty());
        assert!(merged.face_indices.is_empty());
        assert!(merged.edge_indices.is_empty());
    }

    #[test]
    fn test_merge_single_mesh_is_identity() {
        let mesh = quad_mesh(0.0);
        let merged = SolidMesh::merge(vec![mesh.clone()]);
        assert_eq!(merged, mesh);
    }

    #[test]
    fn test_merge_rebases_indices() {
        let merged = SolidMesh::merge(vec![quad_mesh(0.0), quad_mesh(10.0)]);

        assert_eq!(merged.vertex_count(), 8);
        assert_eq!(merged.face_indices.len(), 12);
        assert_eq!(merged.edge_indices.len(), 16);

        // Second mesh's indices shifted by the first mesh's vertex count.
        assert_eq!(&merged.face_indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(&merged.edge_indices[8..], &[4, 5, 5, 6, 6, 7, 7, 4]);
        assert!(merged.indices_in_bounds());
    }

    #[test]
    fn test_merge_skips_empty_members() {
        let merged = SolidMesh::merge(vec![SolidMesh::empty(), quad_mesh(0.0)]);
        assert_eq!(merged, quad_mesh(0.0));
    }
}
