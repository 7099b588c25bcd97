//! Connected-component (island) extraction.
//!
//! An island is a maximal face-connected subset of a mesh's vertices, with
//! its incident faces along for the ride. Two meshes can only correspond
//! island-by-island, so partitioning is the first step of every full-mesh
//! match.

use nalgebra::Point3;

use super::grow::{grow_by_face, VertSet};
use super::index::{FaceId, VertexId};
use super::topo::Mesh;

/// A maximal face-connected vertex/face subset of one mesh.
///
/// Immutable once built; created by [`partition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Island {
    verts: Vec<VertexId>,
    faces: Vec<FaceId>,
}

impl Island {
    /// The island's vertices, sorted by index.
    #[inline]
    pub fn verts(&self) -> &[VertexId] {
        &self.verts
    }

    /// The island's faces, sorted by index.
    #[inline]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Number of vertices in the island.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    /// Number of faces in the island.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The `(vertex_count, face_count)` signature used for cheap
    /// island-to-island pre-matching.
    #[inline]
    pub fn signature(&self) -> (usize, usize) {
        (self.verts.len(), self.faces.len())
    }

    /// Whether the island contains a vertex.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.verts.binary_search(&v).is_ok()
    }

    /// The center of the island's axis-aligned bounding box.
    ///
    /// Used as a coordinate tie-breaker when several islands share a
    /// signature.
    pub fn bounding_center(&self, mesh: &Mesh) -> Point3<f64> {
        let mut min = *mesh.position(self.verts[0]);
        let mut max = min;
        for &v in &self.verts {
            let p = mesh.position(v);
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Point3::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        )
    }
}

/// Split a mesh into its maximal face-connected islands.
///
/// Flood-fills by face adjacency from the smallest unvisited vertex until
/// the mesh is exhausted. The partition itself does not depend on the pop
/// order; picking the smallest keeps the enumeration order deterministic.
/// An isolated vertex forms a single-vertex island with zero faces.
pub fn partition(mesh: &Mesh) -> Vec<Island> {
    let mut unvisited: VertSet = mesh.vertex_ids().collect();
    let mut islands = Vec::new();

    while let Some(&start) = unvisited.iter().next() {
        let mut seed: VertSet = [start].into_iter().collect();
        let mut island = VertSet::new();
        while !seed.is_empty() {
            let (next_seed, next_island) = grow_by_face(mesh, &seed, &island);
            seed = next_seed;
            island = next_island;
        }
        for v in &island {
            unvisited.remove(v);
        }

        let mut faces: Vec<FaceId> = island
            .iter()
            .flat_map(|v| mesh.vert_faces(*v).iter().copied())
            .collect();
        faces.sort_unstable();
        faces.dedup();

        islands.push(Island {
            verts: island.into_iter().collect(),
            faces,
        });
    }

    islands
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    /// Two triangles far apart, plus one isolated vertex.
    fn three_piece_mesh() -> Mesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(11.0, 0.0, 0.0),
            Point3::new(10.5, 1.0, 0.0),
            Point3::new(-5.0, -5.0, -5.0),
        ];
        Mesh::new(positions, vec![vec![0, 1, 2], vec![3, 4, 5]]).unwrap()
    }

    #[test]
    fn test_single_island() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![vec![0, 1, 2]]).unwrap();
        let islands = partition(&mesh);
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].signature(), (3, 1));
    }

    #[test]
    fn test_separate_islands() {
        let mesh = three_piece_mesh();
        let islands = partition(&mesh);
        assert_eq!(islands.len(), 3);
        // Enumerated by smallest contained vertex.
        assert_eq!(islands[0].verts(), &[v(0), v(1), v(2)]);
        assert_eq!(islands[1].verts(), &[v(3), v(4), v(5)]);
        assert_eq!(islands[2].verts(), &[v(6)]);
        assert_eq!(islands[2].signature(), (1, 0));
    }

    #[test]
    fn test_contains() {
        let mesh = three_piece_mesh();
        let islands = partition(&mesh);
        assert!(islands[0].contains(v(2)));
        assert!(!islands[0].contains(v(3)));
    }

    #[test]
    fn test_bounding_center() {
        let mesh = three_piece_mesh();
        let islands = partition(&mesh);
        let center = islands[1].bounding_center(&mesh);
        assert_relative_eq!(center.x, 10.5);
        assert_relative_eq!(center.y, 0.5);
        assert_relative_eq!(center.z, 0.0);
    }
}
