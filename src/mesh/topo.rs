//! Face-vertex mesh with precomputed adjacency.
//!
//! [`Mesh`] stores vertex positions and CCW-wound polygon faces, and derives
//! at construction everything the correlation algorithms query: per-vertex
//! neighbor rings, per-vertex face fans, and a directed-edge-to-face table.
//! All of it is read-only after construction; topology edits mean building a
//! new mesh.
//!
//! # Winding
//!
//! Faces are counter-clockwise wound as seen from outside the surface.
//! Construction orders each vertex's neighbor ring and face fan counter-
//! clockwise as well, by chaining wedges through the directed-edge table:
//! the face containing directed edge `(v, n)` sits between `n` and the next
//! neighbor counter-clockwise around `v`. On a boundary vertex the fan is
//! open; the walk starts at the boundary edge, so the ring still contains
//! every edge-adjacent vertex.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::{FaceId, VertexId};
use crate::error::MalformedMesh;

/// The two faces bordering a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeFaces {
    /// The face containing the edge in the queried direction `a -> b`.
    pub ccw: Option<FaceId>,
    /// The face containing the reverse direction `b -> a`.
    pub cw: Option<FaceId>,
}

/// An immutable polygon mesh with precomputed adjacency tables.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use topomatch::mesh::{Mesh, VertexId};
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let mesh = Mesh::new(positions, vec![vec![0, 1, 2]]).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.valence(VertexId::new(0)), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Point3<f64>>,
    face_verts: Vec<Vec<VertexId>>,
    /// CCW face fan per vertex (open fans on the boundary).
    vert_faces: Vec<Vec<FaceId>>,
    /// CCW edge-adjacent neighbor ring per vertex.
    vert_neighbors: Vec<Vec<VertexId>>,
    /// Sorted vertices sharing a face with each vertex, self excluded.
    verts_by_face: Vec<Vec<VertexId>>,
    edge_faces: HashMap<(VertexId, VertexId), EdgeFaces>,
}

impl Mesh {
    /// Build a mesh from vertex positions and CCW-wound polygon faces.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedMesh`] if a face index is out of range, a face is
    /// degenerate (fewer than three vertices, or a repeated vertex), or a
    /// directed edge is used by more than one face in the same winding
    /// direction (non-manifold).
    pub fn new(positions: Vec<Point3<f64>>, faces: Vec<Vec<usize>>) -> Result<Self, MalformedMesh> {
        let num_vertices = positions.len();
        let mut face_verts: Vec<Vec<VertexId>> = Vec::with_capacity(faces.len());

        for (fi, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MalformedMesh::DegenerateFace { face: fi });
            }
            for (a, &va) in face.iter().enumerate() {
                if va >= num_vertices {
                    return Err(MalformedMesh::FaceIndexOutOfRange {
                        face: fi,
                        vertex: va,
                        num_vertices,
                    });
                }
                if face[a + 1..].contains(&va) {
                    return Err(MalformedMesh::DegenerateFace { face: fi });
                }
            }
            face_verts.push(face.iter().map(|&v| VertexId::new(v)).collect());
        }

        // Directed edge -> containing face. A collision here is exactly the
        // non-manifold condition.
        let mut hedge: HashMap<(VertexId, VertexId), FaceId> = HashMap::new();
        let mut neighbor_sets: Vec<Vec<VertexId>> = vec![Vec::new(); num_vertices];

        for (fi, verts) in face_verts.iter().enumerate() {
            let fid = FaceId::new(fi);
            for j in 0..verts.len() {
                let a = verts[(j + verts.len() - 1) % verts.len()];
                let b = verts[j];
                if hedge.insert((a, b), fid).is_some() {
                    return Err(MalformedMesh::NonManifoldEdge {
                        from: a.index(),
                        to: b.index(),
                    });
                }
                push_unique(&mut neighbor_sets[a.index()], b);
                push_unique(&mut neighbor_sets[b.index()], a);
            }
        }

        let mut vert_neighbors: Vec<Vec<VertexId>> = Vec::with_capacity(num_vertices);
        let mut vert_faces: Vec<Vec<FaceId>> = Vec::with_capacity(num_vertices);

        for v in 0..num_vertices {
            let vid = VertexId::new(v);
            let (ring, fans) = order_fan(vid, &neighbor_sets[v], &hedge, &face_verts);
            vert_neighbors.push(ring);
            vert_faces.push(fans);
        }

        let mut verts_by_face: Vec<Vec<VertexId>> = Vec::with_capacity(num_vertices);
        for v in 0..num_vertices {
            let vid = VertexId::new(v);
            let mut shared: Vec<VertexId> = vert_faces[v]
                .iter()
                .flat_map(|f| face_verts[f.index()].iter().copied())
                .filter(|&w| w != vid)
                .collect();
            shared.sort_unstable();
            shared.dedup();
            verts_by_face.push(shared);
        }

        let mut edge_faces = HashMap::new();
        for (v, ring) in vert_neighbors.iter().enumerate() {
            let vid = VertexId::new(v);
            for &n in ring {
                edge_faces.insert(
                    (vid, n),
                    EdgeFaces {
                        ccw: hedge.get(&(vid, n)).copied(),
                        cw: hedge.get(&(n, vid)).copied(),
                    },
                );
            }
        }

        Ok(Self {
            positions,
            face_verts,
            vert_faces,
            vert_neighbors,
            verts_by_face,
            edge_faces,
        })
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.face_verts.len()
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.positions[v.index()]
    }

    /// Get all vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Get the CCW-wound vertices of a face.
    #[inline]
    pub fn face_verts(&self, f: FaceId) -> &[VertexId] {
        &self.face_verts[f.index()]
    }

    /// Get the CCW-ordered faces incident to a vertex.
    #[inline]
    pub fn vert_faces(&self, v: VertexId) -> &[FaceId] {
        &self.vert_faces[v.index()]
    }

    /// Iterate over all vertex ids.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.positions.len()).map(VertexId::new)
    }

    /// Iterate over all face ids.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.face_verts.len()).map(FaceId::new)
    }

    // ==================== Topology Queries ====================

    /// Get all vertices that share an edge with the given vertex.
    ///
    /// Winding guaranteed counter-clockwise; an open ring on the boundary
    /// starts at the boundary edge.
    #[inline]
    pub fn adjacent_verts_by_edge(&self, v: VertexId) -> &[VertexId] {
        &self.vert_neighbors[v.index()]
    }

    /// Get all vertices that share a face with the given vertex.
    ///
    /// Sorted by index, the vertex itself excluded; winding not guaranteed.
    #[inline]
    pub fn adjacent_verts_by_face(&self, v: VertexId) -> &[VertexId] {
        &self.verts_by_face[v.index()]
    }

    /// Get the faces across each edge of the given face.
    ///
    /// One entry per edge with a neighbor, in CCW edge order; boundary
    /// edges contribute nothing.
    pub fn adjacent_faces_by_edge(&self, f: FaceId) -> Vec<FaceId> {
        let verts = &self.face_verts[f.index()];
        let mut out = Vec::with_capacity(verts.len());
        for j in 0..verts.len() {
            let a = verts[(j + verts.len() - 1) % verts.len()];
            let b = verts[j];
            if let Some(edge) = self.edge_faces.get(&(a, b)) {
                if let Some(rev) = edge.cw {
                    out.push(rev);
                }
            }
        }
        out
    }

    /// Get all faces that share at least one vertex with the given face.
    ///
    /// Sorted by index, the face itself excluded.
    pub fn adjacent_faces_by_vert(&self, f: FaceId) -> Vec<FaceId> {
        let mut out: Vec<FaceId> = self.face_verts[f.index()]
            .iter()
            .flat_map(|v| self.vert_faces[v.index()].iter().copied())
            .filter(|&g| g != f)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Look up the faces bordering the directed edge `a -> b`.
    ///
    /// Returns `None` when `a` and `b` are not edge-adjacent. Either face
    /// of the result may be absent on a boundary edge.
    #[inline]
    pub fn edge_faces(&self, a: VertexId, b: VertexId) -> Option<EdgeFaces> {
        self.edge_faces.get(&(a, b)).copied()
    }

    /// Compute the valence (edge-adjacent neighbor count) of a vertex.
    #[inline]
    pub fn valence(&self, v: VertexId) -> usize {
        self.vert_neighbors[v.index()].len()
    }

    // ==================== Geometry ====================

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }
}

fn push_unique(list: &mut Vec<VertexId>, v: VertexId) {
    if !list.contains(&v) {
        list.push(v);
    }
}

/// Order a vertex's neighbors and incident faces counter-clockwise.
///
/// Chases wedges through the directed-edge table: from neighbor `n`, the
/// face containing `(v, n)` also contains the next CCW neighbor as the
/// vertex preceding `v` in its winding. Open fans start at a boundary
/// neighbor (one with no face containing `(n, v)`); any fan left over (a
/// closed fan, or a second umbrella on a bowtie vertex) starts at its
/// smallest remaining neighbor, keeping enumeration deterministic.
fn order_fan(
    vid: VertexId,
    neighbors: &[VertexId],
    hedge: &HashMap<(VertexId, VertexId), FaceId>,
    face_verts: &[Vec<VertexId>],
) -> (Vec<VertexId>, Vec<FaceId>) {
    let mut remaining: Vec<VertexId> = neighbors.to_vec();
    remaining.sort_unstable();

    let mut boundary_starts: Vec<VertexId> = remaining
        .iter()
        .copied()
        .filter(|&n| !hedge.contains_key(&(n, vid)))
        .collect();
    boundary_starts.reverse(); // pop() yields smallest first

    let mut ring = Vec::with_capacity(remaining.len());
    let mut fans = Vec::new();

    while !remaining.is_empty() {
        let segment_start = loop {
            match boundary_starts.pop() {
                Some(s) if remaining.contains(&s) => break s,
                Some(_) => continue,
                None => break remaining[0],
            }
        };

        let mut n = segment_start;
        loop {
            ring.push(n);
            remaining.retain(|&r| r != n);
            let Some(&f) = hedge.get(&(vid, n)) else {
                break;
            };
            fans.push(f);
            let next = prev_in_face(&face_verts[f.index()], vid);
            if next == segment_start || !remaining.contains(&next) {
                break;
            }
            n = next;
        }
    }

    (ring, fans)
}

/// The vertex preceding `v` in a face's CCW winding.
fn prev_in_face(verts: &[VertexId], v: VertexId) -> VertexId {
    let pos = verts.iter().position(|&w| w == v).unwrap_or(0);
    verts[(pos + verts.len() - 1) % verts.len()]
}
