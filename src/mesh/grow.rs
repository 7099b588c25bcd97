//! Selection-growth primitives.
//!
//! A "grow" expands a set of vertices outward by one hop of edge- or
//! face-adjacency. These are the building blocks of island flood-fill,
//! seed self-distance measurement, and correspondence growth. Every
//! function takes its sets by reference and returns freshly-built sets;
//! nothing is mutated in place, which keeps the callers' iteration state
//! trivial to reason about.

use std::collections::{BTreeMap, BTreeSet};

use super::index::VertexId;
use super::topo::Mesh;

/// An owned, ordered set of vertex indices.
///
/// Ordered so that every iteration over grown sets is deterministic.
pub type VertSet = BTreeSet<VertexId>;

/// Grow a vertex set one hop along edges.
///
/// Returns `(grown, next_exclude)`: the edge-adjacent vertices not in
/// `exclude`, and the exclusion set for a follow-up hop
/// (`exclude ∪ grow`). Repeated calls walk breadth-first rings outward:
///
/// ```
/// use nalgebra::Point3;
/// use topomatch::mesh::{grow_by_edge, Mesh, VertexId, VertSet};
///
/// let mesh = Mesh::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.5, 1.0, 0.0),
///     ],
///     vec![vec![0, 1, 2]],
/// )
/// .unwrap();
/// let seed: VertSet = [VertexId::new(0)].into_iter().collect();
/// let (grown, _) = grow_by_edge(&mesh, &seed, &VertSet::new());
/// assert_eq!(grown.len(), 2);
/// ```
pub fn grow_by_edge(mesh: &Mesh, grow: &VertSet, exclude: &VertSet) -> (VertSet, VertSet) {
    grow_with(grow, exclude, |v| mesh.adjacent_verts_by_edge(v))
}

/// Grow a vertex set one hop along shared faces.
///
/// Same contract as [`grow_by_edge`], reaching every vertex that shares a
/// face with a member of `grow`.
pub fn grow_by_face(mesh: &Mesh, grow: &VertSet, exclude: &VertSet) -> (VertSet, VertSet) {
    grow_with(grow, exclude, |v| mesh.adjacent_verts_by_face(v))
}

fn grow_with<'a, F>(grow: &VertSet, exclude: &VertSet, adjacent: F) -> (VertSet, VertSet)
where
    F: Fn(VertexId) -> &'a [VertexId],
{
    let mut grown = VertSet::new();
    for &v in grow {
        grown.extend(adjacent(v).iter().copied());
    }
    let grown: VertSet = grown.difference(exclude).copied().collect();
    let next_exclude: VertSet = exclude.union(grow).copied().collect();
    (grown, next_exclude)
}

/// Grow a vertex set along edges and faces, tracking where each frontier
/// vertex was grown from.
///
/// For every vertex adjacent to `grow` but outside `all`, records the set
/// of grow-set members that reach it by edge and by face — the raw
/// material of a local-adjacency signature. Grow-set members with no
/// remaining outside neighbors are used up and dropped from the returned
/// grow set.
pub(crate) fn grow_tracked(
    mesh: &Mesh,
    grow: &VertSet,
    all: &VertSet,
) -> (OriginMap, OriginMap, VertSet) {
    let mut edge_origins = OriginMap::new();
    let mut face_origins = OriginMap::new();
    let mut next_grow = VertSet::new();

    for &v in grow {
        let mut found = false;
        for &e in mesh.adjacent_verts_by_edge(v) {
            if !all.contains(&e) {
                found = true;
                edge_origins.entry(e).or_default().insert(v);
            }
        }
        for &f in mesh.adjacent_verts_by_face(v) {
            if !all.contains(&f) {
                found = true;
                face_origins.entry(f).or_default().insert(v);
            }
        }
        if found {
            next_grow.insert(v);
        }
    }

    (edge_origins, face_origins, next_grow)
}

/// Frontier vertex -> the matched vertices that grew into it.
pub(crate) type OriginMap = BTreeMap<VertexId, VertSet>;

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;

    fn vs(ids: &[usize]) -> VertSet {
        ids.iter().map(|&i| VertexId::new(i)).collect()
    }

    /// Two triangles sharing the edge (1, 2).
    fn bowtie_strip() -> Mesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(1.5, 1.0, 0.0),
        ];
        Mesh::new(positions, vec![vec![0, 1, 2], vec![1, 3, 2]]).unwrap()
    }

    #[test]
    fn test_grow_by_edge_rings() {
        let mesh = bowtie_strip();
        let seed = vs(&[0]);
        let (ring1, exclude) = grow_by_edge(&mesh, &seed, &VertSet::new());
        assert_eq!(ring1, vs(&[1, 2]));
        let (ring2, _) = grow_by_edge(&mesh, &ring1, &exclude);
        // 1 and 2 are mutually adjacent but only 0 is excluded so far.
        assert_eq!(ring2, vs(&[1, 2, 3]));
    }

    #[test]
    fn test_grow_by_face_reaches_across() {
        let mesh = bowtie_strip();
        let (grown, _) = grow_by_face(&mesh, &vs(&[0]), &VertSet::new());
        assert_eq!(grown, vs(&[1, 2]));
        let (grown, _) = grow_by_face(&mesh, &vs(&[1]), &VertSet::new());
        assert_eq!(grown, vs(&[0, 2, 3]));
    }

    #[test]
    fn test_grow_tracked_origins() {
        let mesh = bowtie_strip();
        let matched = vs(&[0, 1]);
        let (edge, face, grow) = grow_tracked(&mesh, &matched, &matched);
        // 2 is edge-adjacent to both; 3 only to 1.
        assert_eq!(edge[&VertexId::new(2)], vs(&[0, 1]));
        assert_eq!(edge[&VertexId::new(3)], vs(&[1]));
        assert_eq!(face[&VertexId::new(2)], vs(&[0, 1]));
        assert_eq!(face[&VertexId::new(3)], vs(&[1]));
        assert_eq!(grow, vs(&[0, 1]));
    }

    #[test]
    fn test_grow_tracked_drops_used_up() {
        let mesh = bowtie_strip();
        let all = vs(&[0, 1, 2, 3]);
        let (edge, _, grow) = grow_tracked(&mesh, &vs(&[0, 1]), &all);
        assert!(edge.is_empty());
        assert!(grow.is_empty());
    }
}
