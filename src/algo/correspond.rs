//! Topology-driven correspondence growth.
//!
//! Starting from a small trusted seed of vertex pairs, the grower expands a
//! known correspondence outward one adjacency hop at a time. Each iteration
//! computes, on both meshes independently, the frontier of vertices
//! adjacent to the matched set; every frontier vertex carries a signature —
//! the set of matched vertices that reach it by edge and by face. When a
//! signature identifies exactly one vertex on the order mesh and its
//! translation identifies exactly one vertex on the shape mesh, those two
//! vertices are the same vertex in both numberings.
//!
//! Example: say `v6` on the order mesh is an edge away from `(v3, v5)` and
//! a face away from `(v3, v5, v4)`, while `v9` on the shape mesh is an edge
//! away from `(v13, v2)` and a face away from `(v13, v2, v6)`. If the
//! correspondence already holds `3 -> 13`, `5 -> 2`, and `4 -> 6`, then
//! substituting the known pairs shows the two vertices are equivalent and
//! `6 -> 9` joins the correspondence.
//!
//! Growth either covers the meshes completely or fails with a typed
//! [`MismatchReason`] — there is no partial result.

use std::collections::BTreeMap;

use log::trace;

use crate::error::{MatchError, MismatchReason};
use crate::mesh::{grow_tracked, Mesh, OriginMap, VertSet, VertexId};

use super::progress::Progress;

/// A strictly injective, insert-only map between two meshes' vertices.
///
/// Grows from the seed set during matching and is never mutated otherwise;
/// the inverse direction is maintained alongside so both lookups are O(log n).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correspondence {
    forward: BTreeMap<VertexId, VertexId>,
    inverse: BTreeMap<VertexId, VertexId>,
}

impl Correspondence {
    /// Create an empty correspondence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matched pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether no pairs have been matched.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Map an order-mesh vertex to its shape-mesh counterpart.
    #[inline]
    pub fn translate(&self, order: VertexId) -> Option<VertexId> {
        self.forward.get(&order).copied()
    }

    /// Map a shape-mesh vertex back to its order-mesh counterpart.
    #[inline]
    pub fn translate_back(&self, shape: VertexId) -> Option<VertexId> {
        self.inverse.get(&shape).copied()
    }

    /// Whether an order-mesh vertex is matched.
    #[inline]
    pub fn contains_order(&self, order: VertexId) -> bool {
        self.forward.contains_key(&order)
    }

    /// Whether a shape-mesh vertex is matched.
    #[inline]
    pub fn contains_shape(&self, shape: VertexId) -> bool {
        self.inverse.contains_key(&shape)
    }

    /// Iterate over `(order, shape)` pairs in order-vertex order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.forward.iter().map(|(&o, &s)| (o, s))
    }

    /// All `(order, shape)` pairs, sorted by order vertex.
    pub fn pairs(&self) -> Vec<(VertexId, VertexId)> {
        self.iter().collect()
    }

    /// Insert a pair. Returns `false` (and changes nothing) if either side
    /// is already matched.
    pub(crate) fn insert(&mut self, order: VertexId, shape: VertexId) -> bool {
        if self.forward.contains_key(&order) || self.inverse.contains_key(&shape) {
            return false;
        }
        self.forward.insert(order, shape);
        self.inverse.insert(shape, order);
        true
    }

    /// Absorb another correspondence over a disjoint vertex range.
    pub(crate) fn merge(&mut self, other: Correspondence) {
        for (o, s) in other.iter() {
            let fresh = self.insert(o, s);
            debug_assert!(fresh, "islands must not overlap");
        }
    }
}

/// Options for [`match_by_topology`].
#[derive(Debug, Default)]
pub struct CrawlOptions {
    /// Treat the seed as mirrored indices on a single mesh, matching one
    /// symmetrical half against the other. Vertices that match themselves
    /// lie on the symmetry line and are excluded from the result instead
    /// of paired.
    pub symmetry: bool,

    /// Progress callback, invoked once per growth iteration.
    pub progress: Progress,
}

impl CrawlOptions {
    /// Enable symmetry mode.
    pub fn with_symmetry(mut self) -> Self {
        self.symmetry = true;
        self
    }

    /// Set the progress callback.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }
}

/// A frontier vertex's identity: the matched vertices that grew into it by
/// edge and by face.
type Signature = (VertSet, VertSet);

/// The growth state machine. Each [`step`](Grower::step) either makes
/// progress, reaches a fixed point, or fails with a [`MismatchReason`];
/// [`run`](Grower::run) drives it to completion and enforces full coverage.
pub(crate) struct Grower<'a> {
    order: &'a Mesh,
    shape: &'a Mesh,
    map: Correspondence,
    order_matched: VertSet,
    shape_matched: VertSet,
    order_grow: VertSet,
    shape_grow: VertSet,
    /// Symmetry-line vertices (symmetry mode only).
    centers: VertSet,
    symmetry: bool,
    expected: usize,
    percent_total: f64,
}

impl<'a> Grower<'a> {
    /// Validate a seed and build the initial growth state.
    ///
    /// `expected` is the pair count full coverage requires (the paired
    /// islands' vertex count; in symmetry mode the whole mesh is covered
    /// by pairs and centers together).
    pub(crate) fn seeded(
        order: &'a Mesh,
        shape: &'a Mesh,
        seed_pairs: &[(VertexId, VertexId)],
        symmetry: bool,
        expected: usize,
    ) -> Result<Self, MismatchReason> {
        let mut map = Correspondence::new();
        let mut order_matched = VertSet::new();
        let mut shape_matched = VertSet::new();

        for &(o, s) in seed_pairs {
            if o.index() >= order.num_vertices() {
                return Err(MismatchReason::SeedOutOfRange {
                    vert: o,
                    num_vertices: order.num_vertices(),
                });
            }
            if s.index() >= shape.num_vertices() {
                return Err(MismatchReason::SeedOutOfRange {
                    vert: s,
                    num_vertices: shape.num_vertices(),
                });
            }
            if map.contains_order(o) {
                return Err(MismatchReason::DuplicateSeed { vert: o });
            }
            if map.contains_shape(s) {
                return Err(MismatchReason::DuplicateSeed { vert: s });
            }
            map.insert(o, s);
            order_matched.insert(o);
            shape_matched.insert(s);
        }

        let percent_total = if symmetry {
            expected as f64 / 2.0
        } else {
            expected as f64
        };

        Ok(Self {
            order,
            shape,
            order_grow: order_matched.clone(),
            shape_grow: shape_matched.clone(),
            map,
            order_matched,
            shape_matched,
            centers: VertSet::new(),
            symmetry,
            expected,
            percent_total,
        })
    }

    /// Run one growth iteration. Returns whether any new pair was matched.
    fn step(&mut self) -> Result<bool, MismatchReason> {
        let (order_all, shape_all) = if self.symmetry {
            // One shared exclusion set lets the two "meshes" be the two
            // mirrored halves of a single mesh.
            let mut all: VertSet = self
                .order_matched
                .union(&self.shape_matched)
                .copied()
                .collect();
            all.extend(self.centers.iter().copied());
            (all.clone(), all)
        } else {
            (self.order_matched.clone(), self.shape_matched.clone())
        };

        let (order_edge, order_face, order_grow) =
            grow_tracked(self.order, &self.order_grow, &order_all);
        let (shape_edge, shape_face, shape_grow) =
            grow_tracked(self.shape, &self.shape_grow, &shape_all);
        self.order_grow = order_grow;
        self.shape_grow = shape_grow;

        let order_sigs = flip_origins(&order_edge, &order_face);
        let shape_sigs = flip_origins(&shape_edge, &shape_face);

        let mut progressed = false;
        for (sig, verts) in &order_sigs {
            if verts.len() != 1 {
                continue;
            }
            let Some(translated) = self.translate_signature(sig) else {
                continue;
            };
            let Some(candidates) = shape_sigs.get(&translated) else {
                return Err(MismatchReason::NoCandidate {
                    order_area: sig.0.union(&sig.1).copied().collect(),
                    shape_area: translated.0.union(&translated.1).copied().collect(),
                });
            };
            if candidates.len() != 1 {
                return Err(MismatchReason::MultipleCandidates {
                    order_vert: verts[0],
                    shape_verts: candidates.clone(),
                });
            }

            let (o, s) = (verts[0], candidates[0]);
            if self.symmetry && o == s {
                self.centers.insert(o);
            } else {
                let fresh = self.map.insert(o, s);
                debug_assert!(fresh, "frontier vertices are unmatched by construction");
                self.order_matched.insert(o);
                self.order_grow.insert(o);
                self.shape_matched.insert(s);
                self.shape_grow.insert(s);
            }
            progressed = true;
        }

        Ok(progressed)
    }

    /// Grow to a fixed point and require full coverage.
    pub(crate) fn run(
        mut self,
        progress: &Progress,
        label: &str,
    ) -> Result<Correspondence, MismatchReason> {
        loop {
            progress.report_count(self.order_matched.len(), self.percent_total, label);
            if !self.step()? {
                break;
            }
        }
        trace!(
            "growth fixed point: {} pairs, {} centers",
            self.map.len(),
            self.centers.len()
        );

        if self.symmetry {
            let mut covered: VertSet = self
                .order_matched
                .union(&self.shape_matched)
                .copied()
                .collect();
            covered.extend(self.centers.iter().copied());
            if covered.len() != self.order.num_vertices() {
                return Err(MismatchReason::Incomplete {
                    matched: covered.len(),
                    expected: self.order.num_vertices(),
                });
            }
        } else if self.map.len() != self.expected {
            return Err(MismatchReason::Incomplete {
                matched: self.map.len(),
                expected: self.expected,
            });
        }

        progress.report(100.0, label);
        Ok(self.map)
    }

    /// Translate a signature's origin vertices through the correspondence.
    fn translate_signature(&self, sig: &Signature) -> Option<Signature> {
        let mut edge = VertSet::new();
        for &v in &sig.0 {
            edge.insert(self.map.translate(v)?);
        }
        let mut face = VertSet::new();
        for &v in &sig.1 {
            face.insert(self.map.translate(v)?);
        }
        Some((edge, face))
    }
}

/// Re-key the two origin maps by their combined `(edge set, face set)`
/// signature, so a unique signature pins down a unique frontier vertex.
fn flip_origins(edge: &OriginMap, face: &OriginMap) -> BTreeMap<Signature, Vec<VertexId>> {
    let frontier: VertSet = edge.keys().chain(face.keys()).copied().collect();
    let mut out: BTreeMap<Signature, Vec<VertexId>> = BTreeMap::new();
    for v in frontier {
        let e = edge.get(&v).cloned().unwrap_or_default();
        let f = face.get(&v).cloned().unwrap_or_default();
        out.entry((e, f)).or_default().push(v);
    }
    out
}

/// Match the topology of two meshes with different vertex orders.
///
/// Provide a 1:1 vertex index match between `order` and `shape` starting
/// from known pairs. At minimum three vertex pairs around a single face
/// are required in the ordinary case; symmetry callers hand in mirrored
/// pairs on a single mesh.
///
/// The result covers `min(vertex counts)` pairs or the call fails — a seed
/// that stalls early returns [`MismatchReason::Incomplete`] rather than a
/// partial map.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use topomatch::algo::{match_by_topology, CrawlOptions};
/// use topomatch::mesh::{Mesh, VertexId};
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = Mesh::new(positions, vec![vec![0, 1, 2, 3]]).unwrap();
/// let seed: Vec<_> = (0..3)
///     .map(|i| (VertexId::new(i), VertexId::new(i)))
///     .collect();
/// let matched = match_by_topology(&mesh, &mesh, &seed, &CrawlOptions::default()).unwrap();
/// assert_eq!(matched.len(), 4);
/// assert_eq!(matched.translate(VertexId::new(3)), Some(VertexId::new(3)));
/// ```
pub fn match_by_topology(
    order: &Mesh,
    shape: &Mesh,
    seed_pairs: &[(VertexId, VertexId)],
    options: &CrawlOptions,
) -> Result<Correspondence, MatchError> {
    let expected = order.num_vertices().min(shape.num_vertices());
    let grower = Grower::seeded(order, shape, seed_pairs, options.symmetry, expected)?;
    Ok(grower.run(&options.progress, "matching topology")?)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use nalgebra::Point3;

    use super::*;

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    fn cube() -> Mesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let faces = cube_faces();
        Mesh::new(positions, faces).unwrap()
    }

    fn cube_faces() -> Vec<Vec<usize>> {
        vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ]
    }

    /// Apply a vertex relabeling to a mesh: vertex `i` becomes `perm[i]`.
    fn permuted_cube(perm: &[usize; 8]) -> Mesh {
        let cube = cube();
        let mut positions = vec![Point3::origin(); 8];
        for (i, &p) in perm.iter().enumerate() {
            positions[p] = *cube.position(v(i));
        }
        let faces = cube_faces()
            .into_iter()
            .map(|face| face.into_iter().map(|i| perm[i]).collect())
            .collect();
        Mesh::new(positions, faces).unwrap()
    }

    #[test]
    fn test_identity_self_match() {
        let mesh = cube();
        let seed: Vec<_> = [0usize, 3, 2, 1].iter().map(|&i| (v(i), v(i))).collect();
        let matched =
            match_by_topology(&mesh, &mesh, &seed, &CrawlOptions::default()).unwrap();
        assert_eq!(matched.len(), 8);
        for vid in mesh.vertex_ids() {
            assert_eq!(matched.translate(vid), Some(vid));
        }
    }

    #[test]
    fn test_cube_permutation_recovery() {
        let perm = [2usize, 7, 1, 4, 0, 6, 3, 5];
        let shape = permuted_cube(&perm);
        let order = cube();
        // Seed with the four vertices of one face, mapped through the
        // permutation.
        let seed: Vec<_> = [0usize, 3, 2, 1]
            .iter()
            .map(|&i| (v(i), v(perm[i])))
            .collect();
        let matched =
            match_by_topology(&order, &shape, &seed, &CrawlOptions::default()).unwrap();
        assert_eq!(matched.len(), 8);
        for (i, &p) in perm.iter().enumerate() {
            assert_eq!(matched.translate(v(i)), Some(v(p)));
            assert_eq!(matched.translate_back(v(p)), Some(v(i)));
        }
    }

    #[test]
    fn test_boundary_grid_identity() {
        // An open 4x4-vertex quad grid: boundary fans must not stall growth.
        let mut positions = Vec::new();
        for r in 0..4 {
            for c in 0..4 {
                positions.push(Point3::new(c as f64, r as f64, 0.0));
            }
        }
        let mut faces = Vec::new();
        for r in 0..3 {
            for c in 0..3 {
                let v00 = r * 4 + c;
                faces.push(vec![v00, v00 + 1, v00 + 5, v00 + 4]);
            }
        }
        let mesh = Mesh::new(positions, faces).unwrap();
        let seed: Vec<_> = [0usize, 1, 5, 4].iter().map(|&i| (v(i), v(i))).collect();
        let matched =
            match_by_topology(&mesh, &mesh, &seed, &CrawlOptions::default()).unwrap();
        assert_eq!(matched.len(), 16);
        for vid in mesh.vertex_ids() {
            assert_eq!(matched.translate(vid), Some(vid));
        }
    }

    #[test]
    fn test_stalled_growth_is_incomplete() {
        // Two disconnected triangles; a seed in one can never reach the
        // other.
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(11.0, 0.0, 0.0),
            Point3::new(10.5, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2], vec![3, 4, 5]];
        let mesh = Mesh::new(positions, faces).unwrap();
        let seed: Vec<_> = (0..3).map(|i| (v(i), v(i))).collect();
        let err = match_by_topology(&mesh, &mesh, &seed, &CrawlOptions::default()).unwrap_err();
        assert_eq!(
            err,
            MatchError::Topology(MismatchReason::Incomplete {
                matched: 3,
                expected: 6
            })
        );
    }

    #[test]
    fn test_mismatched_topology_fails() {
        // Same vertex and face counts, different connectivity: one grid has
        // a flipped diagonal, so no isomorphism exists.
        fn tri_grid(flip_last: bool) -> Mesh {
            let mut positions = Vec::new();
            for r in 0..3 {
                for c in 0..3 {
                    positions.push(Point3::new(c as f64, r as f64, 0.0));
                }
            }
            let mut faces = Vec::new();
            for r in 0..2 {
                for c in 0..2 {
                    let v00 = r * 3 + c;
                    let (v10, v01, v11) = (v00 + 1, v00 + 3, v00 + 4);
                    if flip_last && r == 1 && c == 1 {
                        faces.push(vec![v00, v10, v01]);
                        faces.push(vec![v10, v11, v01]);
                    } else {
                        faces.push(vec![v00, v10, v11]);
                        faces.push(vec![v00, v11, v01]);
                    }
                }
            }
            Mesh::new(positions, faces).unwrap()
        }

        let order = tri_grid(false);
        let shape = tri_grid(true);
        let seed: Vec<_> = [0usize, 1, 4].iter().map(|&i| (v(i), v(i))).collect();
        let err = match_by_topology(&order, &shape, &seed, &CrawlOptions::default()).unwrap_err();
        assert!(matches!(err, MatchError::Topology(_)));
    }

    #[test]
    fn test_symmetry_mode_finds_mirror() {
        // A 3x3-vertex quad grid, mirrored left-right. Column 1 is the
        // symmetry line.
        let mut positions = Vec::new();
        for r in 0..3 {
            for c in 0..3 {
                positions.push(Point3::new(c as f64, r as f64, 0.0));
            }
        }
        let mut faces = Vec::new();
        for r in 0..2 {
            for c in 0..2 {
                let v00 = r * 3 + c;
                faces.push(vec![v00, v00 + 1, v00 + 4, v00 + 3]);
            }
        }
        let mesh = Mesh::new(positions, faces).unwrap();
        // One face's worth of mirrored pairs: (r, c) <-> (r, 2 - c).
        let seed = vec![(v(0), v(2)), (v(1), v(1)), (v(4), v(4)), (v(3), v(5))];
        let options = CrawlOptions::default().with_symmetry();
        let matched = match_by_topology(&mesh, &mesh, &seed, &options).unwrap();

        assert_eq!(matched.translate(v(6)), Some(v(8)));
        assert_eq!(matched.translate(v(8)), Some(v(6)));
        // Center-line vertex 7 matches itself and is excluded.
        assert!(!matched.contains_order(v(7)));
        assert_eq!(matched.len(), 6);
    }

    #[test]
    fn test_bad_seeds_rejected() {
        let mesh = cube();
        let err = match_by_topology(
            &mesh,
            &mesh,
            &[(v(0), v(42))],
            &CrawlOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MatchError::Topology(MismatchReason::SeedOutOfRange { .. })
        ));

        let err = match_by_topology(
            &mesh,
            &mesh,
            &[(v(0), v(1)), (v(0), v(2))],
            &CrawlOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            MatchError::Topology(MismatchReason::DuplicateSeed { vert: v(0) })
        );
    }

    #[test]
    fn test_progress_reports() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let progress = Progress::new(move |percent, _| {
            assert!((0.0..=100.0).contains(&percent));
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let mesh = cube();
        let seed: Vec<_> = [0usize, 3, 2, 1].iter().map(|&i| (v(i), v(i))).collect();
        let options = CrawlOptions::default().with_progress(progress);
        match_by_topology(&mesh, &mesh, &seed, &options).unwrap();
        assert!(calls.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_correspondence_injectivity() {
        let mut map = Correspondence::new();
        assert!(map.insert(v(0), v(5)));
        assert!(!map.insert(v(0), v(6)));
        assert!(!map.insert(v(1), v(5)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.pairs(), vec![(v(0), v(5))]);
    }
}
