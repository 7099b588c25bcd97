//! Island pairing and the full-mesh matching entry point.
//!
//! [`match_islands`] is the hands-off front door: it partitions both
//! meshes into islands, decides which island corresponds to which, seeds
//! and grows each pair, and concatenates the per-island results into one
//! correspondence.
//!
//! Islands are reconciled by their `(vertex_count, face_count)` signature.
//! When several islands share a signature on both sides, their bounding-box
//! centers are matched by minimum total squared distance, which keeps a
//! re-exported prop from pairing a left shoe with a right one.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use nalgebra::Point3;

use crate::error::{MatchError, Result};
use crate::mesh::{partition, Island, Mesh};

use super::assignment::unscramble_by_distance;
use super::correspond::Correspondence;
use super::progress::Progress;
use super::seed;

/// Options for [`match_islands`].
#[derive(Debug)]
pub struct MatchOptions {
    /// Drop island signature groups that cannot be reconciled instead of
    /// failing. A dropped group is skipped in its entirety — its islands
    /// contribute no pairs — never partially matched.
    pub skip_mismatched_islands: bool,

    /// Largest candidate count the O(n³) coordinate-distance assignment is
    /// used for when ranking seed pivots; above it candidates are tried in
    /// index order. A pragmatic threshold, not a tuned optimum.
    pub seed_assignment_cutoff: usize,

    /// Largest disagreeing valence bucket reported vertex-by-vertex; bigger
    /// buckets are summarized by count. A pragmatic threshold, not a tuned
    /// optimum.
    pub valence_report_limit: usize,

    /// Progress callback, invoked with a percent value and a stage label.
    pub progress: Progress,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            skip_mismatched_islands: false,
            seed_assignment_cutoff: 30,
            valence_report_limit: 10,
            progress: Progress::none(),
        }
    }
}

impl MatchOptions {
    /// Skip unreconcilable island signature groups instead of failing.
    pub fn tolerate_mismatched_islands(mut self) -> Self {
        self.skip_mismatched_islands = true;
        self
    }

    /// Set the seed-ranking assignment cutoff.
    pub fn with_seed_assignment_cutoff(mut self, cutoff: usize) -> Self {
        self.seed_assignment_cutoff = cutoff;
        self
    }

    /// Set the valence mismatch reporting limit.
    pub fn with_valence_report_limit(mut self, limit: usize) -> Self {
        self.valence_report_limit = limit;
        self
    }

    /// Set the progress callback.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }
}

/// Decide which order island corresponds to which shape island.
///
/// Returns index pairs into the two island lists. Signature groups of
/// unequal size fail (or are skipped wholesale under
/// [`MatchOptions::skip_mismatched_islands`]); groups of several islands
/// are paired by assignment over bounding-box centers.
fn pair_islands(
    order: &Mesh,
    shape: &Mesh,
    order_islands: &[Island],
    shape_islands: &[Island],
    options: &MatchOptions,
) -> Result<Vec<(usize, usize)>> {
    let mut order_groups: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for (i, island) in order_islands.iter().enumerate() {
        order_groups.entry(island.signature()).or_default().push(i);
    }
    let mut shape_groups: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for (i, island) in shape_islands.iter().enumerate() {
        shape_groups.entry(island.signature()).or_default().push(i);
    }

    let signatures: BTreeSet<(usize, usize)> = order_groups
        .keys()
        .chain(shape_groups.keys())
        .copied()
        .collect();

    let mut pairs = Vec::new();
    for signature in signatures {
        let order_group = order_groups
            .get(&signature)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let shape_group = shape_groups
            .get(&signature)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if order_group.len() != shape_group.len() {
            if options.skip_mismatched_islands {
                warn!(
                    "skipping islands with {} vertices and {} faces: {} on order, {} on shape",
                    signature.0,
                    signature.1,
                    order_group.len(),
                    shape_group.len()
                );
                continue;
            }
            return Err(MatchError::IslandMismatch {
                vert_count: signature.0,
                face_count: signature.1,
                order_islands: order_group.len(),
                shape_islands: shape_group.len(),
            });
        }

        if order_group.len() == 1 {
            pairs.push((order_group[0], shape_group[0]));
            continue;
        }

        // Several lookalike islands: marry them by bounding-box center so
        // symmetrical pieces land on their geometric counterparts.
        let order_centers: Vec<Point3<f64>> = order_group
            .iter()
            .map(|&i| order_islands[i].bounding_center(order))
            .collect();
        let shape_centers: Vec<Point3<f64>> = shape_group
            .iter()
            .map(|&i| shape_islands[i].bounding_center(shape))
            .collect();
        for (r, c) in unscramble_by_distance(&order_centers, &shape_centers) {
            pairs.push((order_group[r], shape_group[c]));
        }
    }

    Ok(pairs)
}

/// Match two meshes vertex-for-vertex using only their topology.
///
/// The full pipeline: partition into islands, pair islands by signature
/// (and bounding-box center where signatures tie), discover a seed on each
/// pair, grow it to full coverage, and concatenate. Each island either
/// matches completely or the whole call fails; with
/// [`MatchOptions::skip_mismatched_islands`], signature groups missing or
/// miscounted on one side are dropped whole instead.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use topomatch::algo::{match_islands, MatchOptions};
/// use topomatch::mesh::{Mesh, VertexId};
///
/// // The same quad, wound from a different starting vertex.
/// let order = Mesh::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(1.0, 1.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![vec![0, 1, 2, 3]],
/// )
/// .unwrap();
/// let shape = Mesh::new(
///     vec![
///         Point3::new(1.0, 1.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///     ],
///     vec![vec![2, 3, 0, 1]],
/// )
/// .unwrap();
/// let matched = match_islands(&order, &shape, &MatchOptions::default()).unwrap();
/// assert_eq!(matched.len(), 4);
/// ```
pub fn match_islands(
    order: &Mesh,
    shape: &Mesh,
    options: &MatchOptions,
) -> Result<Correspondence> {
    options.progress.report(0.0, "partitioning islands");
    let order_islands = partition(order);
    let shape_islands = partition(shape);
    debug!(
        "partitioned: {} order island(s), {} shape island(s)",
        order_islands.len(),
        shape_islands.len()
    );

    let pairs = if order_islands.len() == 1 && shape_islands.len() == 1 {
        vec![(0, 0)]
    } else {
        pair_islands(order, shape, &order_islands, &shape_islands, options)?
    };

    let mut result = Correspondence::new();
    for (idx, &(oi, si)) in pairs.iter().enumerate() {
        let label = format!("matching island {}/{}", idx + 1, pairs.len());
        let matched = seed::match_island(
            order,
            shape,
            &order_islands[oi],
            &shape_islands[si],
            options,
            &label,
        )?;
        result.merge(matched);
    }

    debug!("matched {} vertex pairs", result.len());
    Ok(result)
}
