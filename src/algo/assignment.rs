//! Minimum-cost bipartite assignment.
//!
//! The Hungarian algorithm in its potentials formulation (shortest
//! augmenting paths), solving `min Σ cost[i][assign(i)]` over one-to-one
//! assignments. Two callers rely on it: island pairing (over island
//! bounding-box centers) and seed disambiguation (over candidate vertex
//! positions). It also backs the pure-coordinate fallback unscramblers for
//! small meshes.
//!
//! Runs in O(n²·m) for an n×m matrix (a matrix with more rows than columns
//! is transposed internally), so it is only practical for small inputs —
//! the coordinate unscramblers are intended for element counts around 30
//! or below.

use nalgebra::{DMatrix, Point3};

use crate::mesh::Mesh;

/// Solve the assignment problem for a matrix of finite costs.
///
/// Returns the minimum-total-cost pairing `(row, column)`, sorted by row;
/// `min(rows, columns)` pairs are produced. Ties are broken by scan order,
/// never randomly, so equal inputs give equal outputs.
///
/// # Example
///
/// ```
/// use nalgebra::DMatrix;
/// use topomatch::algo::minimum_cost_assignment;
///
/// let costs = DMatrix::from_row_slice(3, 3, &[
///     4.0, 1.0, 3.0,
///     2.0, 0.0, 5.0,
///     3.0, 2.0, 2.0,
/// ]);
/// let pairs = minimum_cost_assignment(&costs);
/// assert_eq!(pairs, vec![(0, 1), (1, 0), (2, 2)]);
/// ```
pub fn minimum_cost_assignment(costs: &DMatrix<f64>) -> Vec<(usize, usize)> {
    let (n, m) = costs.shape();
    if n == 0 || m == 0 {
        return Vec::new();
    }
    if n > m {
        let transposed = costs.transpose();
        let mut pairs: Vec<(usize, usize)> = minimum_cost_assignment(&transposed)
            .into_iter()
            .map(|(r, c)| (c, r))
            .collect();
        pairs.sort_unstable();
        return pairs;
    }

    // Row/column potentials, 1-based with a dummy slot 0 used while an
    // augmenting path is under construction.
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; m + 1];
    let mut matched_row = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        matched_row[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = matched_row[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let reduced = costs[(i0 - 1, j - 1)] - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[matched_row[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if matched_row[j0] == 0 {
                break;
            }
        }

        // Walk the augmenting path backwards, flipping assignments.
        loop {
            let j1 = way[j0];
            matched_row[j0] = matched_row[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut pairs: Vec<(usize, usize)> = (1..=m)
        .filter(|&j| matched_row[j] != 0)
        .map(|j| (matched_row[j] - 1, j - 1))
        .collect();
    pairs.sort_unstable();
    pairs
}

/// Build the pairwise squared-distance cost matrix for two point sets.
pub(crate) fn squared_distance_costs(
    order: &[Point3<f64>],
    shape: &[Point3<f64>],
) -> DMatrix<f64> {
    DMatrix::from_fn(order.len(), shape.len(), |i, j| {
        (order[i] - shape[j]).norm_squared()
    })
}

/// Find the 1:1 point pairing that minimizes total squared distance.
///
/// Given two point sets that are generally close to one another, returns
/// index pairs `(order, shape)` sorted by the order index. No point is
/// mapped twice. O(n³) — intended for small sets (around 30 points or
/// fewer).
pub fn unscramble_by_distance(
    order: &[Point3<f64>],
    shape: &[Point3<f64>],
) -> Vec<(usize, usize)> {
    minimum_cost_assignment(&squared_distance_costs(order, shape))
}

/// [`unscramble_by_distance`] over two whole meshes' vertex positions.
///
/// The coordinate-only fallback for meshes too small or too degenerate for
/// topology-driven matching to get a grip on.
pub fn unscramble_mesh_by_distance(order: &Mesh, shape: &Mesh) -> Vec<(usize, usize)> {
    unscramble_by_distance(order.positions(), shape.positions())
}
