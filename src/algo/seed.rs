//! Seed discovery for a paired pair of islands.
//!
//! Growth needs a trusted starting correspondence. This module finds one
//! from connectivity alone: vertices with a rare valence make good
//! landmarks, and when several share the rarest valence, the number of
//! edge-growth hops to the *nearest other* vertex of the same valence (the
//! "self-distance") separates them further.
//!
//! Example: an island has 54 valence-3 vertices, 13112 valence-4 vertices
//! and 28 valence-5 vertices, so the valence-5 group is used. If exactly
//! one of those vertices sits 5 hops from its nearest valence-5 peer on
//! both islands, those two vertices must correspond. Each surviving pivot
//! pair is then expanded with its CCW neighbor ring — every rotation and
//! reflection of the shape ring is a candidate seed — and the first seed
//! the grower carries to full coverage wins.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use nalgebra::Point3;

use crate::error::MismatchReason;
use crate::mesh::{grow_by_edge, Island, Mesh, VertSet, VertexId};

use super::assignment::unscramble_by_distance;
use super::correspond::{Correspondence, Grower};
use super::pairing::MatchOptions;

/// Valence -> vertices of that valence, restricted to an island.
fn valence_histogram(mesh: &Mesh, island: &Island) -> BTreeMap<usize, Vec<VertexId>> {
    let mut histogram: BTreeMap<usize, Vec<VertexId>> = BTreeMap::new();
    for &v in island.verts() {
        histogram.entry(mesh.valence(v)).or_default().push(v);
    }
    histogram
}

/// Report a disagreeing valence bucket, with indices when both sides are
/// small enough to be worth reading.
fn valence_mismatch(
    order_verts: &[VertexId],
    shape_verts: &[VertexId],
    report_limit: usize,
) -> MismatchReason {
    if order_verts.len() <= report_limit && shape_verts.len() <= report_limit {
        MismatchReason::ValenceMismatch {
            order_verts: order_verts.to_vec(),
            shape_verts: shape_verts.to_vec(),
        }
    } else {
        MismatchReason::ValenceMismatchLarge {
            order_count: order_verts.len(),
            shape_count: shape_verts.len(),
        }
    }
}

/// Compare the two islands' valence histograms and pick the most
/// discriminating bucket: the valence with the fewest vertices (ties to
/// the smaller valence).
fn min_valence_candidates(
    order: &Mesh,
    shape: &Mesh,
    order_island: &Island,
    shape_island: &Island,
    report_limit: usize,
) -> Result<(usize, Vec<VertexId>, Vec<VertexId>), MismatchReason> {
    let order_hist = valence_histogram(order, order_island);
    let shape_hist = valence_histogram(shape, shape_island);

    if !order_hist.keys().eq(shape_hist.keys()) {
        let order_only: Vec<VertexId> = order_hist
            .iter()
            .filter(|entry| !shape_hist.contains_key(entry.0))
            .flat_map(|(_, verts)| verts.iter().copied())
            .collect();
        let shape_only: Vec<VertexId> = shape_hist
            .iter()
            .filter(|entry| !order_hist.contains_key(entry.0))
            .flat_map(|(_, verts)| verts.iter().copied())
            .collect();
        return Err(valence_mismatch(&order_only, &shape_only, report_limit));
    }

    for (valence, order_verts) in &order_hist {
        let shape_verts = &shape_hist[valence];
        if order_verts.len() != shape_verts.len() {
            return Err(valence_mismatch(order_verts, shape_verts, report_limit));
        }
    }

    let Some((&valence, order_verts)) = order_hist
        .iter()
        .min_by_key(|entry| (entry.1.len(), *entry.0))
    else {
        return Err(MismatchReason::SeedsExhausted);
    };
    Ok((valence, order_verts.clone(), shape_hist[&valence].clone()))
}

/// For each candidate, the edge-growth hop count to the nearest *other*
/// vertex of the same valence, bucketed by hop count.
fn self_distance_buckets(
    mesh: &Mesh,
    points: &[VertexId],
    valence: usize,
) -> Result<BTreeMap<usize, Vec<VertexId>>, MismatchReason> {
    let mut buckets: BTreeMap<usize, Vec<VertexId>> = BTreeMap::new();
    for &point in points {
        let mut grown: VertSet = [point].into_iter().collect();
        let mut exclude = VertSet::new();
        let mut steps = 0usize;
        loop {
            let (next_grown, next_exclude) = grow_by_edge(mesh, &grown, &exclude);
            grown = next_grown;
            exclude = next_exclude;
            steps += 1;
            if grown.is_empty() {
                return Err(MismatchReason::NoValencePeer { vert: point });
            }
            if grown.iter().any(|&g| mesh.valence(g) == valence) {
                buckets.entry(steps).or_default().push(point);
                break;
            }
        }
    }
    Ok(buckets)
}

/// Hop counts whose buckets are smallest.
fn min_size_keys(buckets: &BTreeMap<usize, Vec<VertexId>>) -> BTreeSet<usize> {
    let min_len = buckets.values().map(Vec::len).min().unwrap_or(0);
    buckets
        .iter()
        .filter(|(_, verts)| verts.len() == min_len)
        .map(|(&steps, _)| steps)
        .collect()
}

/// Propose pivot candidates for a paired island.
///
/// Returns matching candidate lists on both islands; a single-member list
/// is a confirmed pivot pair, longer lists still need ring trials to
/// disambiguate.
fn find_seed_candidates(
    order: &Mesh,
    shape: &Mesh,
    order_island: &Island,
    shape_island: &Island,
    report_limit: usize,
) -> Result<(Vec<VertexId>, Vec<VertexId>), MismatchReason> {
    let (valence, order_points, shape_points) =
        min_valence_candidates(order, shape, order_island, shape_island, report_limit)?;

    if order_points.len() == 1 {
        return Ok((order_points, shape_points));
    }

    let order_steps = self_distance_buckets(order, &order_points, valence)?;
    let shape_steps = self_distance_buckets(shape, &shape_points, valence)?;

    let order_keys = min_size_keys(&order_steps);
    let shape_keys = min_size_keys(&shape_steps);
    let Some(&key) = order_keys.intersection(&shape_keys).next() else {
        debug!("no common self-distance bucket; seeding failed");
        return Err(MismatchReason::SeedsExhausted);
    };

    Ok((order_steps[&key].clone(), shape_steps[&key].clone()))
}

/// Every rotation and reflection of a CCW neighbor ring.
fn ring_variants(ring: &[VertexId]) -> Vec<Vec<VertexId>> {
    if ring.is_empty() {
        return vec![Vec::new()];
    }
    let reversed: Vec<VertexId> = ring.iter().rev().copied().collect();
    let mut variants = Vec::with_capacity(ring.len() * 2);
    for start in 0..ring.len() {
        let mut rotated = ring[start..].to_vec();
        rotated.extend_from_slice(&ring[..start]);
        variants.push(rotated);
    }
    for start in 0..reversed.len() {
        let mut rotated = reversed[start..].to_vec();
        rotated.extend_from_slice(&reversed[..start]);
        variants.push(rotated);
    }
    variants
}

/// Match one paired island by finding a seed and growing it out.
///
/// Candidate pivot pairs are ranked by a coordinate-distance assignment
/// when the candidate set is small enough for the O(n³) solver
/// ([`MatchOptions::seed_assignment_cutoff`]); above the cutoff they are
/// tried in index order. Every grower failure just moves on to the next
/// candidate seed; only exhausting them all is an error.
pub(crate) fn match_island(
    order: &Mesh,
    shape: &Mesh,
    order_island: &Island,
    shape_island: &Island,
    options: &MatchOptions,
    label: &str,
) -> Result<Correspondence, MismatchReason> {
    let (order_cands, shape_cands) = find_seed_candidates(
        order,
        shape,
        order_island,
        shape_island,
        options.valence_report_limit,
    )?;
    debug!(
        "island seed candidates: {} order, {} shape",
        order_cands.len(),
        shape_cands.len()
    );

    let expected = order_island.vertex_count().min(shape_island.vertex_count());

    // Distance-weighted candidate ranking lowers the chance of flipping a
    // symmetrical mesh.
    let ranked = order_cands.len() == shape_cands.len()
        && order_cands.len() > 1
        && order_cands.len() <= options.seed_assignment_cutoff;
    let (order_rank, shape_rank): (Vec<usize>, Vec<usize>) = if ranked {
        let order_points: Vec<Point3<f64>> =
            order_cands.iter().map(|&p| *order.position(p)).collect();
        let shape_points: Vec<Point3<f64>> =
            shape_cands.iter().map(|&p| *shape.position(p)).collect();
        let pairs = unscramble_by_distance(&order_points, &shape_points);
        (
            pairs.iter().map(|&(i, _)| i).collect(),
            pairs.iter().map(|&(_, j)| j).collect(),
        )
    } else {
        (
            (0..order_cands.len()).collect(),
            (0..shape_cands.len()).collect(),
        )
    };

    for &oi in &order_rank {
        let order_pivot = order_cands[oi];
        let order_ring = order.adjacent_verts_by_edge(order_pivot);
        let mut order_seed: Vec<VertexId> = order_ring.to_vec();
        order_seed.push(order_pivot);

        for &si in &shape_rank {
            let shape_pivot = shape_cands[si];
            let shape_ring = shape.adjacent_verts_by_edge(shape_pivot);
            if shape_ring.len() != order_ring.len() {
                continue;
            }

            for variant in ring_variants(shape_ring) {
                let mut shape_seed = variant;
                shape_seed.push(shape_pivot);
                let seed: Vec<(VertexId, VertexId)> =
                    order_seed.iter().copied().zip(shape_seed).collect();

                let attempt = Grower::seeded(order, shape, &seed, false, expected)
                    .and_then(|grower| grower.run(&options.progress, label));
                match attempt {
                    Ok(map) => return Ok(map),
                    Err(reason) => {
                        debug!("seed trial {order_pivot:?} -> {shape_pivot:?} failed: {reason}");
                    }
                }
            }
        }
    }

    Err(MismatchReason::SeedsExhausted)
}
