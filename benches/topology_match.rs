//! Benchmarks for mesh construction and topology matching.

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use topomatch::prelude::*;

fn grid_data(n: usize) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let mut positions = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            positions.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }
    let mut faces = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            faces.push(vec![v00, v00 + 1, v00 + n + 2, v00 + n + 1]);
        }
    }
    (positions, faces)
}

/// A grid mesh and a vertex-shuffled copy, plus the permutation used.
fn shuffled_pair(n: usize, rng_seed: u64) -> (Mesh, Mesh, Vec<usize>) {
    let (positions, faces) = grid_data(n);
    let order = Mesh::new(positions.clone(), faces.clone()).unwrap();

    let mut rng = rand::rngs::StdRng::seed_from_u64(rng_seed);
    let mut perm: Vec<usize> = (0..positions.len()).collect();
    perm.shuffle(&mut rng);

    let mut shuffled = vec![Point3::origin(); positions.len()];
    for (i, &p) in perm.iter().enumerate() {
        shuffled[p] = positions[i];
    }
    let refaced = faces
        .into_iter()
        .map(|face| face.into_iter().map(|i| perm[i]).collect())
        .collect();
    let shape = Mesh::new(shuffled, refaced).unwrap();

    (order, shape, perm)
}

fn bench_mesh_construction(c: &mut Criterion) {
    let (positions, faces) = grid_data(30);
    c.bench_function("build_grid_30x30", |b| {
        b.iter(|| Mesh::new(positions.clone(), faces.clone()).unwrap());
    });
}

fn bench_seeded_match(c: &mut Criterion) {
    let (order, shape, perm) = shuffled_pair(20, 7);
    let seed: Vec<_> = [0usize, 1, 22, 21]
        .iter()
        .map(|&i| (VertexId::new(i), VertexId::new(perm[i])))
        .collect();
    c.bench_function("match_by_topology_grid_20x20", |b| {
        b.iter(|| match_by_topology(&order, &shape, &seed, &CrawlOptions::default()).unwrap());
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let (order, shape, _) = shuffled_pair(12, 7);
    c.bench_function("match_islands_grid_12x12", |b| {
        b.iter(|| match_islands(&order, &shape, &MatchOptions::default()).unwrap());
    });
}

fn bench_assignment(c: &mut Criterion) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(13);
    let mut points = Vec::new();
    for i in 0..25 {
        points.push(Point3::new(i as f64 * 1.3, (i % 5) as f64, 0.0));
    }
    let mut scrambled = points.clone();
    scrambled.shuffle(&mut rng);
    c.bench_function("unscramble_by_distance_25", |b| {
        b.iter(|| unscramble_by_distance(&points, &scrambled));
    });
}

criterion_group!(
    benches,
    bench_mesh_construction,
    bench_seeded_match,
    bench_full_pipeline,
    bench_assignment
);
criterion_main!(benches);
