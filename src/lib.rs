//! # Topomatch
//!
//! A topology-driven vertex correspondence library for polygon meshes.
//!
//! Given two meshes that share the same connectivity but whose vertex
//! arrays are arbitrarily reordered — a sculpt re-exported through another
//! package, a scan renumbered by a cleanup tool — topomatch computes the
//! 1:1 vertex mapping between them using adjacency alone. Coordinates are
//! only consulted as a tie-breaker, so the meshes are free to be deformed
//! copies of one another.
//!
//! In most cases no matching vertices need to be specified at all:
//! [`match_islands`](algo::match_islands) partitions both meshes into
//! connected islands, pairs the islands up, finds a trustworthy seed on
//! each pair from vertex-valence rarity, and grows the seed outward until
//! the correspondence covers everything. When a caller already knows a few
//! matching vertices (say, three picked by hand around one face),
//! [`match_by_topology`](algo::match_by_topology) grows directly from
//! those.
//!
//! Matching either covers the meshes completely or fails with a typed
//! error naming the mismatched region; a partial result is never returned.
//!
//! ## Quick Start
//!
//! ```
//! use nalgebra::Point3;
//! use topomatch::prelude::*;
//!
//! // A cube...
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(1.0, 0.0, 1.0),
//!     Point3::new(1.0, 1.0, 1.0),
//!     Point3::new(0.0, 1.0, 1.0),
//! ];
//! let faces = vec![
//!     vec![0, 3, 2, 1],
//!     vec![4, 5, 6, 7],
//!     vec![0, 1, 5, 4],
//!     vec![1, 2, 6, 5],
//!     vec![2, 3, 7, 6],
//!     vec![3, 0, 4, 7],
//! ];
//! let order = Mesh::new(positions.clone(), faces.clone()).unwrap();
//!
//! // ...and the same cube with its vertices renumbered.
//! let perm = [2usize, 7, 1, 4, 0, 6, 3, 5];
//! let mut shuffled = vec![Point3::origin(); 8];
//! for (i, &p) in perm.iter().enumerate() {
//!     shuffled[p] = positions[i];
//! }
//! let refaced = faces
//!     .into_iter()
//!     .map(|face| face.into_iter().map(|i| perm[i]).collect())
//!     .collect();
//! let shape = Mesh::new(shuffled, refaced).unwrap();
//!
//! // Seed with one known face and recover the whole renumbering.
//! let seed: Vec<_> = [0usize, 3, 2, 1]
//!     .iter()
//!     .map(|&i| (VertexId::new(i), VertexId::new(perm[i])))
//!     .collect();
//! let matched = match_by_topology(&order, &shape, &seed, &CrawlOptions::default()).unwrap();
//! assert_eq!(matched.len(), 8);
//! for (i, &p) in perm.iter().enumerate() {
//!     assert_eq!(matched.translate(VertexId::new(i)), Some(VertexId::new(p)));
//! }
//! ```
//!
//! ## Hands-off matching
//!
//! ```
//! # use nalgebra::Point3;
//! # use topomatch::prelude::*;
//! # let order = Mesh::new(
//! #     vec![
//! #         Point3::new(0.0, 0.0, 0.0),
//! #         Point3::new(1.0, 0.0, 0.0),
//! #         Point3::new(0.5, 1.0, 0.0),
//! #     ],
//! #     vec![vec![0, 1, 2]],
//! # ).unwrap();
//! # let shape = order.clone();
//! // No seed at all: islands, seeds, and growth are found automatically.
//! let matched = match_islands(&order, &shape, &MatchOptions::default()).unwrap();
//! assert_eq!(matched.len(), order.num_vertices());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use topomatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        match_by_topology, match_islands, minimum_cost_assignment, unscramble_by_distance,
        unscramble_mesh_by_distance, Correspondence, CrawlOptions, MatchOptions, Progress,
    };
    pub use crate::error::{MalformedMesh, MatchError, MismatchReason};
    pub use crate::mesh::{partition, FaceId, Island, Mesh, VertexId};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
