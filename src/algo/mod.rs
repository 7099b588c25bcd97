//! Mesh correspondence algorithms.
//!
//! This module contains the matching pipeline and its parts:
//!
//! - **Assignment**: minimum-cost bipartite matching (Hungarian algorithm)
//!   and the coordinate-distance unscramblers built on it
//! - **Correspondence growth**: breadth-first expansion of a seeded vertex
//!   match through local adjacency signatures
//! - **Seeding**: valence-rarity and self-distance heuristics that find a
//!   trustworthy starting correspondence on their own
//! - **Island pairing**: signature- and center-based reconciliation of
//!   connected components, and the [`match_islands`] entry point
//! - **Progress**: the percent/label callback long matches report through

pub mod assignment;
pub mod correspond;
pub mod pairing;
pub mod progress;
mod seed;

pub use assignment::{
    minimum_cost_assignment, unscramble_by_distance, unscramble_mesh_by_distance,
};
pub use correspond::{match_by_topology, Correspondence, CrawlOptions};
pub use pairing::{match_islands, MatchOptions};
pub use progress::Progress;
