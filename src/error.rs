//! Error types for topomatch.
//!
//! Three kinds of failure exist, at three layers:
//!
//! - [`MalformedMesh`]: rejected input at [`Mesh`](crate::mesh::Mesh)
//!   construction, before any matching is attempted.
//! - [`MismatchReason`]: a single growth or seeding attempt could not
//!   proceed deterministically. The seed finder inspects these to decide
//!   whether to try the next candidate seed; only when every candidate is
//!   exhausted does a reason surface to the caller.
//! - [`MatchError`]: what the public entry points return — island structure
//!   disagreements plus any terminal [`MismatchReason`].

use thiserror::Error;

use crate::mesh::VertexId;

/// Result type alias using [`MatchError`].
pub type Result<T, E = MatchError> = std::result::Result<T, E>;

/// Errors raised while constructing a [`Mesh`](crate::mesh::Mesh).
///
/// Construction fails fast: a mesh that cannot be built can never be
/// matched, so none of these are recoverable downstream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedMesh {
    /// A face references a vertex index outside the vertex array.
    #[error("face {face} references vertex index {vertex} out of range ({num_vertices} vertices)")]
    FaceIndexOutOfRange {
        /// The offending face, by input order.
        face: usize,
        /// The out-of-range vertex index.
        vertex: usize,
        /// Number of vertices in the mesh.
        num_vertices: usize,
    },

    /// A face has fewer than three vertices or repeats one.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// The offending face, by input order.
        face: usize,
    },

    /// A directed edge is claimed by more than one face in the same
    /// winding direction.
    #[error("non-manifold edge ({from}, {to}) is used by more than one face in the same direction")]
    NonManifoldEdge {
        /// Source vertex of the directed edge.
        from: usize,
        /// Destination vertex of the directed edge.
        to: usize,
    },
}

/// Why one growth or seeding attempt could not produce a correspondence.
///
/// Carried vertex indices point at the mismatched region so a caller can
/// visualize it. A reason is not necessarily fatal: the seed finder's
/// retry loop treats most of these as "try the next candidate seed".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MismatchReason {
    /// The two islands' valence histograms disagree.
    #[error("valence mismatch; check order vertices {order_verts:?} against shape vertices {shape_verts:?}")]
    ValenceMismatch {
        /// Vertices of the offending valence bucket on the order mesh.
        order_verts: Vec<VertexId>,
        /// Vertices of the offending valence bucket on the shape mesh.
        shape_verts: Vec<VertexId>,
    },

    /// The valence histograms disagree and the offending buckets are too
    /// large to enumerate usefully.
    #[error("valence mismatch ({order_count} order vs {shape_count} shape vertices); too many to enumerate")]
    ValenceMismatchLarge {
        /// Affected vertex count on the order mesh.
        order_count: usize,
        /// Affected vertex count on the shape mesh.
        shape_count: usize,
    },

    /// A seed candidate never reached another vertex of its own valence.
    #[error("no other vertex shares a valence with {vert:?}")]
    NoValencePeer {
        /// The candidate that exhausted its island.
        vert: VertexId,
    },

    /// A uniquely-identified frontier vertex has no counterpart.
    #[error("match produced no results; check order area {order_area:?} against shape area {shape_area:?}")]
    NoCandidate {
        /// Matched vertices surrounding the unmatchable order vertex.
        order_area: Vec<VertexId>,
        /// Their translation on the shape mesh.
        shape_area: Vec<VertexId>,
    },

    /// A translated signature is ambiguous on the shape mesh.
    #[error("match produced multiple results for {order_vert:?}: {shape_verts:?}")]
    MultipleCandidates {
        /// The uniquely-identified order vertex.
        order_vert: VertexId,
        /// Every shape vertex carrying the same translated signature.
        shape_verts: Vec<VertexId>,
    },

    /// Growth reached a fixed point before covering the paired islands.
    #[error("growth stalled at {matched} of {expected} vertices")]
    Incomplete {
        /// Pairs matched when growth stopped.
        matched: usize,
        /// Pairs required for full coverage.
        expected: usize,
    },

    /// Every candidate seed failed to grow to completion.
    #[error("no candidate seed produced a full correspondence")]
    SeedsExhausted,

    /// A caller-provided seed pair references a missing vertex.
    #[error("seed vertex {vert:?} out of range ({num_vertices} vertices)")]
    SeedOutOfRange {
        /// The out-of-range vertex.
        vert: VertexId,
        /// Number of vertices in the mesh it was meant for.
        num_vertices: usize,
    },

    /// A caller-provided seed maps one vertex twice.
    #[error("seed vertex {vert:?} appears in more than one pair")]
    DuplicateSeed {
        /// The doubly-seeded vertex.
        vert: VertexId,
    },
}

/// Errors returned by the top-level matching entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Island counts or signatures cannot be reconciled between the two
    /// meshes. With
    /// [`MatchOptions::skip_mismatched_islands`](crate::algo::pairing::MatchOptions)
    /// set, mismatched signature groups are dropped instead — whole groups
    /// only, never partially matched.
    #[error("island mismatch: {order_islands} order island(s) vs {shape_islands} shape island(s) with {vert_count} vertices and {face_count} faces")]
    IslandMismatch {
        /// Vertex count of the signature that failed to reconcile.
        vert_count: usize,
        /// Face count of the signature that failed to reconcile.
        face_count: usize,
        /// Islands carrying the signature on the order mesh.
        order_islands: usize,
        /// Islands carrying the signature on the shape mesh.
        shape_islands: usize,
    },

    /// Topology-driven growth failed and no retry remained.
    #[error(transparent)]
    Topology(#[from] MismatchReason),
}
