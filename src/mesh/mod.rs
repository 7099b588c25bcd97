//! Core mesh data structures.
//!
//! This module provides the adjacency-centric mesh representation the
//! correlation algorithms run on, plus the selection-growth primitives and
//! connected-component extraction built directly on it.
//!
//! # Overview
//!
//! The primary type is [`Mesh`]: an immutable face-vertex structure that
//! precomputes, at construction, every adjacency query the matching
//! algorithms need — CCW neighbor rings, CCW face fans, face-sharing vertex
//! tables, and a directed-edge-to-face map. Construction validates the
//! input and rejects non-manifold or out-of-range faces with
//! [`MalformedMesh`](crate::error::MalformedMesh).
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers, [`VertexId`]
//! and [`FaceId`], so the two index spaces cannot be mixed up.
//!
//! # Construction
//!
//! ```
//! use nalgebra::Point3;
//! use topomatch::mesh::Mesh;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = Mesh::new(positions, vec![vec![0, 1, 2]]).unwrap();
//! assert_eq!(mesh.num_faces(), 1);
//! ```

mod grow;
mod index;
mod island;
mod topo;

pub use grow::{grow_by_edge, grow_by_face, VertSet};
pub(crate) use grow::{grow_tracked, OriginMap};
pub use index::{FaceId, VertexId};
pub use island::{partition, Island};
pub use topo::{EdgeFaces, Mesh};
