//! Oriented simplicial topology.
//!
//! This module provides the handle types and the registry that interns them:
//! - Dimension markers ([`Vertex`], [`Segment`], [`Triangle`], [`Tetrahedron`])
//! - [`Orientation`] and the typed handles [`FootprintId`] / [`Simplex`]
//! - [`Topology`], the reference-counted interning registry
//!
//! Most users create one `Topology`, build vertices and cells through it and
//! hand the resulting handles to a [`Mesh`](crate::mesh::Mesh).

pub mod cache;
mod factory;
mod footprint;
pub mod order;
pub mod orientation;
pub mod registry;
pub mod shared;
pub mod simplex;

pub use cache::InvalidateCache;
pub use order::{Composite, Order, Segment, Tetrahedron, Triangle, Vertex};
pub use orientation::{Orientation, permutation_parity, relative_parity};
pub use registry::Topology;
pub use shared::SharedTopology;
pub use simplex::{FootprintId, Simplex};
