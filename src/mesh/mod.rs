//! Meshes: multisets of cells over a [`Topology`](crate::topology::Topology),
//! plus the operations built on top of them.

pub mod boundary;
pub mod filter;
#[allow(clippy::module_inception)]
pub mod mesh;
pub mod points;
pub mod refine;

pub use filter::filter_faces;
pub use mesh::{CellId, Mesh};
pub use points::PointSet;
pub use refine::{subdivide_tetrahedra, subdivide_triangles};
