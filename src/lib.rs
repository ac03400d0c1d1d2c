#![cfg_attr(docsrs, feature(doc_cfg))]
//! # simplex-mesh
//!
//! simplex-mesh is the combinatorial core of a simplicial mesh library: it
//! stores vertices, segments, triangles and tetrahedra as interned,
//! oriented, reference-counted simplices, groups them into meshes, and
//! provides the local edits (such as the diagonal flip) that meshing
//! algorithms are built from. It knows nothing about coordinates; geometry
//! layers attach points to the vertex handles it hands out.
//!
//! ## Features
//! - Segmented, address-stable arenas with FIFO slot reuse and generational keys
//! - Flyweight interning: a composition always maps to the same footprint,
//!   whatever the order or rotation of its faces
//! - Per-orientation use counts with iterative cascading erase
//! - Meshes with cached boundary extraction, face filtering and uniform refinement
//! - The flip-diagonal edge swap
//!
//! ## Usage
//! ```
//! use simplex_mesh::prelude::*;
//!
//! let mut topology = Topology::new();
//! let [v0, v1, v2, v3] = [
//!     topology.vertex(),
//!     topology.vertex(),
//!     topology.vertex(),
//!     topology.vertex(),
//! ];
//! let t0 = topology.triangle_from_vertices([v0, v1, v2])?;
//! let t1 = topology.triangle_from_vertices([v0, v2, v3])?;
//!
//! let mut mesh = Mesh::new();
//! mesh.insert(&topology, t0)?;
//! mesh.insert(&topology, t1)?;
//! assert_eq!(mesh.boundary_size(), 4);
//!
//! flip_diagonal_in_mesh(&mut mesh, &mut topology, (t0, t1))?;
//! assert_eq!(mesh.n_cells(), 2);
//! assert!(!topology.exists::<Segment>(&[v0, v2]));
//! # Ok::<(), simplex_mesh::mesh_error::MeshError>(())
//! ```
//!
//! ## Ownership
//! Every constructor call returns a *hold*. A hold is released with
//! [`Topology::erase`](topology::Topology::erase) or handed to a mesh with
//! [`Mesh::insert`](mesh::Mesh::insert), after which the mesh releases it
//! when the cell is erased. Faces stay alive as long as a live cell uses
//! them.

pub mod algs;
pub mod arena;
pub mod config;
pub mod debug_invariants;
pub mod mesh;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::flip_diagonal::{
        find_shared_simplex, flip_diagonal, flip_diagonal_in_mesh,
    };
    pub use crate::arena::{SegmentedAllocator, SlotKey};
    pub use crate::config::TopologyConfig;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh::{
        CellId, Mesh, PointSet, filter_faces, subdivide_tetrahedra, subdivide_triangles,
    };
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::{
        Composite, FootprintId, InvalidateCache, Order, Orientation, Segment, SharedTopology,
        Simplex, Tetrahedron, Topology, Triangle, Vertex,
    };
}
