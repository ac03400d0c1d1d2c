//! MeshError: Unified error type for simplex-mesh public APIs
//!
//! Every fallible operation on the topology registry, on meshes and on the
//! flip-diagonal algorithm reports through this enum. Lookups that simply
//! find nothing (`exists`, `incidence`) return `false`/`0` instead.

use thiserror::Error;

use crate::topology::orientation::Orientation;

/// Unified error type for simplex-mesh operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Arena segments must hold at least one slot.
    #[error("segment size must be positive")]
    InvalidSegmentSize,
    /// The faces handed to a constructor do not bound a simplex.
    #[error("invalid {order} composition: {reason}")]
    InvalidComposition {
        order: &'static str,
        reason: String,
    },
    /// The handle refers to a footprint that has been destroyed.
    #[error("{order} #{index} is not a live simplex")]
    StaleSimplex { order: &'static str, index: u32 },
    /// Releasing an orientation that has no remaining use.
    #[error("{order} #{index} is not held with {orientation} orientation")]
    OrientationNotHeld {
        order: &'static str,
        index: u32,
        orientation: Orientation,
    },
    /// Flip-diagonal was asked to operate on triangles without a common edge.
    #[error("triangles share no edge")]
    NoSharedEdge,
    /// The cell is not a member of the mesh.
    #[error("cell {0} is not in the mesh")]
    CellNotInMesh(String),
    /// A structural check found inconsistent bookkeeping.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
