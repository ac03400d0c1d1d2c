//! Compile-time dimension markers.
//!
//! Every handle is parameterised by one of [`Vertex`], [`Segment`],
//! [`Triangle`] or [`Tetrahedron`], so a triangle can only be composed of
//! segment handles and so on. The markers carry no data.

use core::fmt::Debug;
use core::hash::Hash;

use serde::{Deserialize, Serialize};

mod sealed {
    pub trait Sealed {}
}

/// A simplex dimension known at compile time.
pub trait Order:
    sealed::Sealed + Copy + Eq + Ord + Hash + Debug + Default + Send + Sync + 'static
{
    /// Topological dimension D.
    const DIM: usize;
    /// Human-readable name used in errors and logs.
    const NAME: &'static str;
    /// D + 1.
    const N_VERTICES: usize = Self::DIM + 1;
}

/// A dimension with a boundary of dimension `DIM - 1`.
pub trait Composite: Order {
    type Face: Order;
}

macro_rules! order_marker {
    ($(#[$meta:meta])* $name:ident, $dim:expr) => {
        $(#[$meta])*
        #[derive(
            Copy,
            Clone,
            Debug,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Default,
            Serialize,
            Deserialize,
        )]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl Order for $name {
            const DIM: usize = $dim;
            const NAME: &'static str = stringify!($name);
        }
    };
}

order_marker!(
    /// 0-simplex.
    Vertex,
    0
);
order_marker!(
    /// 1-simplex, composed of two vertices.
    Segment,
    1
);
order_marker!(
    /// 2-simplex, composed of three oriented segments.
    Triangle,
    2
);
order_marker!(
    /// 3-simplex, composed of four oriented triangles.
    Tetrahedron,
    3
);

impl Composite for Segment {
    type Face = Vertex;
}

impl Composite for Triangle {
    type Face = Segment;
}

impl Composite for Tetrahedron {
    type Face = Triangle;
}

/// Highest dimension the registry stores.
pub const MAX_DIM: usize = Tetrahedron::DIM;
