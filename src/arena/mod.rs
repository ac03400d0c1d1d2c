//! Segmented storage backing every footprint and mesh cell.

pub mod iter;
pub mod segmented;

pub use iter::{Iter, Keys};
pub use segmented::{SegmentedAllocator, SlotKey};
