//! Typed handles: footprint ids and oriented simplices.
//!
//! Handles are plain `Copy` values (an arena key plus an orientation), so
//! they can be stored, compared and serialized freely. Whether a handle is
//! still live is decided by the owning [`Topology`](super::Topology).

use core::fmt::{self, Debug, Display, Formatter};
use core::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::orientation::Orientation;
use super::order::Order;
use crate::arena::SlotKey;

/// Identity of an unoriented simplex of dimension `O`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct FootprintId<O: Order> {
    key: SlotKey,
    #[serde(skip)]
    _order: PhantomData<O>,
}

impl<O: Order> FootprintId<O> {
    #[inline]
    pub(crate) fn new(key: SlotKey) -> Self {
        Self {
            key,
            _order: PhantomData,
        }
    }

    #[inline]
    pub fn key(self) -> SlotKey {
        self.key
    }

    /// Flat arena index; unique among live footprints of this dimension.
    #[inline]
    pub fn index(self) -> u32 {
        self.key.index()
    }
}

impl<O: Order> Debug for FootprintId<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", O::NAME, self.key)
    }
}

/// An oriented simplex: a footprint traversed in one of two directions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Simplex<O: Order> {
    footprint: FootprintId<O>,
    orientation: Orientation,
}

impl<O: Order> Simplex<O> {
    #[inline]
    pub(crate) fn new(footprint: FootprintId<O>, orientation: Orientation) -> Self {
        Self {
            footprint,
            orientation,
        }
    }

    #[inline]
    pub fn footprint(self) -> FootprintId<O> {
        self.footprint
    }

    #[inline]
    pub fn orientation(self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.orientation.is_positive()
    }

    /// Same footprint, opposite orientation.
    #[inline]
    pub fn flip(self) -> Self {
        Self::new(self.footprint, self.orientation.flip())
    }

    /// Same footprint, positive orientation.
    #[inline]
    pub fn positive(self) -> Self {
        Self::new(self.footprint, Orientation::Positive)
    }
}

impl<O: Order> Debug for Simplex<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_positive() { '+' } else { '-' };
        write!(f, "{sign}{:?}", self.footprint)
    }
}

impl<O: Order> Display for Simplex<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

/// Untyped oriented reference to a footprint one dimension down; the
/// element type of stored compositions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Face {
    pub(crate) key: SlotKey,
    pub(crate) orientation: Orientation,
}

impl Face {
    #[inline]
    pub(crate) fn flip(self) -> Self {
        Self {
            key: self.key,
            orientation: self.orientation.flip(),
        }
    }
}

impl<O: Order> From<Simplex<O>> for Face {
    fn from(s: Simplex<O>) -> Self {
        Face {
            key: s.footprint.key,
            orientation: s.orientation,
        }
    }
}

impl<O: Order> From<Face> for Simplex<O> {
    fn from(face: Face) -> Self {
        Simplex::new(FootprintId::new(face.key), face.orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::order::{Segment, Triangle};
    use static_assertions::{assert_eq_size, assert_impl_all};

    assert_eq_size!(FootprintId<Triangle>, u64);
    assert_impl_all!(Simplex<Segment>: Copy, Send, Sync, core::hash::Hash, Ord);

    fn key(index: u32) -> SlotKey {
        SlotKey {
            index,
            generation: 1,
        }
    }

    #[test]
    fn flip_keeps_footprint() {
        let s = Simplex::<Segment>::new(FootprintId::new(key(3)), Orientation::Positive);
        assert_eq!(s.flip().footprint(), s.footprint());
        assert_eq!(s.flip().flip(), s);
        assert_eq!(s.flip().positive(), s);
        assert_eq!(format!("{:?}", s.flip()), "-Segment#3.1");
    }

    #[test]
    fn handles_round_trip_through_serde() {
        let s = Simplex::<Triangle>::new(FootprintId::new(key(9)), Orientation::Negative);
        let json = serde_json::to_string(&s).unwrap();
        let back: Simplex<Triangle> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);

        let bytes = bincode::serialize(&s).unwrap();
        let back: Simplex<Triangle> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn face_conversion_preserves_orientation() {
        let s = Simplex::<Segment>::new(FootprintId::new(key(2)), Orientation::Negative);
        let face = Face::from(s);
        assert_eq!(Simplex::<Segment>::from(face), s);
        assert_eq!(Simplex::<Segment>::from(face.flip()), s.flip());
    }
}
