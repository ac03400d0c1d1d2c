//! Two-valued orientation of an oriented simplex; group C₂.
//!
//! Compose = XOR; inverse = self. A handle's orientation is the parity of
//! the vertex order it induces against ascending vertex keys.

use core::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Sign of an oriented simplex relative to its footprint.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Orientation {
    #[default]
    Positive,
    Negative,
}

impl Orientation {
    /// Both orientations, positive first.
    pub const ALL: [Orientation; 2] = [Orientation::Positive, Orientation::Negative];

    #[inline]
    pub const fn flip(self) -> Self {
        match self {
            Orientation::Positive => Orientation::Negative,
            Orientation::Negative => Orientation::Positive,
        }
    }

    /// Group law: equal signs give positive.
    #[inline]
    pub const fn compose(self, other: Self) -> Self {
        if self.is_positive() == other.is_positive() {
            Orientation::Positive
        } else {
            Orientation::Negative
        }
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Orientation::Positive)
    }

    /// Positive for even permutations, negative for odd ones.
    #[inline]
    pub const fn from_parity(odd: bool) -> Self {
        if odd {
            Orientation::Negative
        } else {
            Orientation::Positive
        }
    }

    /// `+1` or `-1`.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Orientation::Positive => 1,
            Orientation::Negative => -1,
        }
    }

    /// Slot of this orientation in per-orientation counter pairs.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Orientation::Positive => 0,
            Orientation::Negative => 1,
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Positive => "positive",
            Orientation::Negative => "negative",
        })
    }
}

/// Parity of `seq` as a permutation of its sorted order, or `None` when it
/// contains a repeated element.
pub fn permutation_parity<T: Ord>(seq: &[T]) -> Option<Orientation> {
    let mut odd = false;
    for i in 0..seq.len() {
        for j in (i + 1)..seq.len() {
            match seq[i].cmp(&seq[j]) {
                core::cmp::Ordering::Equal => return None,
                core::cmp::Ordering::Greater => odd = !odd,
                core::cmp::Ordering::Less => {}
            }
        }
    }
    Some(Orientation::from_parity(odd))
}

/// Sign of the permutation taking `from` to `to`, or `None` when the two
/// are not permutations of the same distinct elements.
pub fn relative_parity<T: Ord + Clone>(from: &[T], to: &[T]) -> Option<Orientation> {
    if from.len() != to.len() {
        return None;
    }
    let mut a = from.to_vec();
    let mut b = to.to_vec();
    a.sort();
    b.sort();
    if a != b {
        return None;
    }
    Some(permutation_parity(from)?.compose(permutation_parity(to)?))
}
