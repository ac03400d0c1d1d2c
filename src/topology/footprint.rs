//! Stored record of one unoriented simplex and the pure helpers used to
//! bring a requested composition into canonical form.

use super::orientation::Orientation;
use super::simplex::Face;
use crate::arena::SlotKey;

/// Unoriented simplex as stored in a per-dimension arena.
///
/// `composition` is the traversal the footprint was first built from (empty
/// for vertices) and `orientation` is its parity. Those faces are the ones
/// the footprint holds a use on. `uses` counts, per orientation, the client
/// holds plus the live higher-dimensional footprints that reference this one
/// with that orientation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Footprint {
    pub(crate) composition: Vec<Face>,
    pub(crate) orientation: Orientation,
    pub(crate) uses: [u32; 2],
}

impl Footprint {
    pub(crate) fn new(composition: Vec<Face>, orientation: Orientation) -> Self {
        Self {
            composition,
            orientation,
            uses: [0; 2],
        }
    }

    #[inline]
    pub(crate) fn incidence(&self) -> u32 {
        self.uses[0] + self.uses[1]
    }

    #[inline]
    pub(crate) fn uses(&self, orientation: Orientation) -> u32 {
        self.uses[orientation.index()]
    }

    #[inline]
    pub(crate) fn acquire(&mut self, orientation: Orientation) {
        self.uses[orientation.index()] += 1;
    }

    /// Drop one use of `orientation`; false if there was none.
    #[inline]
    pub(crate) fn release(&mut self, orientation: Orientation) -> bool {
        let slot = &mut self.uses[orientation.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Composition as traversed by a handle of the given orientation.
    pub(crate) fn oriented(&self, dim: usize, orientation: Orientation) -> Vec<Face> {
        if orientation == self.orientation {
            self.composition.clone()
        } else {
            reverse(dim, &self.composition)
        }
    }
}

/// Reverse traversal: faces in opposite order, each face itself flipped for
/// dimensions where faces carry an orientation (D ≥ 2).
pub(crate) fn reverse(dim: usize, composition: &[Face]) -> Vec<Face> {
    composition
        .iter()
        .rev()
        .map(|&f| if dim >= 2 { f.flip() } else { f })
        .collect()
}

/// Order edge indices so that each edge's head is the next edge's tail and
/// the last head closes onto the first tail. `edges` holds `(tail, head)`.
pub(crate) fn chain_head_to_tail(edges: &[(SlotKey, SlotKey)]) -> Option<Vec<usize>> {
    let first = edges.first()?;
    let mut order = Vec::with_capacity(edges.len());
    let mut used = vec![false; edges.len()];
    order.push(0);
    used[0] = true;
    let mut head = first.1;
    for _ in 1..edges.len() {
        let next = (0..edges.len()).find(|&j| !used[j] && edges[j].0 == head)?;
        used[next] = true;
        order.push(next);
        head = edges[next].1;
    }
    (head == first.0).then_some(order)
}
