//! Per-dimension interning store: one arena of footprints plus the map from
//! representative (sorted face keys) to footprint key.

use std::num::NonZeroUsize;

use hashbrown::HashMap;
use itertools::Itertools;

use super::footprint::Footprint;
use super::orientation::Orientation;
use super::simplex::Face;
use crate::arena::{SegmentedAllocator, SlotKey};

#[derive(Debug)]
pub(crate) struct SimplexFactory {
    dim: usize,
    footprints: SegmentedAllocator<Footprint>,
    representatives: HashMap<Vec<SlotKey>, SlotKey>,
}

/// Order-independent identity of a composition.
pub(crate) fn representative(composition: &[Face]) -> Vec<SlotKey> {
    composition.iter().map(|f| f.key).sorted().collect()
}

impl SimplexFactory {
    pub(crate) fn new(dim: usize, segment_size: NonZeroUsize) -> Self {
        Self {
            dim,
            footprints: SegmentedAllocator::with_segment_size(segment_size),
            representatives: HashMap::new(),
        }
    }

    #[inline]
    pub(crate) fn dim(&self) -> usize {
        self.dim
    }

    pub(crate) fn find(&self, representative: &[SlotKey]) -> Option<SlotKey> {
        self.representatives.get(representative).copied()
    }

    /// Store a new footprint with zero uses. `orientation` is the parity of
    /// `composition`.
    pub(crate) fn create(&mut self, composition: Vec<Face>, orientation: Orientation) -> SlotKey {
        let rep = representative(&composition);
        let key = self
            .footprints
            .emplace(Footprint::new(composition, orientation));
        if self.dim > 0 {
            self.representatives.insert(rep, key);
        }
        log::trace!("created {}-footprint {key}", self.dim);
        key
    }

    /// Remove a footprint from both the arena and the interning map.
    pub(crate) fn destroy(&mut self, key: SlotKey) -> Footprint {
        let footprint = self.footprints.erase(key);
        if self.dim > 0 {
            self.representatives
                .remove(&representative(&footprint.composition));
        }
        log::trace!("destroyed {}-footprint {key}", self.dim);
        footprint
    }

    #[inline]
    pub(crate) fn get(&self, key: SlotKey) -> Option<&Footprint> {
        self.footprints.get(key)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, key: SlotKey) -> Option<&mut Footprint> {
        self.footprints.get_mut(key)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.footprints.len()
    }

    pub(crate) fn footprints(&self) -> &SegmentedAllocator<Footprint> {
        &self.footprints
    }

    pub(crate) fn representatives(&self) -> &HashMap<Vec<SlotKey>, SlotKey> {
        &self.representatives
    }
}
