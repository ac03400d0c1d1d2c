//! Segmented, address-stable object pool with FIFO slot reuse.
//!
//! Storage grows one fixed-size segment at a time and never moves an
//! element once placed. Erased slots go to the back of a free queue and are
//! handed out again front-first before any fresh slot past the high-water
//! mark. Every slot carries a generation counter so a [`SlotKey`] taken
//! before an erase never aliases whatever is placed there afterwards.

use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use super::iter::{Iter, Keys};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;

/// Stable identifier of one placement in a [`SegmentedAllocator`].
///
/// `index` is the flat slot position (segment * segment_size + offset);
/// `generation` distinguishes successive occupants of the same slot.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct SlotKey {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl SlotKey {
    /// Flat slot position.
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// How many times the slot had been vacated before this placement.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.index, self.generation)
    }
}

#[derive(Debug)]
pub(crate) struct Slot<T> {
    pub(crate) value: Option<T>,
    pub(crate) generation: u32,
}

/// One fixed-size block of slots plus the link to the next block.
#[derive(Debug)]
pub(crate) struct ArenaSegment<T> {
    pub(crate) slots: Box<[Slot<T>]>,
    pub(crate) next: Option<usize>,
}

impl<T> ArenaSegment<T> {
    fn new(size: usize) -> Self {
        let slots = (0..size)
            .map(|_| Slot {
                value: None,
                generation: 0,
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { slots, next: None }
    }
}

/// Address-stable pool of `T`, grown in segments of `segment_size` slots.
#[derive(Debug)]
pub struct SegmentedAllocator<T> {
    segment_size: usize,
    segments: Vec<ArenaSegment<T>>,
    /// High-water mark: slots below it have been handed out at least once.
    end: usize,
    n_elements: usize,
    available: VecDeque<usize>,
}

impl<T> SegmentedAllocator<T> {
    /// Create an empty pool; no segment is allocated until the first placement.
    ///
    /// Returns [`MeshError::InvalidSegmentSize`] for `segment_size == 0`.
    pub fn new(segment_size: usize) -> Result<Self, MeshError> {
        NonZeroUsize::new(segment_size)
            .map(Self::with_segment_size)
            .ok_or(MeshError::InvalidSegmentSize)
    }

    /// Infallible constructor for a size already known to be positive.
    pub fn with_segment_size(segment_size: NonZeroUsize) -> Self {
        Self {
            segment_size: segment_size.get(),
            segments: Vec::new(),
            end: 0,
            n_elements: 0,
            available: VecDeque::new(),
        }
    }

    #[inline]
    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    /// Number of slots across all allocated segments.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.segments.len() * self.segment_size
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_elements
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_elements == 0
    }

    #[inline]
    pub fn n_segments(&self) -> usize {
        self.segments.len()
    }

    /// Key of the slot the next [`insert`](Self::insert) should use.
    ///
    /// The front of the free queue wins; otherwise the high-water slot is
    /// claimed, allocating a new segment when the last one is full.
    pub fn location_for_placement(&mut self) -> SlotKey {
        if let Some(&index) = self.available.front() {
            return SlotKey {
                index: index as u32,
                generation: self.slot(index).generation,
            };
        }
        if self.end == self.capacity() {
            self.allocate_segment();
        }
        let index = self.end;
        self.end += 1;
        SlotKey {
            index: index as u32,
            generation: self.slot(index).generation,
        }
    }

    /// Place `value` at a slot previously returned by
    /// [`location_for_placement`](Self::location_for_placement).
    ///
    /// # Panics
    /// If the key does not belong to this pool, is outdated, or the slot is
    /// already occupied.
    pub fn insert(&mut self, key: SlotKey, value: T) -> SlotKey {
        let index = key.index as usize;
        assert!(
            index < self.end,
            "slot {key} was never handed out by this allocator"
        );
        if let Some(pos) = self.available.iter().position(|&i| i == index) {
            self.available.remove(pos);
        }
        let slot = self.slot_mut(index);
        assert_eq!(slot.generation, key.generation, "outdated slot key {key}");
        assert!(slot.value.is_none(), "slot {key} is already occupied");
        slot.value = Some(value);
        self.n_elements += 1;
        key
    }

    /// Place `value` at the next available slot.
    pub fn emplace(&mut self, value: T) -> SlotKey {
        let key = self.location_for_placement();
        self.insert(key, value)
    }

    /// Remove and return the element at `key`; its slot joins the back of
    /// the free queue.
    ///
    /// # Panics
    /// If the key was not produced by this pool or its slot is vacant.
    pub fn erase(&mut self, key: SlotKey) -> T {
        let index = key.index as usize;
        assert!(
            self.owns(index),
            "slot {key} does not belong to this allocator"
        );
        let slot = self.slot_mut(index);
        assert_eq!(slot.generation, key.generation, "outdated slot key {key}");
        let Some(value) = slot.value.take() else {
            panic!("slot {key} is vacant");
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.available.push_back(index);
        self.n_elements -= 1;
        value
    }

    pub fn get(&self, key: SlotKey) -> Option<&T> {
        let index = key.index as usize;
        if index >= self.end {
            return None;
        }
        let slot = self.slot(index);
        if slot.generation != key.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, key: SlotKey) -> Option<&mut T> {
        let index = key.index as usize;
        if index >= self.end {
            return None;
        }
        let slot = self.slot_mut(index);
        if slot.generation != key.generation {
            return None;
        }
        slot.value.as_mut()
    }

    #[inline]
    pub fn contains(&self, key: SlotKey) -> bool {
        self.get(key).is_some()
    }

    /// Live elements in slot-address order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.segments, self.segment_size, self.end)
    }

    /// Keys of live elements in slot-address order.
    pub fn keys(&self) -> Keys<'_, T> {
        Keys::new(self.iter())
    }

    fn allocate_segment(&mut self) {
        let new_index = self.segments.len();
        if let Some(last) = self.segments.last_mut() {
            last.next = Some(new_index);
        }
        self.segments.push(ArenaSegment::new(self.segment_size));
        log::debug!(
            "allocated arena segment {new_index} ({} slots)",
            self.segment_size
        );
    }

    /// Whether `index` lies inside one of this pool's handed-out slots.
    fn owns(&self, index: usize) -> bool {
        if cfg!(debug_assertions) {
            // walk the segment chain rather than trusting arithmetic alone
            let mut base = 0;
            let mut segment = if self.segments.is_empty() {
                None
            } else {
                Some(0)
            };
            while let Some(s) = segment {
                if index < base + self.segment_size {
                    return index < self.end;
                }
                base += self.segment_size;
                segment = self.segments[s].next;
            }
            false
        } else {
            index < self.end
        }
    }

    #[inline]
    fn slot(&self, index: usize) -> &Slot<T> {
        &self.segments[index / self.segment_size].slots[index % self.segment_size]
    }

    #[inline]
    fn slot_mut(&mut self, index: usize) -> &mut Slot<T> {
        let size = self.segment_size;
        &mut self.segments[index / size].slots[index % size]
    }
}

impl<'a, T> IntoIterator for &'a SegmentedAllocator<T> {
    type Item = (SlotKey, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> DebugInvariants for SegmentedAllocator<T> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "SegmentedAllocator");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        crate::ensure_invariant!(
            self.end <= self.capacity(),
            "high-water mark {} beyond capacity {}",
            self.end,
            self.capacity()
        );
        for (i, segment) in self.segments.iter().enumerate() {
            let expected = (i + 1 < self.segments.len()).then_some(i + 1);
            crate::ensure_invariant!(
                segment.next == expected,
                "segment {i} links to {:?}, expected {:?}",
                segment.next,
                expected
            );
        }
        let live = (0..self.end)
            .filter(|&i| self.slot(i).value.is_some())
            .count();
        crate::ensure_invariant!(
            live == self.n_elements,
            "element count {} but {live} occupied slots",
            self.n_elements
        );
        let mut seen = hashbrown::HashSet::with_capacity(self.available.len());
        for &i in &self.available {
            crate::ensure_invariant!(i < self.end, "free slot {i} beyond high-water mark");
            crate::ensure_invariant!(seen.insert(i), "free slot {i} queued twice");
            crate::ensure_invariant!(
                self.slot(i).value.is_none(),
                "free slot {i} is occupied"
            );
        }
        crate::ensure_invariant!(
            live + self.available.len() <= self.end,
            "slots below high-water mark are double counted"
        );
        Ok(())
    }
}
