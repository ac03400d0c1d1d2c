//! Forward iteration over the live slots of a [`SegmentedAllocator`].
//!
//! [`SegmentedAllocator`]: super::SegmentedAllocator

use std::iter::FusedIterator;

use super::segmented::{ArenaSegment, SlotKey};

/// Yields `(key, &value)` for each occupied slot in address order, crossing
/// segment boundaries through the segment links and stopping at the
/// high-water mark.
pub struct Iter<'a, T> {
    segments: &'a [ArenaSegment<T>],
    segment_size: usize,
    segment: Option<usize>,
    offset: usize,
    position: usize,
    end: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(segments: &'a [ArenaSegment<T>], segment_size: usize, end: usize) -> Self {
        Self {
            segments,
            segment_size,
            segment: if segments.is_empty() { None } else { Some(0) },
            offset: 0,
            position: 0,
            end,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotKey, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.end {
            let current = self.segment?;
            let segment = &self.segments[current];
            if self.offset == self.segment_size {
                self.segment = segment.next;
                self.offset = 0;
                continue;
            }
            let slot = &segment.slots[self.offset];
            let index = self.position;
            self.offset += 1;
            self.position += 1;
            if let Some(value) = slot.value.as_ref() {
                let key = SlotKey {
                    index: index as u32,
                    generation: slot.generation,
                };
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.position))
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

/// Keys of the occupied slots, in address order.
pub struct Keys<'a, T> {
    inner: Iter<'a, T>,
}

impl<'a, T> Keys<'a, T> {
    pub(crate) fn new(inner: Iter<'a, T>) -> Self {
        Self { inner }
    }
}

impl<T> Iterator for Keys<'_, T> {
    type Item = SlotKey;

    #[inline]
    fn next(&mut self) -> Option<SlotKey> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> FusedIterator for Keys<'_, T> {}
