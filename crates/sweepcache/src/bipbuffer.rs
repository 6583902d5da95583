//! Single-producer/single-consumer bip-buffer: a circular byte arena that
//! always hands out *contiguous* write regions.
//!
//! Unlike a plain ring buffer, a bip-buffer tracks two committed regions
//! (`A` and, once `A` wraps, `B`) plus at most one outstanding reservation.
//! This lets every producer write land in a single contiguous slice, which
//! is what makes storing variable-length, length-prefixed frames possible
//! without ever splicing a write across the wrap boundary.
//!
//! The buffer itself is **not** thread-safe; callers (the entry queue, and
//! above it the shard) are responsible for serializing access.

use crate::invariants::{
    debug_assert_region_b_before_a, debug_assert_reserve_disjoint, debug_assert_space_conserved,
};

pub(crate) struct BipBuffer {
    buf: Vec<u8>,

    idx_a: usize,
    size_a: usize,

    idx_b: usize,
    size_b: usize,

    idx_reserve: usize,
    size_reserve: usize,
}

impl BipBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity],
            idx_a: 0,
            size_a: 0,
            idx_b: 0,
            size_b: 0,
            idx_reserve: 0,
            size_reserve: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn committed_size(&self) -> usize {
        self.size_a + self.size_b
    }

    /// Reserves `size` contiguous bytes for writing. Returns the start offset
    /// and a mutable view onto the reserved region, or `None` if no
    /// sufficiently large contiguous run is free right now.
    ///
    /// A previously outstanding, uncommitted reservation is silently
    /// discarded — the caller must commit before reserving again if it wants
    /// to keep earlier writes.
    pub(crate) fn reserve(&mut self, size: usize) -> Option<(usize, &mut [u8])> {
        let offset = if self.size_b != 0 {
            // Region B is already in play: new reservations can only extend
            // it, inside the gap before Region A.
            let available = self.free_space_in_region_b();
            if available == 0 || size > available {
                return None;
            }
            self.idx_b + self.size_b
        } else {
            let tail_space = self.free_space_after_region_a();
            if tail_space >= self.idx_a {
                if tail_space == 0 || size > tail_space {
                    return None;
                }
                self.idx_a + self.size_a
            } else {
                // More free space before Region A than after it: reserve at
                // the head, which becomes Region B on commit. The only
                // necessary condition is that the head gap fits `size`;
                // requiring `size_a >= size` too would reject valid head
                // reservations whenever Region A happens to be small.
                if self.idx_a == 0 || size > self.idx_a {
                    return None;
                }
                0
            }
        };

        self.idx_reserve = offset;
        self.size_reserve = size;

        debug_assert_reserve_disjoint!(self.reservation_overlaps_committed());

        Some((offset, &mut self.buf[offset..offset + size]))
    }

    /// Commits the first `min(n, size_reserve)` bytes of the outstanding
    /// reservation, making them part of a committed region.
    pub(crate) fn commit(&mut self, n: usize) {
        let n = n.min(self.size_reserve);

        if self.size_a == 0 && self.size_b == 0 {
            self.idx_a = self.idx_reserve;
            self.size_a = n;
        } else if self.idx_reserve == self.idx_a + self.size_a {
            self.size_a += n;
        } else {
            self.size_b += n;
        }

        self.idx_reserve = 0;
        self.size_reserve = 0;

        debug_assert_region_b_before_a!(self.idx_b, self.size_b, self.idx_a);
        debug_assert_space_conserved!(
            self.size_a,
            self.size_b,
            self.capacity() - self.committed_size(),
            self.capacity()
        );
    }

    /// Frees `n` bytes from the front (Region A). If `n` consumes all of
    /// Region A, Region B (if any) is promoted to Region A.
    pub(crate) fn decommit(&mut self, n: usize) {
        if n >= self.size_a {
            self.idx_a = self.idx_b;
            self.size_a = self.size_b;
            self.idx_b = 0;
            self.size_b = 0;
        } else {
            self.idx_a += n;
            self.size_a -= n;
        }

        debug_assert_region_b_before_a!(self.idx_b, self.size_b, self.idx_a);
    }

    /// Returns the committed contiguous block starting at Region A, or
    /// `None` if the buffer is empty. Repeated calls return the same slice
    /// until the next mutating call.
    pub(crate) fn contiguous_block(&self) -> Option<&[u8]> {
        if self.size_a == 0 {
            return None;
        }
        Some(&self.buf[self.idx_a..self.idx_a + self.size_a])
    }

    /// Offset of the start of Region A, i.e. where the next `decommit` reads
    /// from, or `None` if the buffer is empty.
    pub(crate) fn front_offset(&self) -> Option<usize> {
        if self.size_a == 0 {
            None
        } else {
            Some(self.idx_a)
        }
    }

    /// Returns the `size` bytes starting at `offset`, provided they lie
    /// entirely within Region A or entirely within Region B.
    pub(crate) fn peek_at(&self, offset: usize, size: usize) -> Option<&[u8]> {
        if self.area_in_region_a(offset, size) || self.area_in_region_b(offset, size) {
            Some(&self.buf[offset..offset + size])
        } else {
            None
        }
    }

    /// Doubles the buffer's capacity, compacting all committed data to start
    /// at offset 0 of the new buffer. Invalidates every previously-returned
    /// offset.
    pub(crate) fn grow(&mut self) {
        let mut new_buf = vec![0u8; 2 * self.capacity()];
        let mut n = 0;

        while let Some(block) = self.contiguous_block() {
            let k = block.len();
            new_buf[n..n + k].copy_from_slice(block);
            n += k;
            self.decommit(k);
        }

        self.buf = new_buf;
        self.idx_a = 0;
        self.size_a = 0;
        self.idx_b = 0;
        self.size_b = 0;
        self.idx_reserve = 0;
        self.size_reserve = n;
        self.commit(n);
    }

    fn area_in_region_a(&self, offset: usize, size: usize) -> bool {
        self.size_a != 0 && offset >= self.idx_a && offset + size <= self.idx_a + self.size_a
    }

    fn area_in_region_b(&self, offset: usize, size: usize) -> bool {
        self.size_b != 0 && offset >= self.idx_b && offset + size <= self.idx_b + self.size_b
    }

    fn free_space_after_region_a(&self) -> usize {
        self.capacity() - (self.idx_a + self.size_a)
    }

    fn free_space_in_region_b(&self) -> usize {
        self.idx_a - (self.idx_b + self.size_b)
    }

    fn reservation_overlaps_committed(&self) -> bool {
        if self.size_reserve == 0 {
            return false;
        }
        let r_end = self.idx_reserve + self.size_reserve;
        let overlaps_a = self.size_a != 0 && self.idx_reserve < self.idx_a + self.size_a && r_end > self.idx_a;
        let overlaps_b = self.size_b != 0 && self.idx_reserve < self.idx_b + self.size_b && r_end > self.idx_b;
        overlaps_a || overlaps_b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_commit_decommit_round_trip() {
        let mut bb = BipBuffer::new(32);
        let (offset, slice) = bb.reserve(16).unwrap();
        assert_eq!(offset, 0);
        assert_eq!(slice.len(), 16);
        bb.commit(16);
        assert_eq!(bb.committed_size(), 16);
        bb.decommit(16);
        assert_eq!(bb.committed_size(), 0);
    }

    #[test]
    fn grow_doubles_capacity_and_preserves_committed_size() {
        let mut bb = BipBuffer::new(8);
        let (_, slice) = bb.reserve(5).unwrap();
        slice.copy_from_slice(b"hello");
        bb.commit(5);

        bb.grow();
        assert_eq!(bb.capacity(), 16);
        assert_eq!(bb.committed_size(), 5);
        assert_eq!(bb.contiguous_block().unwrap(), b"hello");
    }

    #[test]
    fn reserve_fails_when_no_contiguous_space() {
        let mut bb = BipBuffer::new(8);
        bb.reserve(8).unwrap();
        bb.commit(8);
        assert!(bb.reserve(1).is_none());
    }

    #[test]
    fn wrap_around_creates_region_b() {
        let mut bb = BipBuffer::new(16);
        // Fill region A, then free most of its front so the remaining tail
        // space (4) is smaller than the head space (8): the next reserve
        // must wrap into Region B rather than extend the tail.
        bb.reserve(12).unwrap();
        bb.commit(12);
        bb.decommit(8);
        assert_eq!(bb.committed_size(), 4);

        let (offset, _) = bb.reserve(6).unwrap();
        assert_eq!(offset, 0);
        bb.commit(6);
        assert_eq!(bb.committed_size(), 4 + 6);
    }

    #[test]
    fn peek_at_succeeds_only_inside_committed_regions() {
        let mut bb = BipBuffer::new(16);
        bb.reserve(10).unwrap();
        bb.commit(10);
        assert!(bb.peek_at(0, 10).is_some());
        assert!(bb.peek_at(5, 5).is_some());
        assert!(bb.peek_at(0, 11).is_none());
        assert!(bb.peek_at(10, 1).is_none());
    }

    #[test]
    fn reserve_discards_uncommitted_reservation() {
        let mut bb = BipBuffer::new(16);
        let _ = bb.reserve(10).unwrap();
        // No commit() — the next reserve should simply overwrite it.
        let (offset, _) = bb.reserve(4).unwrap();
        assert_eq!(offset, 0);
        bb.commit(4);
        assert_eq!(bb.committed_size(), 4);
    }

    #[test]
    fn committed_and_free_sum_to_capacity_through_a_sequence() {
        let mut bb = BipBuffer::new(64);
        let mut expected_committed = 0usize;

        for size in [8usize, 8, 16, 4, 20, 8] {
            if let Some((_, slice)) = bb.reserve(size) {
                slice.fill(0xAB);
                bb.commit(size);
                expected_committed += size;
            }
            assert_eq!(bb.committed_size(), expected_committed);
            assert_eq!(bb.capacity() - bb.committed_size() + bb.committed_size(), bb.capacity());
        }
    }
}
