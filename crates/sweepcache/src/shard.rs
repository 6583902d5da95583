//! A single shard: an [`EntryQueue`] plus a hash index, guarded by a single
//! `RwLock` so reads (`get`) can run concurrently with each other.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use crossbeam_utils::CachePadded;

use crate::error::BufferError;
use crate::frame::{self, frame_len_for};
use crate::queue::EntryQueue;

/// A shard, padded to its own cache line so that concurrent access to
/// adjacent shards in the cache's shard array never false-shares.
pub(crate) type Shard = CachePadded<RwLock<ShardInner>>;

pub(crate) fn new_shard(max_shard_size: usize) -> Shard {
    CachePadded::new(RwLock::new(ShardInner::new(max_shard_size)))
}

pub(crate) struct ShardInner {
    queue: EntryQueue,
    index: HashMap<u64, usize>,
}

impl ShardInner {
    fn new(max_shard_size: usize) -> Self {
        Self { queue: EntryQueue::new(max_shard_size), index: HashMap::new() }
    }

    pub(crate) fn put(
        &mut self,
        hashed_key: u64,
        created_at: i64,
        value: &[u8],
    ) -> Result<(), BufferError> {
        let needed = frame_len_for(value);
        while !self.queue.space_available(needed) {
            self.queue.grow()?;
            self.rebuild_index();
        }

        let offset = self.queue.push(hashed_key, created_at, value)?;
        self.index.insert(hashed_key, offset);
        Ok(())
    }

    pub(crate) fn get(&self, hashed_key: u64) -> Option<Vec<u8>> {
        let offset = *self.index.get(&hashed_key)?;
        let frame = match self.queue.peek_at(offset) {
            Ok(frame) => frame,
            Err(_) => {
                debug_assert!(false, "index held a dead offset {offset} for key {hashed_key}");
                return None;
            }
        };
        match frame::value_of(&frame) {
            Ok(value) => Some(value),
            Err(_) => {
                debug_assert!(false, "index offset {offset} did not point at a valid frame");
                None
            }
        }
    }

    /// Called after a successful `grow`, while still holding the write lock:
    /// every offset the index holds was invalidated by the grow, so the
    /// index is rebuilt by scanning the now-compacted queue front to back.
    fn rebuild_index(&mut self) {
        self.index.clear();
        for (hashed_key, offset) in self.queue.frame_offsets() {
            self.index.insert(hashed_key, offset);
        }
    }

    /// Walks the queue from the front, evicting every frame older than
    /// `lifetime` relative to `now`. Stops at the first frame that is still
    /// live, since insertion order is age order.
    pub(crate) fn sweep(&mut self, now: i64, lifetime: Duration) -> usize {
        let lifetime_secs = lifetime.as_secs() as i64;
        let mut evicted = 0;

        loop {
            let frame = match self.queue.front() {
                Ok(f) => f,
                Err(BufferError::Empty) => break,
                Err(_) => break,
            };
            let created_at = match frame::timestamp_of(&frame) {
                Ok(t) => t,
                Err(_) => break,
            };
            if now - created_at <= lifetime_secs {
                break;
            }

            // A key overwritten since this frame was pushed leaves the old
            // frame behind as a tombstone at the front of the queue; only
            // drop the index entry if it still points at this exact frame.
            if let Ok((hashed_key, _, _)) = frame::decode(&frame) {
                let offset = self.queue.front_offset();
                if self.index.get(&hashed_key).copied() == offset {
                    self.index.remove(&hashed_key);
                }
            }
            self.queue.pop().ok();
            evicted += 1;
        }

        evicted
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}
