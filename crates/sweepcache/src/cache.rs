//! The public cache façade: a fixed array of shards, reached with a hash of
//! the key, plus a background task that periodically sweeps every shard for
//! expired entries.

use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use ahash::RandomState;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{Config, NormalizedConfig};
use crate::error::Error;
use crate::shard::{self, Shard};

/// A GC-friendly, concurrent, sharded key-value cache with time-based
/// expiration.
///
/// Entries are stored as length-prefixed frames inside a small number of
/// contiguous byte arenas (one bip-buffer per shard) instead of as
/// individually heap-allocated objects, which keeps the number of
/// GC-visible allocations roughly constant regardless of entry count.
///
/// `Cache::new` must be called from within a running Tokio runtime: it
/// spawns the background sweeper with [`tokio::spawn`].
pub struct Cache {
    shards: Arc<[Shard]>,
    shard_mask: u64,
    config: NormalizedConfig,
    hasher: RandomState,
    closed: Arc<AtomicBool>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    sweeper: Option<JoinHandle<()>>,
}

impl Cache {
    /// Builds a cache with `config`, and spawns its background sweeper task
    /// onto the current Tokio runtime.
    pub fn new(config: Config) -> Self {
        let config = config.normalize();
        let shards: Arc<[Shard]> = (0..config.shards_count)
            .map(|_| shard::new_shard(config.max_shard_size))
            .collect();

        let closed = Arc::new(AtomicBool::new(false));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        info!(
            shards_count = config.shards_count,
            max_shard_size = config.max_shard_size,
            entry_lifetime_secs = config.entry_lifetime.as_secs(),
            cleanup_interval_secs = config.cleanup_interval.as_secs(),
            "starting cache"
        );

        let sweeper = tokio::spawn(run_sweeper(
            Arc::clone(&shards),
            config.entry_lifetime,
            config.cleanup_interval,
            Arc::clone(&closed),
            shutdown_rx,
        ));

        Self {
            shards,
            shard_mask: config.shards_count as u64 - 1,
            config,
            hasher: RandomState::new(),
            closed,
            shutdown_tx: Some(shutdown_tx),
            sweeper: Some(sweeper),
        }
    }

    /// Inserts or overwrites `key` with `value`, timestamped now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the cache has been closed,
    /// [`Error::EntryTooLarge`] if `value` exceeds the configured
    /// `max_entry_size`, and [`Error::MaxSizeReached`] if the owning shard's
    /// queue cannot grow any further to fit it.
    pub fn put<K: Hash>(&self, key: K, value: &[u8]) -> Result<(), Error> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Closed);
        }
        if value.len() > self.config.max_entry_size {
            return Err(Error::EntryTooLarge);
        }

        let hashed_key = self.hash_key(&key);
        let shard = &self.shards[self.shard_index(hashed_key)];
        let mut inner = shard.write().unwrap_or_else(|e| e.into_inner());
        inner
            .put(hashed_key, now_unix(), value)
            .map_err(|_| Error::MaxSizeReached)
    }

    /// Looks up `key`. Returns `None` if absent or expired (expiry is only
    /// enforced by the background sweeper, so a value can briefly outlive
    /// its nominal lifetime between sweeps).
    pub fn get<K: Hash>(&self, key: &K) -> Result<Vec<u8>, Error> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Closed);
        }

        let hashed_key = self.hash_key(key);
        let shard = &self.shards[self.shard_index(hashed_key)];
        let inner = shard.read().unwrap_or_else(|e| e.into_inner());
        inner.get(hashed_key).ok_or(Error::NotFound)
    }

    /// Total number of live entries across every shard. Intended for
    /// observability, not as a basis for capacity decisions (it changes
    /// concurrently with every `put`/sweep).
    pub fn entries_count(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.read().unwrap_or_else(|e| e.into_inner()).len())
            .sum()
    }

    /// Closes the cache: new `put`/`get` calls fail with [`Error::Closed`],
    /// and the background sweeper is signalled to stop. Does not wait for
    /// the sweeper to actually finish its current tick.
    pub fn close(&mut self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("closing cache");
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    fn hash_key<K: Hash>(&self, key: &K) -> u64 {
        let mut hasher = self.hasher.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn shard_index(&self, hashed_key: u64) -> usize {
        (hashed_key & self.shard_mask) as usize
    }
}

impl Drop for Cache {
    fn drop(&mut self) {
        self.close();
        // Drop can't await the sweeper's graceful exit; abort it outright so
        // a cache that's dropped without an explicit close() doesn't leak a
        // task ticking forever against shards nothing can reach anymore.
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}

async fn run_sweeper(
    shards: Arc<[Shard]>,
    entry_lifetime: Duration,
    cleanup_interval: Duration,
    closed: Arc<AtomicBool>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut interval = tokio::time::interval(cleanup_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = now_unix();
                let mut total_evicted = 0;
                for shard in shards.iter() {
                    let mut inner = shard.write().unwrap_or_else(|e| e.into_inner());
                    total_evicted += inner.sweep(now, entry_lifetime);
                }
                if total_evicted > 0 {
                    debug!(total_evicted, "swept expired entries");
                }
            }
            _ = &mut shutdown_rx => {
                closed.store(true, Ordering::Release);
                break;
            }
        }
    }

    warn!("sweeper task stopped");
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs() as i64
}
