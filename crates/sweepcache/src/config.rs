use std::time::Duration;

const DEFAULT_SHARDS_COUNT: usize = 1024;
const DEFAULT_MAX_SHARD_SIZE: usize = 4 * 1024;
const DEFAULT_MAX_ENTRY_SIZE: usize = 1024;
const DEFAULT_ENTRY_LIFETIME: Duration = Duration::from_secs(10 * 60);
const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for a [`crate::Cache`].
///
/// All fields default to the values documented below; `0` (or a non-positive
/// value, where applicable) on any field means "use the default" rather than
/// "use zero", with the single exception of `max_shard_size`, where `0` means
/// unbounded growth.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Number of shards. Rounded up to the next power of two. `<= 0` uses the default (1024).
    pub shards_count: i64,
    /// Upper bound, in bytes, on a single shard's queue capacity. `0` means unbounded.
    /// `< 0` uses the default (4096). A non-zero value that isn't already a
    /// power of two is rounded up to the next one.
    pub max_shard_size: i64,
    /// Maximum size, in bytes, of a single stored value. `0` uses the default (1024).
    pub max_entry_size: usize,
    /// How long an entry remains live after insertion. `0` uses the default (10 minutes).
    pub entry_lifetime: Duration,
    /// How often the background sweeper walks every shard. `0` uses the default (1 minute).
    pub cleanup_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shards_count: DEFAULT_SHARDS_COUNT as i64,
            max_shard_size: DEFAULT_MAX_SHARD_SIZE as i64,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            entry_lifetime: DEFAULT_ENTRY_LIFETIME,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

/// Normalized configuration actually used by the cache, derived once at
/// construction time and then treated as immutable for the cache's lifetime.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NormalizedConfig {
    pub(crate) shards_count: usize,
    pub(crate) max_shard_size: usize,
    pub(crate) max_entry_size: usize,
    pub(crate) entry_lifetime: Duration,
    pub(crate) cleanup_interval: Duration,
}

impl Config {
    pub(crate) fn normalize(self) -> NormalizedConfig {
        let shards_count = if self.shards_count <= 0 {
            DEFAULT_SHARDS_COUNT
        } else {
            (self.shards_count as usize).next_power_of_two()
        };

        let max_shard_size = if self.max_shard_size < 0 {
            DEFAULT_MAX_SHARD_SIZE
        } else if self.max_shard_size == 0 {
            0
        } else {
            (self.max_shard_size as usize).next_power_of_two()
        };

        let max_entry_size = if self.max_entry_size == 0 {
            DEFAULT_MAX_ENTRY_SIZE
        } else {
            self.max_entry_size
        };

        let entry_lifetime = if self.entry_lifetime.is_zero() {
            DEFAULT_ENTRY_LIFETIME
        } else {
            self.entry_lifetime
        };

        let cleanup_interval = if self.cleanup_interval.is_zero() {
            DEFAULT_CLEANUP_INTERVAL
        } else {
            self.cleanup_interval
        };

        NormalizedConfig {
            shards_count,
            max_shard_size,
            max_entry_size,
            entry_lifetime,
            cleanup_interval,
        }
    }
}
