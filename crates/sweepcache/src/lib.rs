//! sweepcache: a GC-friendly, concurrent, sharded key-value cache with
//! time-based expiration.
//!
//! Values are stored as length-prefixed frames inside a small, fixed number
//! of contiguous byte arenas (one [bip-buffer](https://www.codeproject.com/Articles/3479/The-Bip-Buffer-The-Circular-Buffer-with-a-Twist)
//! per shard) rather than as individually heap-allocated objects. Lookup
//! keys are hashed and routed to one of the shards; each shard's queue is
//! ordered by insertion time, so a background sweeper can evict expired
//! entries in O(expired) per tick instead of scanning every live entry.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() {
//! use sweepcache::{Cache, Config};
//!
//! let mut cache = Cache::new(Config::default());
//! cache.put("user:42", b"alice").unwrap();
//! assert_eq!(cache.get(&"user:42").unwrap(), b"alice");
//! cache.close();
//! # }
//! ```

mod bipbuffer;
mod cache;
mod config;
mod error;
mod frame;
mod invariants;
mod queue;
mod shard;

pub use cache::Cache;
pub use config::Config;
pub use error::Error;
