use std::collections::HashMap;

use proptest::prelude::*;
use sweepcache::{Cache, Config};

fn small_value() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

proptest! {
    /// A sequence of puts, each to a distinct key, must all be independently
    /// retrievable afterwards regardless of how many shards the keys land in.
    #[test]
    fn every_put_key_is_retrievable(values in prop::collection::vec(small_value(), 1..200)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache = Cache::new(Config { shards_count: 16, ..Config::default() });
            for (key, value) in values.iter().enumerate() {
                cache.put(key as u64, value).unwrap();
            }
            for (key, value) in values.iter().enumerate() {
                prop_assert_eq!(&cache.get(&(key as u64)).unwrap(), value);
            }
            Ok(())
        })?;
    }

    /// Repeatedly overwriting the same key must always leave the last write
    /// as the only value visible through `get`, no matter how many stale
    /// frames pile up behind it in the shard's queue.
    #[test]
    fn last_write_wins_under_repeated_overwrite(values in prop::collection::vec(small_value(), 1..100)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache = Cache::new(Config { max_shard_size: 0, ..Config::default() });
            for value in &values {
                cache.put("the-one-key", value).unwrap();
            }
            prop_assert_eq!(&cache.get(&"the-one-key").unwrap(), values.last().unwrap());
            Ok(())
        })?;
    }

    /// A cache is observationally equivalent to a plain hash map for any
    /// interleaving of puts to a small, possibly-repeated key space.
    #[test]
    fn matches_a_reference_hash_map_for_put_get_interleavings(
        ops in prop::collection::vec((0u64..8, small_value()), 1..300)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache = Cache::new(Config { shards_count: 8, ..Config::default() });
            let mut reference: HashMap<u64, Vec<u8>> = HashMap::new();

            for (key, value) in &ops {
                cache.put(*key, value).unwrap();
                reference.insert(*key, value.clone());
            }

            for (key, expected) in &reference {
                prop_assert_eq!(&cache.get(key).unwrap(), expected);
            }
            Ok(())
        })?;
    }
}
