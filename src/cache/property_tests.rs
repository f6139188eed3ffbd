//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the LRU store and the multi-level cache against
//! arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, LruCache, MemoryCache, MultiLevelCache};
use crate::context::Context;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,32}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

/// Reference LRU model: front = most recently used.
#[derive(Default)]
struct Model {
    order: Vec<(String, String)>,
}

impl Model {
    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|(k, _)| k == key)
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let idx = self.position(key)?;
        let item = self.order.remove(idx);
        let value = item.1.clone();
        self.order.insert(0, item);
        Some(value)
    }

    fn set(&mut self, key: String, value: String, capacity: usize) {
        if let Some(idx) = self.position(&key) {
            self.order.remove(idx);
        }
        self.order.insert(0, (key, value));
        self.order.truncate(capacity);
    }

    fn delete(&mut self, key: &str) {
        if let Some(idx) = self.position(key) {
            self.order.remove(idx);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any operation sequence the store agrees with a reference LRU model,
    // never exceeds its capacity, and keeps index and list consistent.
    #[test]
    fn prop_store_matches_lru_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let store = LruCache::new(capacity).unwrap();
        let mut model = Model::default();
        let ctx = Context::background();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(&ctx, &key, value.clone(), TEST_TTL).unwrap();
                    model.set(key, value, capacity);
                }
                CacheOp::Get { key } => {
                    let got = store.get(&ctx, &key).unwrap();
                    prop_assert_eq!(got, model.get(&key));
                }
                CacheOp::Delete { key } => {
                    store.delete(&ctx, &key).unwrap();
                    model.delete(&key);
                }
            }

            prop_assert!(store.len() <= capacity);
            store.assert_invariants();
            let expected: Vec<String> = model.order.iter().map(|(k, _)| k.clone()).collect();
            prop_assert_eq!(store.keys_by_recency(), expected);
        }
    }

    // Inserting distinct keys never lets the size pass the capacity.
    #[test]
    fn prop_capacity_enforcement(
        keys in prop::collection::hash_set("[a-z0-9]{1,12}", 1..200),
        capacity in 1usize..50
    ) {
        let store = LruCache::new(capacity).unwrap();
        let ctx = Context::background();

        for (i, key) in keys.iter().enumerate() {
            store.set(&ctx, key, i, TEST_TTL).unwrap();
            prop_assert!(
                store.len() <= capacity,
                "Cache size {} exceeds max {}",
                store.len(),
                capacity
            );
            prop_assert_eq!(store.len(), (i + 1).min(capacity));
        }
    }

    // A cancelled context never changes what the store holds.
    #[test]
    fn prop_cancelled_ops_leave_state_unchanged(
        seed in prop::collection::vec((key_strategy(), value_strategy()), 0..10),
        ops in prop::collection::vec(cache_op_strategy(), 1..20)
    ) {
        let store = LruCache::new(4).unwrap();
        let ctx = Context::background();
        for (key, value) in seed {
            store.set(&ctx, &key, value, TEST_TTL).unwrap();
        }
        let before = store.keys_by_recency();

        let cancelled = Context::background();
        cancelled.cancel();
        for op in ops {
            let result = match op {
                CacheOp::Set { key, value } => store.set(&cancelled, &key, value, TEST_TTL),
                CacheOp::Get { key } => store.get(&cancelled, &key).map(|_| ()),
                CacheOp::Delete { key } => store.delete(&cancelled, &key),
            };
            prop_assert!(result.is_err());
        }

        prop_assert_eq!(store.keys_by_recency(), before);
    }

    // After a fan-out write every level holds the key; after a fan-out
    // delete none does.
    #[test]
    fn prop_multi_level_fan_out(
        keys in prop::collection::vec(key_strategy(), 1..20),
        value in value_strategy()
    ) {
        let l1: Arc<LruCache<String>> = Arc::new(LruCache::new(64).unwrap());
        let l2: Arc<MemoryCache<String>> = Arc::new(MemoryCache::new());
        let cache = MultiLevelCache::new(vec![
            l1.clone() as Arc<dyn Cache<String>>,
            l2.clone() as Arc<dyn Cache<String>>,
        ]);
        let ctx = Context::background();

        let unique: HashSet<String> = keys.into_iter().collect();
        for key in &unique {
            cache.set(&ctx, key, value.clone(), TEST_TTL).unwrap();
        }
        for key in &unique {
            prop_assert_eq!(l1.get(&ctx, key).unwrap(), Some(value.clone()));
            prop_assert_eq!(l2.get(&ctx, key).unwrap(), Some(value.clone()));
        }

        for key in &unique {
            cache.delete(&ctx, key).unwrap();
        }
        for key in &unique {
            prop_assert_eq!(l1.get(&ctx, key).unwrap(), None);
            prop_assert_eq!(l2.get(&ctx, key).unwrap(), None);
        }
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // An entry stored with a TTL is not returned once the TTL has elapsed.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in key_strategy(),
        value in value_strategy()
    ) {
        let store = LruCache::new(8).unwrap();
        let ctx = Context::background();

        store.set(&ctx, &key, value.clone(), Duration::from_millis(50)).unwrap();
        prop_assert_eq!(store.get(&ctx, &key).unwrap(), Some(value));

        std::thread::sleep(Duration::from_millis(80));

        prop_assert_eq!(store.get(&ctx, &key).unwrap(), None);
        prop_assert!(store.is_empty());
    }
}
