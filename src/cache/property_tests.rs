//! Property-Based Tests for the Cache Store
//!
//! Uses proptest to verify store semantics that the invalidation subsystem
//! depends on: miss signaling, idempotent deletion, key enumeration and the
//! prefix sweep.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::cache::keys::SEARCH_PRODUCTS_PREFIX;
use crate::cache::CacheStore;

// == Strategies ==
/// Generates cache-key-shaped strings.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,40}"
}

/// Generates serialized-value-shaped strings.
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 {}\\[\\]\"]{0,128}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of set/get/delete operations without TTLs, the store
    // agrees with a plain map: get returns exactly what a map would hold.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new();
        let mut model: HashMap<String, String> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone(), None);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key).cloned());
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                    model.remove(&key);
                }
            }
        }

        prop_assert_eq!(store.len(), model.len());
    }

    // Deleting an absent key never disturbs other entries.
    #[test]
    fn prop_absent_delete_is_noop(
        mut present in prop::collection::hash_set(key_strategy(), 1..20),
        absent in key_strategy()
    ) {
        present.remove(&absent);

        let mut store = CacheStore::new();
        for key in &present {
            store.set(key.clone(), "v".to_string(), None);
        }

        store.delete(&absent);

        prop_assert_eq!(store.len(), present.len());
        for key in &present {
            prop_assert!(store.has(key));
        }
    }

    // keys() enumerates exactly the live key set.
    #[test]
    fn prop_keys_snapshot_is_complete(keys in prop::collection::hash_set(key_strategy(), 0..30)) {
        let mut store = CacheStore::new();
        for key in &keys {
            store.set(key.clone(), "v".to_string(), None);
        }

        let snapshot: HashSet<String> = store.keys().into_iter().collect();
        prop_assert_eq!(snapshot, keys);
    }

    // A prefix sweep over keys() removes every search key and nothing else,
    // regardless of content.
    #[test]
    fn prop_prefix_sweep_removes_exactly_matching_keys(
        queries in prop::collection::hash_set("[a-z0-9 ]{1,20}", 0..15),
        others in prop::collection::hash_set("[a-rt-z][a-z0-9-]{0,30}", 0..15)
    ) {
        let mut store = CacheStore::new();
        for query in &queries {
            store.set(format!("{SEARCH_PRODUCTS_PREFIX}{query}"), "[]".to_string(), Some(3600));
        }
        for key in &others {
            store.set(key.clone(), "[]".to_string(), None);
        }

        let swept: Vec<String> = store
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(SEARCH_PRODUCTS_PREFIX))
            .collect();
        store.delete_many(swept);

        let remaining: HashSet<String> = store.keys().into_iter().collect();
        prop_assert!(remaining.iter().all(|k| !k.starts_with(SEARCH_PRODUCTS_PREFIX)));
        prop_assert_eq!(remaining, others);
    }

    // Overwriting a key leaves a single entry holding the last value.
    #[test]
    fn prop_overwrite_keeps_last_value(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut store = CacheStore::new();

        store.set(key.clone(), value1, None);
        store.set(key.clone(), value2.clone(), None);

        prop_assert_eq!(store.len(), 1);
        prop_assert_eq!(store.get(&key), Some(value2));
    }
}
