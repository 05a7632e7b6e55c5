//! Property-Based Tests for Cache Module
//!
//! Checks the LRU cache against a plain vector model under random
//! sequences of `add` and `get`.

use proptest::prelude::*;
use std::sync::{Arc, Mutex};

use crate::cache::{LruCache, Value};

// == Strategies ==
/// Small key space so sequences revisit keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,8}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Add { key: String, value: String },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Add { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

// == Reference Model ==
/// Entries ordered most recently used first, with their accounted size.
#[derive(Debug, Default)]
struct Model {
    entries: Vec<(String, String)>,
    evicted: Vec<(String, String)>,
}

impl Model {
    fn used(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len_bytes())
            .sum()
    }

    fn touch(&mut self, key: &str) -> Option<(String, String)> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos))
    }

    fn add(&mut self, key: String, value: String, max_bytes: usize) {
        self.touch(&key);
        self.entries.insert(0, (key, value));
        while max_bytes != 0 && self.used() > max_bytes {
            if let Some(oldest) = self.entries.pop() {
                self.evicted.push(oldest);
            }
        }
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let entry = self.touch(key)?;
        let value = entry.1.clone();
        self.entries.insert(0, entry);
        Some(value)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // The byte budget holds after every operation, and the live keys are
    // exactly the most recently touched keys that fit the budget.
    #[test]
    fn prop_matches_recency_model(
        max_bytes in 0usize..40,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = evicted.clone();
        let mut cache = LruCache::with_eviction_callback(max_bytes, move |key, value: String| {
            sink.lock().unwrap().push((key, value));
        });
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Add { key, value } => {
                    cache.add(key.clone(), value.clone());
                    model.add(key, value, max_bytes);
                }
                CacheOp::Get { key } => {
                    let got = cache.get(&key).cloned();
                    prop_assert_eq!(got, model.get(&key));
                }
            }

            if max_bytes > 0 {
                prop_assert!(cache.used_bytes() <= max_bytes);
            }
            prop_assert_eq!(cache.used_bytes(), model.used());
            prop_assert_eq!(cache.len(), model.entries.len());

            let keys: Vec<&str> = cache.keys().collect();
            let expected: Vec<&str> = model.entries.iter().map(|(k, _)| k.as_str()).collect();
            prop_assert_eq!(keys, expected);
        }

        // One callback per evicted entry, with the exact pair removed
        let evicted = evicted.lock().unwrap().clone();
        prop_assert_eq!(evicted, model.evicted);
    }

    // Updating an existing key never reports an eviction while it fits.
    #[test]
    fn prop_update_never_evicts_when_unbounded(
        key in key_strategy(),
        values in prop::collection::vec(value_strategy(), 1..20)
    ) {
        let calls = Arc::new(Mutex::new(0usize));
        let counter = calls.clone();
        let mut cache = LruCache::with_eviction_callback(0, move |_, _: String| {
            *counter.lock().unwrap() += 1;
        });

        for value in &values {
            cache.add(key.clone(), value.clone());
        }

        let last = values.last().cloned();
        prop_assert_eq!(cache.len(), 1);
        prop_assert_eq!(cache.get(&key).cloned(), last.clone());
        prop_assert_eq!(cache.used_bytes(), key.len() + last.map(|v| v.len()).unwrap_or(0));
        prop_assert_eq!(*calls.lock().unwrap(), 0);
    }
}
