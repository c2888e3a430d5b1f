//! Cache Store Module
//!
//! Process-wide key-value store backing the catalog read paths. Serialized
//! entities are stored under derived keys (see [`crate::cache::keys`]) with an
//! optional per-entry TTL; expired entries are dropped lazily on access and by
//! the periodic sweep task.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Main cache storage with optional per-entry TTL.
///
/// A single instance is created at startup, wrapped in `Arc<RwLock<_>>` and
/// handed to the query service, the write service and the invalidator.
/// There is no eviction policy: entries live until deleted or expired.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new, empty CacheStore.
    pub fn new() -> Self {
        Self::default()
    }

    // == Has ==
    /// Returns true iff an unexpired entry exists for the key.
    ///
    /// An expired entry found here is removed immediately.
    pub fn has(&mut self, key: &str) -> bool {
        if self.remove_if_expired(key) {
            return false;
        }
        self.entries.contains_key(key)
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` on a miss so that callers never confuse an absent entry
    /// with a stored falsy value. Expired entries are removed and counted as
    /// misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        if self.remove_if_expired(key) {
            self.stats.record_miss();
            return None;
        }

        match self.entries.get(key) {
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL in seconds.
    ///
    /// If the key already exists, the value is overwritten and the TTL is
    /// reset. A `None` TTL means the entry never expires.
    pub fn set(&mut self, key: String, value: String, ttl: Option<u64>) {
        let entry = CacheEntry::new(value, ttl);
        self.entries.insert(key, entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Delete ==
    /// Removes an entry by key. Deleting an absent key is a no-op.
    pub fn delete(&mut self, key: &str) {
        self.entries.remove(key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Delete Many ==
    /// Removes each key in the given sequence. Absent keys are skipped.
    pub fn delete_many<I, K>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            self.entries.remove(key.as_ref());
        }
        self.stats.set_total_entries(self.entries.len());
    }

    // == Keys ==
    /// Returns a snapshot of all currently known keys.
    ///
    /// Used by the invalidator to prefix-scan the search-result key family.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Flush ==
    /// Removes every entry from the cache.
    pub fn flush(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops the entry for `key` if it exists and has expired.
    ///
    /// Returns true when an expired entry was removed.
    fn remove_if_expired(&mut self, key: &str) -> bool {
        let expired = self
            .entries
            .get(key)
            .map(|entry| entry.is_expired())
            .unwrap_or(false);

        if expired {
            self.entries.remove(key);
            self.stats.record_expiration();
            self.stats.set_total_entries(self.entries.len());
        }
        expired
    }
}
