use crate::cache::config::CacheConfig;
use crate::cache::entry::{CacheEntry, SetOptions};
use crate::cache::policy::{self, Store};
use crate::cache::stats::{CacheCounters, CacheStats};
use crate::tasks::RepeatingTask;
use parking_lot::{Mutex, RwLock};
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;

/// A thread-safe, in-memory cache with per-entry TTL expiry and an
/// oldest-insertion eviction bound.
///
/// Cloning is cheap; clones share one store. Eviction never promotes on
/// read: once the store is full, the entry with the oldest insertion
/// timestamp goes, however recently it was read.
#[derive(Clone)]
pub struct CacheManager<T> {
    store: Arc<RwLock<Store<T>>>,
    counters: Arc<CacheCounters>,
    config: CacheConfig,
    sweeper: Arc<Mutex<Option<RepeatingTask>>>,
}

impl<T> CacheManager<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Creates a cache bounded to `max_entries`, with defaults elsewhere.
    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        Self::new(CacheConfig { max_entries, ..Default::default() })
    }

    /// Creates a cache with the provided configuration and, unless disabled,
    /// starts the background expiry sweep.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let config = CacheConfig { max_entries: config.max_entries.max(1), ..config };
        let manager = Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            counters: Arc::new(CacheCounters::default()),
            sweeper: Arc::new(Mutex::new(None)),
            config,
        };

        if manager.config.background_sweep {
            // The sweep holds only weak references, so dropping the last
            // manager handle lets the thread wind down on its next tick.
            let store = Arc::downgrade(&manager.store);
            let counters = Arc::downgrade(&manager.counters);
            let task =
                RepeatingTask::spawn("stashlite-sweep", manager.config.sweep_interval, move || {
                    match (store.upgrade(), counters.upgrade()) {
                        (Some(store), Some(counters)) => {
                            policy::purge_expired(&store, &counters);
                            true
                        }
                        _ => false,
                    }
                });
            *manager.sweeper.lock() = Some(task);
        }

        manager
    }

    /// Retrieves a live value. An expired entry is removed on access and
    /// counts as a miss.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut map = self.store.write();
        if let Some(entry) = map.get(key) {
            if entry.is_expired() {
                // Lazy expiry on access
                map.remove(key);
                self.counters.expirations.fetch_add(1, Ordering::Relaxed);
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                None
            } else {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.data.clone())
            }
        } else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Stores a value under `key`, evicting the oldest insertion first when
    /// the store is full. With `options.serialize`, a value that fails its
    /// JSON round-trip abandons the whole set: nothing is evicted and the
    /// set is not counted.
    pub fn set(&self, key: &str, data: T, options: &SetOptions) {
        let data = if options.serialize {
            match serde_json::to_value(&data).and_then(serde_json::from_value::<T>) {
                Ok(copy) => copy,
                Err(e) => {
                    log::warn!("cache set for {key} abandoned, serialization failed: {e}");
                    return;
                }
            }
        } else {
            data
        };

        let ttl = options.ttl.unwrap_or(self.config.default_ttl);
        let entry = CacheEntry::new(key, data, ttl, options.tags.clone());
        let mut map = self.store.write();
        if map.len() >= self.config.max_entries {
            policy::evict_oldest(&mut map, &self.counters);
        }
        map.insert(entry.key.clone(), entry);
        self.counters.sets.fetch_add(1, Ordering::Relaxed);
    }

    /// Whether a live entry exists under `key`. Removes an expired entry the
    /// same way `get` does, but touches neither the hit nor the miss count.
    pub fn contains(&self, key: &str) -> bool {
        let mut map = self.store.write();
        if let Some(entry) = map.get(key) {
            if entry.is_expired() {
                map.remove(key);
                self.counters.expirations.fetch_add(1, Ordering::Relaxed);
                false
            } else {
                true
            }
        } else {
            false
        }
    }

    /// Removes the entry under `key`. Returns whether one was there; only a
    /// real removal is counted.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.store.write().remove(key).is_some();
        if removed {
            self.counters.deletes.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    /// Drops every entry. The running counters are left untouched; stats
    /// deliberately span clears.
    pub fn clear(&self) {
        self.store.write().clear();
    }

    /// Removes every entry carrying at least one of `tags`. Returns the
    /// number removed.
    pub fn clear_by_tags(&self, tags: &[&str]) -> usize {
        let mut map = self.store.write();
        // Collect keys first; entries can't be removed while iterating.
        let doomed: Vec<String> =
            map.values().filter(|e| e.has_any_tag(tags)).map(|e| e.key.clone()).collect();
        for key in &doomed {
            map.remove(key);
        }
        doomed.len()
    }

    /// Removes every entry whose key matches `pattern`. Returns the number
    /// removed.
    pub fn invalidate_pattern(&self, pattern: &Regex) -> usize {
        let mut map = self.store.write();
        let before = map.len();
        map.retain(|key, _| !pattern.is_match(key));
        before - map.len()
    }

    /// Removes every expired entry now, without waiting for the background
    /// sweep. Returns the number removed.
    pub fn cleanup(&self) -> usize {
        policy::purge_expired(&self.store, &self.counters)
    }

    /// Snapshot of the counters plus the current size and hit rate.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.store.read().len())
    }

    /// Every stored key, expired ones included, in no particular order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.store.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Bulk `set`, one entry at a time, in order.
    pub fn preload(&self, entries: Vec<(String, T, SetOptions)>) {
        for (key, data, options) in entries {
            self.set(&key, data, &options);
        }
    }

    /// Clones out every stored entry, expired ones included; `import`
    /// re-checks expiry on the way back in.
    #[must_use]
    pub fn export(&self) -> Vec<CacheEntry<T>> {
        self.store.read().values().cloned().collect()
    }

    /// Replaces the store with `entries`, dropping any already expired by
    /// their own timestamp and TTL. Surviving timestamps and tags are kept
    /// as they were, so eviction order carries over. The capacity bound
    /// still applies; the sets counter does not move.
    pub fn import(&self, entries: Vec<CacheEntry<T>>) {
        let mut map = self.store.write();
        map.clear();
        for entry in entries {
            if entry.is_expired() {
                continue;
            }
            if map.len() >= self.config.max_entries {
                policy::evict_oldest(&mut map, &self.counters);
            }
            map.insert(entry.key.clone(), entry);
        }
    }

    /// Cancels the background sweep and drops every entry. Safe to call more
    /// than once; a second call has nothing left to cancel.
    pub fn destroy(&self) {
        if let Some(task) = self.sweeper.lock().take() {
            task.cancel();
        }
        self.store.write().clear();
    }
}
