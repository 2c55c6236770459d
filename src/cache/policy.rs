use crate::cache::entry::CacheEntry;
use crate::cache::stats::CacheCounters;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::Ordering;

pub(crate) type Store<T> = HashMap<String, CacheEntry<T>>;

/// Removes expired entries from the store. Returns number removed.
pub(crate) fn purge_expired<T>(store: &RwLock<Store<T>>, counters: &CacheCounters) -> usize {
    let mut map = store.write();
    let expired_keys: Vec<String> =
        map.values().filter(|e| e.is_expired()).map(|e| e.key.clone()).collect();

    let count = expired_keys.len();
    for key in &expired_keys {
        map.remove(key);
    }
    if count > 0 {
        counters.expirations.fetch_add(count as u64, Ordering::Relaxed);
        log::debug!("ttl sweep removed {count} expired entries");
    }
    count
}

/// Evicts the entry with the oldest insertion timestamp. Returns the evicted
/// key, if any. Ties go to the first minimum found. The scan is linear; the
/// capacity bound keeps stores small.
pub(crate) fn evict_oldest<T>(map: &mut Store<T>, counters: &CacheCounters) -> Option<String> {
    let victim = map.values().min_by_key(|e| e.timestamp).map(|e| e.key.clone())?;
    map.remove(&victim);
    counters.evictions.fetch_add(1, Ordering::Relaxed);
    log::debug!("capacity bound evicted oldest entry {victim}");
    Some(victim)
}
