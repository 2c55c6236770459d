use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for observing cache behavior. Counters accumulate for
/// the lifetime of the manager; `clear` does not reset them.
#[derive(Default)]
pub(crate) struct CacheCounters {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub sets: AtomicU64,
    pub deletes: AtomicU64,
    pub expirations: AtomicU64,
    pub evictions: AtomicU64,
}

impl CacheCounters {
    pub fn snapshot(&self, size: usize) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let accesses = hits + misses;
        CacheStats {
            hits,
            misses,
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            size,
            hit_rate: if accesses == 0 { 0.0 } else { hits as f64 / accesses as f64 },
        }
    }
}

/// Point-in-time view of the counters plus the derived hit rate.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub size: usize,
    /// Hits over total accesses; `0.0` before the first access.
    pub hit_rate: f64,
}
