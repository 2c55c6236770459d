mod config;
mod entry;
mod policy;
mod stats;
mod core;

pub use config::{CacheConfig, DEFAULT_MAX_ENTRIES, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
pub use core::CacheManager;
pub use entry::{CacheEntry, SetOptions};
pub use stats::CacheStats;
