pub mod cache;
pub mod errors;
pub mod logger;
pub mod memo;
pub mod storage;
pub mod tasks;

pub use crate::cache::{CacheConfig, CacheEntry, CacheManager, CacheStats, SetOptions};
pub use crate::errors::CacheError;
pub use crate::memo::{Memoized, memo_key};
pub use crate::storage::{FileStorage, SessionStorage, StorageArea, StorageCache};
pub use crate::tasks::RepeatingTask;

/// Initializes the logging system.
///
/// Call once before other operations when file logging is wanted; every
/// cache operation works without it.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    logger::init()?;
    Ok(())
}
