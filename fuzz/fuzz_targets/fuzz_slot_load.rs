#![no_main]
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;
use stashlite::cache::{CacheConfig, CacheManager};
use stashlite::errors::CacheError;
use stashlite::storage::{StorageArea, StorageCache};

// In-memory area so the fuzzer only exercises the parse/import path.
struct FixedArea(String);

impl StorageArea for FixedArea {
    fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(Some(self.0.clone()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(s) = std::str::from_utf8(data) {
        // Arbitrary slot contents must never panic the loader.
        let persist = StorageCache::new(Arc::new(FixedArea(s.to_string())));
        let cache: CacheManager<u32> = CacheManager::new(CacheConfig {
            max_entries: 16,
            background_sweep: false,
            ..Default::default()
        });
        persist.load(&cache);
        assert!(cache.len() <= 16);
    }
});
