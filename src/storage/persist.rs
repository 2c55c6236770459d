use crate::cache::{CacheEntry, CacheManager};
use crate::storage::area::StorageArea;
use crate::tasks::RepeatingTask;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Default slot the adapter persists under.
pub const DEFAULT_SLOT: &str = "stashlite.cache";

/// Persists a manager's exported entries into one slot of a storage area
/// and restores them on load.
///
/// Every failure path is logged and swallowed: persistence is an
/// optimization, and a broken area degrades the cache to memory-only.
/// Writers to the same slot are not synchronized; the last write wins.
#[derive(Clone)]
pub struct StorageCache {
    area: Arc<dyn StorageArea>,
    slot: String,
}

impl StorageCache {
    #[must_use]
    pub fn new(area: Arc<dyn StorageArea>) -> Self {
        Self::with_slot(area, DEFAULT_SLOT)
    }

    #[must_use]
    pub fn with_slot(area: Arc<dyn StorageArea>, slot: impl Into<String>) -> Self {
        Self { area, slot: slot.into() }
    }

    /// Serializes the manager's entries, expired ones included, into the
    /// slot.
    pub fn save<T>(&self, manager: &CacheManager<T>)
    where
        T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let entries = manager.export();
        match serde_json::to_string(&entries) {
            Ok(json) => {
                if let Err(e) = self.area.set(&self.slot, &json) {
                    log::error!("cache save to {} failed: {e}", self.slot);
                }
            }
            Err(e) => log::error!("cache save to {} failed to serialize: {e}", self.slot),
        }
    }

    /// Restores entries from the slot into the manager, replacing its
    /// contents. A missing slot means nothing to load; a corrupt slot is
    /// discarded.
    pub fn load<T>(&self, manager: &CacheManager<T>)
    where
        T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let raw = match self.area.get(&self.slot) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("no persisted cache at {}", self.slot);
                return;
            }
            Err(e) => {
                log::error!("cache load from {} failed: {e}", self.slot);
                return;
            }
        };
        match serde_json::from_str::<Vec<CacheEntry<T>>>(&raw) {
            Ok(entries) => manager.import(entries),
            Err(e) => log::warn!("discarding corrupt cache at {}: {e}", self.slot),
        }
    }

    /// Removes the slot.
    pub fn clear(&self) {
        if let Err(e) = self.area.remove(&self.slot) {
            log::error!("cache clear of {} failed: {e}", self.slot);
        }
    }

    /// Spawns a periodic save of `manager` into the slot. The returned task
    /// saves until cancelled or dropped; the manager stays alive as long as
    /// the task does.
    pub fn autosave<T>(&self, manager: &CacheManager<T>, interval: Duration) -> RepeatingTask
    where
        T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let this = self.clone();
        let manager = manager.clone();
        RepeatingTask::spawn("stashlite-autosave", interval, move || {
            this.save(&manager);
            true
        })
    }
}
