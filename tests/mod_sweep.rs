use stashlite::cache::{CacheConfig, CacheManager, SetOptions};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn cleanup_removes_only_expired_entries() {
    let cfg = CacheConfig { max_entries: 10, background_sweep: false, ..Default::default() };
    let cache: CacheManager<u32> = CacheManager::new(cfg);
    let short = SetOptions { ttl: Some(Duration::from_millis(20)), ..Default::default() };
    cache.set("x", 1, &short);
    cache.set("y", 2, &short);
    cache.set("z", 3, &short);
    cache.set("keeper", 4, &SetOptions::default());

    sleep(Duration::from_millis(40)).await;

    assert_eq!(cache.cleanup(), 3);
    assert_eq!(cache.len(), 1);
    assert!(cache.contains("keeper"));
    assert_eq!(cache.cleanup(), 0, "a second pass finds nothing");
}

#[tokio::test]
async fn background_sweep_purges_without_access() {
    let cfg = CacheConfig {
        max_entries: 10,
        sweep_interval: Duration::from_millis(40),
        background_sweep: true,
        ..Default::default()
    };
    let cache: CacheManager<u32> = CacheManager::new(cfg);
    let short = SetOptions { ttl: Some(Duration::from_millis(20)), ..Default::default() };
    cache.set("x", 1, &short);

    // No get/contains here: only the sweeper can remove the entry.
    sleep(Duration::from_millis(120)).await;

    assert_eq!(cache.len(), 0, "the sweeper should have purged the expired entry");
    assert_eq!(cache.stats().expirations, 1);
}

#[tokio::test]
async fn disabled_sweep_leaves_expired_entries_in_place() {
    let cfg = CacheConfig {
        max_entries: 10,
        sweep_interval: Duration::from_millis(20),
        background_sweep: false,
        ..Default::default()
    };
    let cache: CacheManager<u32> = CacheManager::new(cfg);
    cache.set("x", 1, &SetOptions { ttl: Some(Duration::from_millis(10)), ..Default::default() });

    sleep(Duration::from_millis(80)).await;

    assert_eq!(cache.len(), 1, "nothing purges until an access or explicit cleanup");
    assert_eq!(cache.get("x"), None);
    assert_eq!(cache.len(), 0);
}

#[tokio::test]
async fn destroy_clears_and_stops_the_sweeper() {
    let cfg = CacheConfig {
        max_entries: 10,
        sweep_interval: Duration::from_millis(20),
        background_sweep: true,
        ..Default::default()
    };
    let cache: CacheManager<u32> = CacheManager::new(cfg);
    cache.set("a", 1, &SetOptions::default());

    cache.destroy();

    assert!(cache.is_empty());
    // Idempotent: the second call has no sweeper left to cancel.
    cache.destroy();
    assert!(cache.is_empty());
}

#[tokio::test]
async fn destroyed_cache_still_serves_basic_operations() {
    let cache: CacheManager<u32> = CacheManager::with_capacity(10);
    cache.destroy();

    cache.set("late", 1, &SetOptions::default());
    assert_eq!(cache.get("late"), Some(1), "the store itself outlives destroy");
}
