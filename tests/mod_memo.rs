use stashlite::cache::{CacheConfig, CacheManager, SetOptions};
use stashlite::memo::memo_key;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;

fn quiet(max_entries: usize) -> CacheConfig {
    CacheConfig { max_entries, background_sweep: false, ..Default::default() }
}

#[tokio::test]
async fn identical_arguments_compute_once() {
    let cache: CacheManager<u64> = CacheManager::new(quiet(16));
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let memo = cache.memoize("double", move |n: u64| {
        let seen = seen.clone();
        async move {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok::<u64, Infallible>(n * 2)
        }
    });

    assert_eq!(memo.call(21).await, Ok(42));
    assert_eq!(memo.call(21).await, Ok(42));
    assert_eq!(calls.load(Ordering::SeqCst), 1, "second call should come from the cache");

    assert_eq!(memo.call(5).await, Ok(10));
    assert_eq!(calls.load(Ordering::SeqCst), 2, "different arguments compute again");
}

#[tokio::test]
async fn errors_are_returned_and_never_cached() {
    let cache: CacheManager<u32> = CacheManager::new(quiet(16));
    let attempts = Arc::new(AtomicUsize::new(0));
    let seen = attempts.clone();
    let memo = cache.memoize("flaky", move |n: u32| {
        let seen = seen.clone();
        async move {
            if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("boom".to_string())
            } else {
                Ok(n * 10)
            }
        }
    });

    assert_eq!(memo.call(3).await, Err("boom".to_string()));
    assert_eq!(cache.len(), 0, "a failed call must not leave an entry behind");

    assert_eq!(memo.call(3).await, Ok(30), "the retry runs the function again");
    assert_eq!(memo.call(3).await, Ok(30));
    assert_eq!(attempts.load(Ordering::SeqCst), 2, "the success is cached");
}

#[tokio::test]
async fn api_wrapper_prefixes_keys_and_tags_entries() {
    let cache: CacheManager<String> = CacheManager::new(quiet(16));
    let api = cache.wrap_api_call(
        "fetch_user",
        |id: &u32| format!("user/{id}"),
        SetOptions::default(),
        |id: u32| async move { Ok::<String, Infallible>(format!("user-{id}")) },
    );

    assert_eq!(api.call(7).await, Ok("user-7".to_string()));
    assert!(cache.contains("api:user/7"), "keys carry the api prefix");
    assert_eq!(cache.clear_by_tags(&["api"]), 1, "entries carry the api tag");
}

#[tokio::test]
async fn api_wrapper_keeps_caller_tags_when_given() {
    let cache: CacheManager<String> = CacheManager::new(quiet(16));
    let opts = SetOptions { tags: vec!["inventory".to_string()], ..Default::default() };
    let api = cache.wrap_api_call(
        "fetch_room",
        |id: &u32| format!("room/{id}"),
        opts,
        |id: u32| async move { Ok::<String, Infallible>(format!("room-{id}")) },
    );

    assert_eq!(api.call(1).await, Ok("room-1".to_string()));
    assert_eq!(cache.clear_by_tags(&["api"]), 0, "default tag must not override the caller's");
    assert_eq!(cache.clear_by_tags(&["inventory"]), 1);
}

#[tokio::test]
async fn explicit_key_function_controls_the_cache_key() {
    let cache: CacheManager<u32> = CacheManager::new(quiet(16));
    let memo = cache.memoize_with(
        "pinned",
        |_args: &u32| "pinned".to_string(),
        SetOptions::default(),
        |n: u32| async move { Ok::<u32, Infallible>(n) },
    );

    assert_eq!(memo.call(1).await, Ok(1));
    assert_eq!(memo.call(2).await, Ok(1), "both arguments share the pinned key");
    assert!(cache.contains("pinned"));
}

#[tokio::test]
async fn memoized_entries_honor_ttl_options() {
    let cache: CacheManager<u32> = CacheManager::new(quiet(16));
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let opts = SetOptions { ttl: Some(Duration::from_millis(30)), ..Default::default() };
    let memo = cache.memoize_with(
        "short_lived",
        |n: &u32| format!("short:{n}"),
        opts,
        move |n: u32| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, Infallible>(n)
            }
        },
    );

    assert_eq!(memo.call(1).await, Ok(1));
    assert_eq!(memo.call(1).await, Ok(1));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    sleep(Duration::from_millis(50)).await;

    assert_eq!(memo.call(1).await, Ok(1));
    assert_eq!(calls.load(Ordering::SeqCst), 2, "an expired entry is computed again");
}

#[test]
fn memo_key_is_stable_per_name_and_arguments() {
    let a = memo_key("lookup", &(1u32, "x"));
    let b = memo_key("lookup", &(1u32, "x"));
    let c = memo_key("lookup", &(2u32, "x"));

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.starts_with("lookup:"));
}

#[test]
fn memo_key_degrades_when_arguments_cannot_serialize() {
    // Tuple map keys have no JSON form, so serialization fails.
    let first = HashMap::from([((1u32, 2u32), 3u32)]);
    let second = HashMap::from([((8u32, 8u32), 8u32)]);

    assert_eq!(memo_key("lookup", &first), "lookup:unhashed");
    assert_eq!(
        memo_key("lookup", &first),
        memo_key("lookup", &second),
        "every unserializable argument shares the one degraded key"
    );
}

#[tokio::test]
async fn unserializable_arguments_share_one_cached_result() {
    let cache: CacheManager<u32> = CacheManager::new(quiet(16));
    let memo = cache.memoize("sum_values", |m: HashMap<(u32, u32), u32>| async move {
        Ok::<u32, Infallible>(m.values().sum())
    });

    assert_eq!(memo.call(HashMap::from([((1, 2), 10)])).await, Ok(10));
    // Different arguments, same degraded key: the first result wins. Callers
    // who need per-argument results here must pass an explicit key function.
    assert_eq!(memo.call(HashMap::from([((3, 4), 99)])).await, Ok(10));
    assert!(cache.contains("sum_values:unhashed"));
    assert_eq!(cache.len(), 1);
}
