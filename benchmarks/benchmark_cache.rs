use stashlite::cache::{CacheConfig, CacheManager, SetOptions};
use std::time::Instant;

const N: u64 = 100_000;

fn main() {
    let cache: CacheManager<u64> = CacheManager::new(CacheConfig {
        max_entries: N as usize,
        background_sweep: false,
        ..Default::default()
    });
    let opts = SetOptions::default();

    let start = Instant::now();
    for i in 0..N {
        cache.set(&format!("key:{i}"), i, &opts);
    }
    let set_elapsed = start.elapsed();
    println!(
        "set: {N} ops in {set_elapsed:?} ({:.0} ops/s)",
        N as f64 / set_elapsed.as_secs_f64()
    );

    let start = Instant::now();
    let mut hits = 0u64;
    for i in 0..N {
        if cache.get(&format!("key:{i}")).is_some() {
            hits += 1;
        }
    }
    let get_elapsed = start.elapsed();
    println!(
        "get: {N} ops in {get_elapsed:?} ({:.0} ops/s, {hits} hits)",
        N as f64 / get_elapsed.as_secs_f64()
    );

    let start = Instant::now();
    let removed = cache.cleanup();
    println!("cleanup: scanned {N} entries in {:?} ({removed} expired)", start.elapsed());

    let stats = cache.stats();
    println!(
        "stats: hits={} misses={} sets={} size={} hit_rate={:.3}",
        stats.hits, stats.misses, stats.sets, stats.size, stats.hit_rate
    );
}
