#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stashlite::cache::{CacheConfig, CacheManager, SetOptions};

#[derive(Arbitrary, Debug)]
enum Op {
    Set { key: u8, value: u32, ttl_ms: u16, tag: bool },
    Get { key: u8 },
    Contains { key: u8 },
    Delete { key: u8 },
    ClearTag,
    Cleanup,
    Clear,
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 256 { return; }
    let cache: CacheManager<u32> = CacheManager::new(CacheConfig {
        max_entries: 8,
        background_sweep: false,
        ..Default::default()
    });
    for op in ops {
        match op {
            Op::Set { key, value, ttl_ms, tag } => {
                let options = SetOptions {
                    ttl: Some(std::time::Duration::from_millis(u64::from(ttl_ms))),
                    tags: if tag { vec!["t".to_string()] } else { Vec::new() },
                    serialize: false,
                };
                cache.set(&format!("k{key}"), value, &options);
            }
            Op::Get { key } => {
                let _ = cache.get(&format!("k{key}"));
            }
            Op::Contains { key } => {
                let _ = cache.contains(&format!("k{key}"));
            }
            Op::Delete { key } => {
                let _ = cache.delete(&format!("k{key}"));
            }
            Op::ClearTag => {
                let _ = cache.clear_by_tags(&["t"]);
            }
            Op::Cleanup => {
                let _ = cache.cleanup();
            }
            Op::Clear => cache.clear(),
        }
        // The capacity bound must hold after every operation.
        assert!(cache.len() <= 8);
    }
});
