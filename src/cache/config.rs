use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MAX_ENTRIES: usize = 500;
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Configuration for a cache manager. Fixed at construction.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub default_ttl: Duration,
    pub sweep_interval: Duration,
    pub background_sweep: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            background_sweep: true,
        }
    }
}

/// On-disk shape: durations in milliseconds, every field optional.
#[derive(Debug, Default, Deserialize)]
struct CacheConfigFile {
    max_entries: Option<usize>,
    default_ttl_ms: Option<u64>,
    sweep_interval_ms: Option<u64>,
    background_sweep: Option<bool>,
}

impl CacheConfig {
    /// Parses a TOML fragment over the defaults. An unparseable fragment is
    /// logged and ignored, never fatal.
    #[must_use]
    pub fn from_toml_str(s: &str) -> Self {
        let mut cfg = Self::default();
        match toml::from_str::<CacheConfigFile>(s) {
            Ok(file) => cfg.apply(&file),
            Err(e) => log::warn!("ignoring unparseable cache config: {e}"),
        }
        cfg
    }

    /// Reads a TOML config file over the defaults. A missing or unparseable
    /// file leaves the defaults in place.
    #[must_use]
    pub fn from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => Self::from_toml_str(&s),
            Err(_) => Self::default(),
        }
    }

    /// Overlays environment variables where present and valid:
    /// - `STASHLITE_MAX_ENTRIES`
    /// - `STASHLITE_DEFAULT_TTL_MS`
    /// - `STASHLITE_SWEEP_INTERVAL_MS`
    /// - `STASHLITE_BACKGROUND_SWEEP` (1/true/yes enables)
    pub fn overlay_env(&mut self) {
        self.overlay_vars(|key| std::env::var(key).ok());
    }

    fn overlay_vars<F: Fn(&str) -> Option<String>>(&mut self, var: F) {
        if let Some(n) = var("STASHLITE_MAX_ENTRIES").and_then(|s| s.parse::<usize>().ok()) {
            self.max_entries = n;
        }
        if let Some(ms) = var("STASHLITE_DEFAULT_TTL_MS").and_then(|s| s.parse::<u64>().ok()) {
            self.default_ttl = Duration::from_millis(ms);
        }
        if let Some(ms) = var("STASHLITE_SWEEP_INTERVAL_MS").and_then(|s| s.parse::<u64>().ok()) {
            self.sweep_interval = Duration::from_millis(ms);
        }
        if let Some(v) = var("STASHLITE_BACKGROUND_SWEEP") {
            self.background_sweep = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    fn apply(&mut self, file: &CacheConfigFile) {
        if let Some(n) = file.max_entries {
            self.max_entries = n;
        }
        if let Some(ms) = file.default_ttl_ms {
            self.default_ttl = Duration::from_millis(ms);
        }
        if let Some(ms) = file.sweep_interval_ms {
            self.sweep_interval = Duration::from_millis(ms);
        }
        if let Some(b) = file.background_sweep {
            self.background_sweep = b;
        }
    }
}
