use super::RefreshType;
use serde::{Deserialize, Serialize};

/// Storage back-end selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Unbounded map, entries live until removed or purged
    #[default]
    Map,
    /// Fixed capacity LRU, optionally expiring idle entries
    Lru,
}

impl CacheBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "map" => Some(Self::Map),
            "lru" => Some(Self::Lru),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Lru => "lru",
        }
    }
}

/// Resolver cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// Maximum entries (lru only, required there)
    #[serde(default)]
    pub size: usize,

    /// Idle lifetime of lru entries in seconds (0 = never expire)
    #[serde(default)]
    pub item_ttl_secs: u64,

    /// Allow the lru back-end to refresh at all
    #[serde(default = "default_true")]
    pub allow_refresh: bool,

    #[serde(default = "default_true")]
    pub refresh_shuffle: bool,

    /// Pause between refresh lookups (linear) or waves (batch)
    #[serde(default = "default_refresh_sleep_ms")]
    pub refresh_sleep_ms: u64,

    #[serde(default)]
    pub refresh_type: RefreshType,

    /// Lookups per wave, required when refresh_type = "batch"
    #[serde(default)]
    pub refresh_batch_size: Option<usize>,

    /// Background refresh period (0 = no background refresh)
    #[serde(default)]
    pub auto_refresh_interval_secs: u64,

    /// Deadline of each background or manual refresh pass (0 = none)
    #[serde(default)]
    pub auto_refresh_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            size: 0,
            item_ttl_secs: 0,
            allow_refresh: true,
            refresh_shuffle: true,
            refresh_sleep_ms: default_refresh_sleep_ms(),
            refresh_type: RefreshType::default(),
            refresh_batch_size: None,
            auto_refresh_interval_secs: 0,
            auto_refresh_timeout_secs: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_refresh_sleep_ms() -> u64 {
    1000
}
