//! Configuration for the memoization engine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::MemoizeResult;

/// Main configuration for a memoizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoizeConfig {
    /// Cache store settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Key derivation settings.
    #[serde(default)]
    pub key: KeyConfig,
}

/// Cache store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enabled. When false, every call computes directly and nothing is stored.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum cache capacity (number of entries). Least recently used
    /// entries are evicted once the capacity is reached.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Entry time to live in seconds. `None` means entries never expire.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl CacheConfig {
    /// Returns the TTL as a [`Duration`], if one is configured.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: default_cache_capacity(),
            ttl_secs: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    1024
}

/// Key derivation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Namespace mixed into every derived key. Two memoizers with different
    /// namespaces never share keys, even for identical arguments.
    #[serde(default)]
    pub namespace: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            namespace: String::new(),
        }
    }
}

impl MemoizeConfig {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> MemoizeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MemoizeConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> MemoizeResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            cache: CacheConfig::default(),
            key: KeyConfig::default(),
        }
    }

    /// Tries to load configuration from current directory or uses default.
    pub fn load_or_default() -> Self {
        Self::load("memoize.toml").unwrap_or_else(|_| Self::default_config())
    }
}

impl Default for MemoizeConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
