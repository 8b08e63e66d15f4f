//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis configuration, used for the refresh-token blacklist
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Use Redis; when false the blacklist lives in process memory
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Redis connection URL
    pub url: String,

    /// Prefix prepended to every key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: String::from("redis://localhost:6379"),
            key_prefix: default_key_prefix(),
        }
    }
}

impl CacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_key_prefix() -> String {
    String::from("sefr")
}
