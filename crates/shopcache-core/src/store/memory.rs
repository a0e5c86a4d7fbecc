//! In-process store backed by mini-moka.

use super::traits::{CacheBackend, CacheConfig};
use crate::config::StoreConfig;
use crate::error::Result;
use mini_moka::sync::Cache;

/// In-process store.
///
/// Shared by every cache handle holding the same `Arc`, but gone with the
/// process.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Cache<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create a store without expiry.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a store with a custom expiry policy.
    pub fn with_config(config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(StoreConfig::MEMORY_MAX_CAPACITY);
        if let Some(ttl) = config.effective_ttl() {
            builder = builder.time_to_live(ttl);
        }
        Self {
            entries: builder.build(),
        }
    }

    /// Check whether a live entry exists for a key.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_string())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(&key.to_string()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let key = key.to_string();
        let existed = self.entries.contains_key(&key);
        self.entries.invalidate(&key);
        Ok(existed)
    }
}
