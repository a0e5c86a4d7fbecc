//! Read-through cache over a persistent store.
//!
//! Values are JSON-serialized under `{namespace}:{subkey}`. A miss runs the
//! caller's compute future once and writes its result back; a failed
//! compute writes nothing. Concurrent misses for the same key are not
//! coalesced, so compute runs at least once per missing caller and the last
//! successful write wins.

use crate::error::Result;
use crate::store::CacheBackend;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a value returned by [`ReadThroughCache::lookup`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Read from the persistent store.
    Store,
    /// Computed on a miss and written back.
    Computed,
    /// Computed on a miss, but the write-back failed.
    ComputedUnstored,
}

/// A value together with its [`Origin`].
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Lookup<T> {
    /// Whether the value was served from the store.
    pub fn is_hit(&self) -> bool {
        self.origin == Origin::Store
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Read-through cache keyed by `(namespace, subkey)`.
pub struct ReadThroughCache<B: CacheBackend + ?Sized> {
    store: Arc<B>,
}

impl<B: CacheBackend + ?Sized> Clone for ReadThroughCache<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<B: CacheBackend + ?Sized> ReadThroughCache<B> {
    /// Create a cache over an injected store handle.
    pub fn new(store: Arc<B>) -> Self {
        Self { store }
    }

    /// The store handle.
    pub fn store(&self) -> &Arc<B> {
        &self.store
    }

    /// Effective store key for `(namespace, subkey)`.
    pub fn key(namespace: &str, subkey: &str) -> String {
        format!("{}:{}", namespace, subkey)
    }

    /// Return the stored value, or compute, store and return it.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        namespace: &str,
        subkey: &str,
        compute: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.lookup(namespace, subkey, compute)
            .await
            .map(Lookup::into_value)
    }

    /// Like [`get_or_compute`](Self::get_or_compute), reporting where the
    /// value came from.
    ///
    /// A store `get` failure or an unreadable entry is returned as an error
    /// and `compute` is not run. A `set` failure after a successful compute
    /// is logged and the value is still returned, tagged
    /// [`Origin::ComputedUnstored`].
    pub async fn lookup<T, F, Fut>(
        &self,
        namespace: &str,
        subkey: &str,
        compute: F,
    ) -> Result<Lookup<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = Self::key(namespace, subkey);

        if let Some(bytes) = self.store.get(&key)? {
            debug!("Cache hit for {}", key);
            let value = serde_json::from_slice(&bytes)?;
            return Ok(Lookup {
                value,
                origin: Origin::Store,
            });
        }

        debug!("Cache miss for {}", key);
        let value = compute().await?;
        let bytes = serde_json::to_vec(&value)?;

        let origin = match self.store.set(&key, &bytes) {
            Ok(()) => Origin::Computed,
            Err(e) => {
                warn!("Failed to store {}: {}", key, e);
                Origin::ComputedUnstored
            }
        };

        Ok(Lookup { value, origin })
    }

    /// Delete the entry for `(namespace, subkey)`. Absent keys are fine.
    pub fn clear(&self, namespace: &str, subkey: &str) -> Result<()> {
        let key = Self::key(namespace, subkey);
        if self.store.delete(&key)? {
            debug!("Cleared {}", key);
        }
        Ok(())
    }
}
