//! Persistent store trait and types.

use crate::config::StoreConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Store-side expiry policy.
///
/// The read-through layer never looks at expiry; an expired entry simply
/// reads back as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live applied to every write. `None` keeps entries until
    /// they are deleted.
    pub default_ttl: Option<Duration>,
}

impl CacheConfig {
    /// Config that expires entries `ttl` after they were written.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            default_ttl: Some(ttl),
        }
    }

    /// The TTL a store should apply. TTLs past [`StoreConfig::MAX_TTL`]
    /// mean "never expires".
    pub fn effective_ttl(&self) -> Option<Duration> {
        self.default_ttl.filter(|ttl| *ttl <= StoreConfig::MAX_TTL)
    }

    /// Expiry time for an entry written at `written_at`, if any.
    pub fn expires_at(&self, written_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let ttl = chrono::Duration::from_std(self.effective_ttl()?).ok()?;
        written_at.checked_add_signed(ttl)
    }
}

/// A stored entry with metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The serialized value.
    pub value: Vec<u8>,
    /// When the entry was written.
    pub cached_at: DateTime<Utc>,
    /// When the entry expires, if ever.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Key-value store shared by every cache instance that points at it.
///
/// Keys are opaque strings. Implementations own their locking; callers
/// assume nothing beyond last-write-wins.
pub trait CacheBackend: Send + Sync {
    /// Get stored bytes by key.
    ///
    /// Returns `None` if the key doesn't exist or has expired. A failure
    /// here is an error, never a miss.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store bytes under a key, overwriting any existing entry.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a key.
    ///
    /// Deleting an absent key is not an error; returns whether an entry
    /// was removed.
    fn delete(&self, key: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_ttl_never_expires() {
        assert!(CacheConfig::default().expires_at(Utc::now()).is_none());
    }

    #[test]
    fn test_ttl_sets_expiry() {
        let now = Utc::now();
        let config = CacheConfig::with_ttl(Duration::from_secs(60));
        assert_eq!(
            config.expires_at(now),
            Some(now + chrono::Duration::seconds(60))
        );
    }

    #[test]
    fn test_oversized_ttl_means_no_expiry() {
        for ttl in [
            StoreConfig::MAX_TTL + Duration::from_secs(1),
            Duration::from_secs(10_000_000_000_000),
            Duration::from_secs(u64::MAX),
        ] {
            let config = CacheConfig::with_ttl(ttl);
            assert!(config.effective_ttl().is_none());
            assert!(config.expires_at(Utc::now()).is_none());
        }
    }

    #[test]
    fn test_max_ttl_is_kept() {
        let config = CacheConfig::with_ttl(StoreConfig::MAX_TTL);
        assert_eq!(config.effective_ttl(), Some(StoreConfig::MAX_TTL));
        assert!(config.expires_at(Utc::now()).is_some());
    }
}
