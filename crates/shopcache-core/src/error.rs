//! Error types for shopcache.
//!
//! Every failure is surfaced to the immediate caller. Nothing here is
//! retried; [`ShopCacheError::is_retryable`] only tells the caller whether a
//! retry is likely to help.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for shopcache.
#[derive(Debug, Error)]
pub enum ShopCacheError {
    // Transport errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    // Upstream errors
    #[error("Invalid response code {status} from {url}")]
    Request { status: u16, url: String },

    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Persistent store errors
    #[error("Store error: {message}")]
    Store {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for shopcache operations.
pub type Result<T> = std::result::Result<T, ShopCacheError>;

/// Coarse classification of a [`ShopCacheError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// DNS, TLS, connection or timeout failure.
    Transport,
    /// Upstream answered with a non-200 status.
    Upstream,
    /// Upstream body could not be decoded.
    Decode,
    /// Persistent store failed or holds an unreadable entry.
    Store,
    /// Invalid construction parameters.
    Config,
}

// Conversion implementations for common error types

impl From<std::io::Error> for ShopCacheError {
    fn from(err: std::io::Error) -> Self {
        ShopCacheError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for ShopCacheError {
    fn from(err: serde_json::Error) -> Self {
        ShopCacheError::Serialization {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for ShopCacheError {
    fn from(err: rusqlite::Error) -> Self {
        ShopCacheError::Store {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl ShopCacheError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ShopCacheError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a store error without an underlying database error.
    pub fn store(message: impl Into<String>) -> Self {
        ShopCacheError::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShopCacheError::Network { .. } | ShopCacheError::Timeout(_) => ErrorKind::Transport,
            ShopCacheError::Request { .. } => ErrorKind::Upstream,
            ShopCacheError::Decode { .. } => ErrorKind::Decode,
            ShopCacheError::Store { .. }
            | ShopCacheError::Serialization { .. }
            | ShopCacheError::Io { .. } => ErrorKind::Store,
            ShopCacheError::Config { .. } => ErrorKind::Config,
        }
    }

    /// HTTP status carried by an upstream request error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ShopCacheError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if a caller-side retry could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ShopCacheError::Network { .. } | ShopCacheError::Timeout(_) => true,
            ShopCacheError::Request { status, .. } => matches!(status, 408 | 429 | 500..=599),
            _ => false,
        }
    }
}
