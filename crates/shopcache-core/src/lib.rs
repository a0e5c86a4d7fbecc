//! shopcache - read-through, two-tier cache for Shopify shop attributes.
//!
//! A [`ShopCache`] keeps one shop's attributes in a process-local memo on
//! top of a shared persistent store, and only goes to the Shopify API when
//! both miss. [`ShopCache::refresh_attributes`] bypasses both tiers.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopcache::{ShopCache, SqliteStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> shopcache::Result<()> {
//!     let store = Arc::new(SqliteStore::new("/tmp/shopcache.sqlite")?);
//!     let shop = ShopCache::with_http_client("acme.myshopify.com", "shpat_...", store)?;
//!
//!     let attributes = shop.attributes().await?;
//!     println!("{}", attributes["name"]);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod network;
pub mod shop;
pub mod store;

// Re-export commonly used types
pub use cache::{Lookup, Origin, ReadThroughCache};
pub use error::{ErrorKind, Result, ShopCacheError};
pub use network::{HttpClient, HttpResponse, Transport};
pub use shop::{ShopAttributes, ShopCache};
pub use store::{CacheBackend, CacheConfig, CacheEntry, MemoryStore, SqliteStore};
