//! Centralized configuration for shopcache.
//!
//! Wire constants for the Shopify endpoint, network timeouts and store
//! defaults.

use std::time::Duration;

/// Shopify wire contract and cache key layout.
pub struct ShopifyConfig;

impl ShopifyConfig {
    /// Path of the shop resource, relative to `https://{domain}`.
    pub const SHOP_PATH: &'static str = "/admin/shop.json";
    /// Header carrying the access token.
    pub const ACCESS_TOKEN_HEADER: &'static str = "X-Shopify-Access-Token";
    /// Key wrapping the shop object in the response body.
    pub const SHOP_ENVELOPE_KEY: &'static str = "shop";
    /// Prefix of the per-shop cache namespace (`shops:{domain}`).
    pub const NAMESPACE_PREFIX: &'static str = "shops";
    /// Subkey holding the attributes within a shop namespace.
    pub const ATTRIBUTES_KEY: &'static str = "attributes";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const USER_AGENT: &'static str = concat!("shopcache/", env!("CARGO_PKG_VERSION"));
}

/// Persistent store defaults.
pub struct StoreConfig;

impl StoreConfig {
    pub const CACHE_DIR_NAME: &'static str = "shopcache";
    pub const DATABASE_FILENAME: &'static str = "cache.sqlite";
    /// Upper bound on entries held by a [`crate::store::MemoryStore`].
    pub const MEMORY_MAX_CAPACITY: u64 = 10_000;
    /// Longest TTL a store will honor (1000 years). Anything longer is
    /// treated as no expiry.
    pub const MAX_TTL: Duration = Duration::from_secs(1000 * 365 * 24 * 60 * 60);
}
