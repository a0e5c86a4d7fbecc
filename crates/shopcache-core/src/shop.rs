//! Shop attributes cache.
//!
//! Two tiers sit in front of `GET https://{domain}/admin/shop.json`:
//! a per-instance memo and the shared store behind [`ReadThroughCache`].
//! Repeated calls on one instance touch neither the network nor the store.
//!
//! There is no single-flight guard. Overlapping calls on a cold instance may
//! each fetch upstream; the store keeps whichever write lands last.

use crate::cache::ReadThroughCache;
use crate::config::ShopifyConfig;
use crate::error::{Result, ShopCacheError};
use crate::network::{HttpClient, Transport};
use crate::store::CacheBackend;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};
use url::{Host, Url};

/// Decoded shop object, as returned inside the `{"shop": {...}}` envelope.
pub type ShopAttributes = Map<String, Value>;

/// Cache for one shop's attributes.
///
/// Created with a fixed `(domain, access token)` identity and injected
/// store and transport handles. Returned attributes are shared read-only
/// views; nothing a caller does can alter cached state.
pub struct ShopCache<B: CacheBackend + ?Sized, T: Transport + ?Sized = HttpClient> {
    myshopify_domain: String,
    access_token: String,
    /// `shops:{domain}`
    namespace: String,
    shop_url: String,
    cache: ReadThroughCache<B>,
    transport: Arc<T>,
    /// Process-local memo; `None` until the first successful load.
    attributes: RwLock<Option<Arc<ShopAttributes>>>,
}

impl<B: CacheBackend + ?Sized> ShopCache<B, HttpClient> {
    /// Create a cache that fetches with a default [`HttpClient`].
    pub fn with_http_client(
        myshopify_domain: impl Into<String>,
        access_token: impl Into<String>,
        store: Arc<B>,
    ) -> Result<Self> {
        Self::new(
            myshopify_domain,
            access_token,
            store,
            Arc::new(HttpClient::new()?),
        )
    }
}

impl<B: CacheBackend + ?Sized, T: Transport + ?Sized> ShopCache<B, T> {
    /// Create a cache for one shop.
    ///
    /// Fails with [`ShopCacheError::Config`] if the domain does not form a
    /// plain `https://{domain}` origin.
    pub fn new(
        myshopify_domain: impl Into<String>,
        access_token: impl Into<String>,
        store: Arc<B>,
        transport: Arc<T>,
    ) -> Result<Self> {
        let myshopify_domain = myshopify_domain.into();
        let shop_url = shop_url(&myshopify_domain)?;

        Ok(Self {
            namespace: format!("{}:{}", ShopifyConfig::NAMESPACE_PREFIX, myshopify_domain),
            myshopify_domain,
            access_token: access_token.into(),
            shop_url,
            cache: ReadThroughCache::new(store),
            transport,
            attributes: RwLock::new(None),
        })
    }

    pub fn myshopify_domain(&self) -> &str {
        &self.myshopify_domain
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Cache namespace for this shop (`shops:{domain}`).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// URL the attributes are fetched from.
    pub fn shop_url(&self) -> &str {
        &self.shop_url
    }

    /// The shared store handle.
    pub fn store(&self) -> &Arc<B> {
        self.cache.store()
    }

    /// Whether this instance holds memoized attributes.
    pub fn is_loaded(&self) -> bool {
        self.memo().is_some()
    }

    /// Get shop attributes from the memo, the store, or the API, in that
    /// order.
    ///
    /// A failed call leaves both tiers untouched.
    pub async fn attributes(&self) -> Result<Arc<ShopAttributes>> {
        if let Some(attributes) = self.memo() {
            return Ok(attributes);
        }

        let attributes: ShopAttributes = self
            .cache
            .get_or_compute(&self.namespace, ShopifyConfig::ATTRIBUTES_KEY, move || {
                self.fetch_attributes()
            })
            .await?;

        let attributes = Arc::new(attributes);
        *self
            .attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&attributes));

        Ok(attributes)
    }

    /// Get shop attributes from the API after clearing both tiers. Use this
    /// when stale data is unacceptable.
    pub async fn refresh_attributes(&self) -> Result<Arc<ShopAttributes>> {
        self.clear()?;
        self.attributes().await
    }

    /// Drop the memo and the stored entry.
    pub fn clear(&self) -> Result<()> {
        *self
            .attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;

        self.cache.clear(&self.namespace, ShopifyConfig::ATTRIBUTES_KEY)?;
        debug!("Cleared attributes cache for {}", self.myshopify_domain);
        Ok(())
    }

    fn memo(&self) -> Option<Arc<ShopAttributes>> {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn fetch_attributes(&self) -> Result<ShopAttributes> {
        info!("Fetching shop attributes for {}", self.myshopify_domain);

        let headers = [
            ("Accept", "application/json"),
            (ShopifyConfig::ACCESS_TOKEN_HEADER, self.access_token.as_str()),
        ];
        let response = self.transport.get(&self.shop_url, &headers).await?;

        if response.status != 200 {
            return Err(ShopCacheError::Request {
                status: response.status,
                url: self.shop_url.clone(),
            });
        }

        parse_shop(&response.body)
    }
}

impl<B: CacheBackend + ?Sized, T: Transport + ?Sized> fmt::Debug for ShopCache<B, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopCache")
            .field("myshopify_domain", &self.myshopify_domain)
            .field("access_token", &"<redacted>")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

fn shop_url(myshopify_domain: &str) -> Result<String> {
    let invalid = |reason: &str| ShopCacheError::Config {
        message: format!("Invalid shop domain {:?}: {}", myshopify_domain, reason),
    };

    if myshopify_domain.is_empty() {
        return Err(invalid("empty"));
    }

    // Normalized form: lowercase, internationalized labels in punycode.
    let host = Host::parse(myshopify_domain).map_err(|e| invalid(&e.to_string()))?;

    let url = Url::parse(&format!(
        "https://{}{}",
        myshopify_domain,
        ShopifyConfig::SHOP_PATH
    ))
    .map_err(|e| invalid(&e.to_string()))?;

    // Anything beyond a bare host (port, userinfo, path) shows up as a
    // mismatch between the parsed host and the input.
    if url.host_str() != Some(host.to_string().as_str())
        || url.path() != ShopifyConfig::SHOP_PATH
    {
        return Err(invalid("not a bare host name"));
    }

    Ok(url.into())
}

/// Unwrap the shop object from a `{"shop": {...}}` body.
fn parse_shop(body: &[u8]) -> Result<ShopAttributes> {
    let mut envelope: Map<String, Value> =
        serde_json::from_slice(body).map_err(|e| ShopCacheError::Decode {
            message: format!("Invalid shop response body: {}", e),
            source: Some(e),
        })?;

    match envelope.remove(ShopifyConfig::SHOP_ENVELOPE_KEY) {
        Some(Value::Object(shop)) => Ok(shop),
        Some(other) => Err(ShopCacheError::Decode {
            message: format!(
                "Expected an object under {:?}, got {}",
                ShopifyConfig::SHOP_ENVELOPE_KEY,
                other
            ),
            source: None,
        }),
        None => Err(ShopCacheError::Decode {
            message: format!(
                "Missing {:?} key in shop response",
                ShopifyConfig::SHOP_ENVELOPE_KEY
            ),
            source: None,
        }),
    }
}
