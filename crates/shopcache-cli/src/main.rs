//! shopcache CLI - print or invalidate a shop's cached attributes.
//!
//! Attributes are read through a SQLite store shared by every invocation,
//! so only the first run (or a `--refresh`) hits the Shopify API.

use anyhow::{Context, Result};
use clap::Parser;
use shopcache::config::StoreConfig;
use shopcache::{CacheConfig, HttpClient, ShopCache, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "shopcache")]
#[command(about = "Read-through cache for Shopify shop attributes")]
struct Args {
    /// Shop domain, e.g. acme.myshopify.com
    #[arg(long, env = "SHOPIFY_DOMAIN")]
    domain: String,

    /// Admin API access token
    #[arg(long, env = "SHOPIFY_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Store database path (defaults to the user cache directory)
    #[arg(long, env = "SHOPCACHE_DB")]
    db: Option<PathBuf>,

    /// Expire stored entries after this many seconds
    #[arg(long)]
    ttl_secs: Option<u64>,

    /// Upstream request timeout in seconds
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Clear the cached entry and fetch from the API
    #[arg(long, conflicts_with = "clear")]
    refresh: bool,

    /// Clear the cached entry without fetching
    #[arg(long)]
    clear: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn db_path(&self) -> Result<PathBuf> {
        match &self.db {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }

    fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            default_ttl: self.ttl_secs.map(Duration::from_secs),
        }
    }
}

fn default_db_path() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("No user cache directory; pass --db")?;
    Ok(base
        .join(StoreConfig::CACHE_DIR_NAME)
        .join(StoreConfig::DATABASE_FILENAME))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON.
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let db_path = args.db_path()?;
    debug!("Store database: {}", db_path.display());

    let store = Arc::new(
        SqliteStore::with_config(&db_path, args.cache_config())
            .with_context(|| format!("Failed to open store at {}", db_path.display()))?,
    );
    let transport = Arc::new(HttpClient::with_timeout(Duration::from_secs(
        args.timeout_secs,
    ))?);
    let shop = ShopCache::new(&args.domain, &args.access_token, store, transport)?;

    if args.clear {
        shop.clear()?;
        info!("Cleared cached attributes for {}", shop.myshopify_domain());
        return Ok(());
    }

    let attributes = if args.refresh {
        shop.refresh_attributes().await
    } else {
        shop.attributes().await
    }
    .with_context(|| format!("Failed to load attributes for {}", shop.myshopify_domain()))?;

    println!("{}", serde_json::to_string_pretty(attributes.as_ref())?);

    Ok(())
}
