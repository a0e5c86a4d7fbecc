//! Generic read-through cache primitive.
//!
//! Knows nothing about what it caches: values only need to be
//! serde-serializable. See [`crate::shop`] for the Shopify-specific layer.

mod read_through;

pub use read_through::{Lookup, Origin, ReadThroughCache};
