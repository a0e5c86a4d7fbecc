//! Persistent key-value stores behind the read-through cache.
//!
//! - [`SqliteStore`]: file-backed, shareable across processes
//! - [`MemoryStore`]: in-process, for single-process hosts and tests

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{CacheBackend, CacheConfig, CacheEntry};
