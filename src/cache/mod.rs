//! Partial cache.
//!
//! - [`CacheFacade`] decides what key, which tags and what TTL a rendered
//!   view is stored under, and whether to bypass the store entirely.
//! - [`CacheStore`] / [`TaggableStore`] are the storage collaborators;
//!   [`MemoryStore`] and [`TaggedMemoryStore`] are the bundled ones.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true          # legacy "true"/"false"/"1"/"0" strings are accepted
//! key = "partialcache"    # namespace: key prefix and root tag
//! duration = 60           # default TTL in minutes; omit to cache forever
//! ```

mod config;
mod facade;
mod keys;
mod lock;
mod memory;
mod request;
mod store;

pub use config::{CacheConfig, DEFAULT_NAMESPACE};
pub use facade::CacheFacade;
pub use keys::{CacheKey, KEY_SEPARATOR, TagSet, Tags};
pub use memory::{MemoryStore, TaggedMemoryStore};
pub use request::CacheRequest;
pub use store::{CacheStore, Expiry, TaggableStore, Thunk};
