//! Partial view caching.
//!
//! [`cache::CacheFacade`] memoizes the rendered output of named views under
//! keys derived from a namespace, the view name and an optional
//! disambiguator. Entries can carry a TTL and tags; tag-scoped invalidation
//! is used whenever the injected store supports it.

pub mod cache;
pub mod config;
pub mod error;
pub mod render;
pub mod telemetry;

pub use cache::{CacheConfig, CacheFacade, CacheRequest};
pub use error::{CacheError, RenderError};
pub use render::{ViewData, ViewRegistry, ViewRenderer};
