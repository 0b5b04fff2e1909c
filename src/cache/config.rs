//! Facade configuration snapshot.

use crate::config::CacheSettings;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "partialcache";

/// Settings captured by a [`CacheFacade`](super::CacheFacade) at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// When false every call renders directly and the store is never touched.
    pub enabled: bool,
    /// Root key segment and root tag for every entry.
    pub namespace: String,
    /// TTL in minutes for requests that carry none. `None` caches forever.
    pub default_ttl_minutes: Option<u32>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: DEFAULT_NAMESPACE.to_string(),
            default_ttl_minutes: None,
        }
    }
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            namespace: settings.key.clone(),
            default_ttl_minutes: settings.duration_minutes.map(|minutes| minutes.get()),
        }
    }
}

impl CacheConfig {
    /// Effective TTL: the request's, else the configured default.
    pub fn ttl_minutes(&self, requested: Option<u32>) -> Option<u32> {
        requested.or(self.default_ttl_minutes)
    }
}
