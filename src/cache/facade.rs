//! The cache-or-render decision.

use std::fmt;
use std::sync::Arc;

use metrics::counter;
use tracing::{debug, instrument};

use crate::error::CacheError;
use crate::render::ViewRenderer;

use super::config::CacheConfig;
use super::keys::{CacheKey, TagSet, Tags};
use super::request::CacheRequest;
use super::store::{CacheStore, Expiry, TaggableStore, Thunk};

const METRIC_BYPASS: &str = "partialcache_bypass_total";
const METRIC_RENDER: &str = "partialcache_render_total";
const METRIC_LOOKUP: &str = "partialcache_lookup_total";
const METRIC_FORGET: &str = "partialcache_forget_total";
const METRIC_FLUSH: &str = "partialcache_flush_total";

/// Caches rendered views in a [`CacheStore`].
///
/// Whether the store supports tags is decided once, here at construction.
/// Swapping the store's backing driver later does not change that decision.
pub struct CacheFacade {
    config: CacheConfig,
    renderer: Arc<dyn ViewRenderer>,
    store: Arc<dyn CacheStore>,
    tagged: Option<Arc<dyn TaggableStore>>,
}

impl CacheFacade {
    pub fn new(
        renderer: Arc<dyn ViewRenderer>,
        store: Arc<dyn CacheStore>,
        config: CacheConfig,
    ) -> Self {
        let tagged = Arc::clone(&store).into_taggable();
        debug!(
            namespace = %config.namespace,
            enabled = config.enabled,
            taggable = tagged.is_some(),
            "partial cache ready"
        );
        Self {
            config,
            renderer,
            store,
            tagged,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Whether the store was found to support tag scoping.
    pub fn is_taggable(&self) -> bool {
        self.tagged.is_some()
    }

    /// Return the cached rendering of the requested view, rendering and
    /// storing it on a miss.
    pub fn cache(&self, request: CacheRequest) -> Result<String, CacheError> {
        if !self.config.enabled {
            counter!(METRIC_BYPASS).increment(1);
            return self.render(&request);
        }

        let key = self.cache_key_for_view(&request.view, request.key.as_deref());
        let expiry = Expiry::from_minutes(self.config.ttl_minutes(request.ttl_minutes));
        let render: Thunk<'_> = Box::new(|| self.render(&request));

        match &self.tagged {
            Some(store) => {
                let tags = self.tag_set(&request.tags);
                debug!(%key, %tags, ?expiry, "tagged lookup");
                counter!(METRIC_LOOKUP, "scope" => "tagged").increment(1);
                store.remember_tagged(&tags, key.as_str(), expiry, render)
            }
            None => {
                debug!(%key, ?expiry, "plain lookup");
                counter!(METRIC_LOOKUP, "scope" => "plain").increment(1);
                self.store.remember(key.as_str(), expiry, render)
            }
        }
    }

    /// Key a view is cached under: `namespace.view[.key]`.
    pub fn cache_key_for_view(&self, view: &str, key: Option<&str>) -> CacheKey {
        CacheKey::for_view(&self.config.namespace, view, key)
    }

    /// Namespace followed by the caller's tags.
    pub fn tag_set(&self, tags: &Tags) -> TagSet {
        TagSet::new(&self.config.namespace, tags)
    }

    /// Invalidate the cached rendering of `view`.
    ///
    /// On a taggable store the tag-scoped entry is forgotten first; the plain
    /// key is forgotten afterwards in every case. Both removals are attempted
    /// even if the first fails, and the first failure is returned.
    #[instrument(skip(self, tags), fields(namespace = %self.config.namespace))]
    pub fn forget(
        &self,
        view: &str,
        key: Option<&str>,
        tags: impl Into<Tags>,
    ) -> Result<(), CacheError> {
        let cache_key = self.cache_key_for_view(view, key);

        let scoped = match &self.tagged {
            Some(store) => {
                let tags = self.tag_set(&tags.into());
                counter!(METRIC_FORGET, "scope" => "tagged").increment(1);
                let result = store.forget_tagged(&tags, cache_key.as_str());
                debug!(key = %cache_key, %tags, removed = ?result.as_ref().ok(), "tagged forget");
                result.map(drop)
            }
            None => Ok(()),
        };

        counter!(METRIC_FORGET, "scope" => "plain").increment(1);
        let plain = self.store.forget(cache_key.as_str());
        debug!(key = %cache_key, removed = ?plain.as_ref().ok(), "plain forget");

        scoped.and(plain.map(drop))
    }

    /// Invalidate every entry under `tag`, or under the namespace when no tag
    /// is given. Exactly one tag is flushed.
    ///
    /// Fails with [`CacheError::MethodNotSupported`] when the store cannot
    /// scope by tag.
    #[instrument(skip(self), fields(namespace = %self.config.namespace))]
    pub fn flush(&self, tag: Option<&str>) -> Result<(), CacheError> {
        let Some(store) = &self.tagged else {
            return Err(CacheError::method_not_supported("flush"));
        };

        let tag = tag.unwrap_or(self.config.namespace.as_str());
        counter!(METRIC_FLUSH).increment(1);
        debug!(tag, "flushing tag");
        store.flush_tag(tag)
    }

    fn render(&self, request: &CacheRequest) -> Result<String, CacheError> {
        counter!(METRIC_RENDER).increment(1);
        debug!(view = %request.view, "rendering view");
        self.renderer
            .render(&request.view, &request.data, &request.merge_data)
            .map_err(CacheError::from)
    }
}

impl fmt::Debug for CacheFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheFacade")
            .field("config", &self.config)
            .field("taggable", &self.tagged.is_some())
            .finish_non_exhaustive()
    }
}
