//! Per-call cache request.

use crate::render::ViewData;

use super::keys::Tags;

/// Everything needed to cache one view render.
///
/// ```
/// use partialcache::CacheRequest;
///
/// let request = CacheRequest::new("home.index")
///     .key("user-42")
///     .ttl_minutes(10)
///     .tags(["homepage"]);
/// assert_eq!(request.view(), "home.index");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CacheRequest {
    pub(crate) view: String,
    pub(crate) data: ViewData,
    pub(crate) merge_data: ViewData,
    pub(crate) key: Option<String>,
    pub(crate) ttl_minutes: Option<u32>,
    pub(crate) tags: Tags,
}

impl CacheRequest {
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            ..Default::default()
        }
    }

    pub fn data(mut self, data: ViewData) -> Self {
        self.data = data;
        self
    }

    /// Extra data merged in at render time; `data` wins on conflicts.
    pub fn merge_data(mut self, merge_data: ViewData) -> Self {
        self.merge_data = merge_data;
        self
    }

    /// Disambiguator appended to the cache key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn ttl_minutes(mut self, minutes: u32) -> Self {
        self.ttl_minutes = Some(minutes);
        self
    }

    pub fn tags(mut self, tags: impl Into<Tags>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn view(&self) -> &str {
        &self.view
    }
}
