//! Cache store collaborators.
//!
//! The facade talks to stores through [`CacheStore`]. Stores that can scope
//! entries by tag also implement [`TaggableStore`] and advertise it through
//! [`CacheStore::into_taggable`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::CacheError;

use super::keys::TagSet;

/// Deferred computation of a value to store on a miss.
///
/// Stores call it at most once, and only when the key is absent.
pub type Thunk<'a> = Box<dyn FnOnce() -> Result<String, CacheError> + 'a>;

/// How long a stored value stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Forever,
    After(Duration),
}

impl Expiry {
    /// `None` means forever.
    pub fn from_minutes(minutes: Option<u32>) -> Self {
        match minutes {
            Some(minutes) => Self::After(Duration::from_secs(u64::from(minutes) * 60)),
            None => Self::Forever,
        }
    }

    pub fn is_forever(&self) -> bool {
        matches!(self, Self::Forever)
    }

    /// A zero-length expiry means the value must not be stored at all.
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::After(duration) if duration.is_zero())
    }

    /// Absolute deadline relative to `now`; `None` never expires. A deadline
    /// past the clock's range is treated as never.
    pub fn deadline(&self, now: Instant) -> Option<Instant> {
        match self {
            Self::Forever => None,
            Self::After(duration) => now.checked_add(*duration),
        }
    }
}

/// Key-value store holding rendered views.
pub trait CacheStore: Send + Sync {
    /// Return the value under `key`, or run `compute`, store its result and
    /// return it. A failed computation stores nothing.
    fn remember(&self, key: &str, expiry: Expiry, compute: Thunk<'_>)
    -> Result<String, CacheError>;

    /// Remove `key`. Returns whether an entry was present.
    fn forget(&self, key: &str) -> Result<bool, CacheError>;

    /// Capability probe: the tag-scoped view of this store, if it has one.
    fn into_taggable(self: Arc<Self>) -> Option<Arc<dyn TaggableStore>> {
        None
    }
}

/// Store that can scope entries by tags and flush a tag at once.
pub trait TaggableStore: CacheStore {
    /// [`CacheStore::remember`] with the key scoped under `tags`.
    fn remember_tagged(
        &self,
        tags: &TagSet,
        key: &str,
        expiry: Expiry,
        compute: Thunk<'_>,
    ) -> Result<String, CacheError>;

    /// Remove `key` as scoped under `tags`.
    fn forget_tagged(&self, tags: &TagSet, key: &str) -> Result<bool, CacheError>;

    /// Invalidate every entry scoped under `tag`.
    fn flush_tag(&self, tag: &str) -> Result<(), CacheError>;
}
