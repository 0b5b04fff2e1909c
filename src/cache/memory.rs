//! In-memory cache stores.
//!
//! [`MemoryStore`] is a bounded LRU map with per-entry expiry.
//! [`TaggedMemoryStore`] adds tag scoping on top of it: every tag has a
//! version id, and a tagged key is prefixed with a digest of the ids of its
//! tags. Flushing a tag rotates its id, so every key scoped under it becomes
//! unreachable and ages out through LRU eviction.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use lru::LruCache;
use metrics::counter;
use sha2::{Digest, Sha256};
use tracing::trace;
use uuid::Uuid;

use crate::error::CacheError;

use super::keys::TagSet;
use super::lock::{rw_read, rw_write};
use super::store::{CacheStore, Expiry, TaggableStore, Thunk};

const SOURCE: &str = "cache::memory";
const DEFAULT_CAPACITY: usize = 1024;

const METRIC_STORE_HIT: &str = "partialcache_store_hit_total";
const METRIC_STORE_MISS: &str = "partialcache_store_miss_total";
const METRIC_STORE_EVICT: &str = "partialcache_store_evict_total";

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// Bounded in-memory store. Not taggable.
pub struct MemoryStore {
    entries: RwLock<LruCache<String, Entry>>,
}

impl MemoryStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Live value under `key`. Expired entries are dropped on access.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, SOURCE, "get");
        match entries.get(key) {
            None => return None,
            Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
            Some(_) => {}
        }
        entries.pop(key);
        None
    }

    /// Store `value` under `key`. A zero-length expiry stores nothing.
    pub fn put(&self, key: &str, value: String, expiry: Expiry) {
        if expiry.is_zero() {
            return;
        }
        let entry = Entry {
            value,
            expires_at: expiry.deadline(Instant::now()),
        };
        let evicted = rw_write(&self.entries, SOURCE, "put").push(key.to_string(), entry);
        if let Some((evicted_key, _)) = evicted
            && evicted_key != key
        {
            counter!(METRIC_STORE_EVICT).increment(1);
            trace!(key = %evicted_key, "evicted least recently used entry");
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        rw_write(&self.entries, SOURCE, "remove").pop(key).is_some()
    }

    pub fn clear(&self) {
        rw_write(&self.entries, SOURCE, "clear").clear();
    }

    /// Number of stored entries, including expired ones not yet dropped.
    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remember_raw(
        &self,
        key: &str,
        expiry: Expiry,
        compute: Thunk<'_>,
    ) -> Result<String, CacheError> {
        if let Some(value) = self.get(key) {
            counter!(METRIC_STORE_HIT).increment(1);
            return Ok(value);
        }
        counter!(METRIC_STORE_MISS).increment(1);

        // The lock is not held while computing; views may render nested
        // cached partials through the same store.
        let value = compute()?;
        self.put(key, value.clone(), expiry);
        Ok(value)
    }

    #[cfg(test)]
    fn insert_expired(&self, key: &str, value: &str) {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Some(Instant::now()),
        };
        rw_write(&self.entries, SOURCE, "insert_expired").put(key.to_string(), entry);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl CacheStore for MemoryStore {
    fn remember(
        &self,
        key: &str,
        expiry: Expiry,
        compute: Thunk<'_>,
    ) -> Result<String, CacheError> {
        self.remember_raw(key, expiry, compute)
    }

    fn forget(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.remove(key))
    }
}

/// In-memory store with tag scoping.
#[derive(Default)]
pub struct TaggedMemoryStore {
    entries: MemoryStore,
    tag_ids: RwLock<HashMap<String, String>>,
}

impl TaggedMemoryStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: MemoryStore::new(capacity),
            tag_ids: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entries across all scopes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key under which `key` is stored when scoped by `tags`.
    pub fn scoped_key(&self, tags: &TagSet, key: &str) -> String {
        let ids: Vec<String> = tags.iter().map(|tag| self.tag_id(tag)).collect();
        let digest = Sha256::digest(ids.join("|").as_bytes());
        format!("{}:{key}", hex::encode(digest))
    }

    fn tag_id(&self, tag: &str) -> String {
        if let Some(id) = rw_read(&self.tag_ids, SOURCE, "tag_id.read").get(tag) {
            return id.clone();
        }
        rw_write(&self.tag_ids, SOURCE, "tag_id.write")
            .entry(tag.to_string())
            .or_insert_with(new_tag_id)
            .clone()
    }
}

fn new_tag_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl CacheStore for TaggedMemoryStore {
    fn remember(
        &self,
        key: &str,
        expiry: Expiry,
        compute: Thunk<'_>,
    ) -> Result<String, CacheError> {
        self.entries.remember_raw(key, expiry, compute)
    }

    fn forget(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.remove(key))
    }

    fn into_taggable(self: Arc<Self>) -> Option<Arc<dyn TaggableStore>> {
        Some(self)
    }
}

impl TaggableStore for TaggedMemoryStore {
    fn remember_tagged(
        &self,
        tags: &TagSet,
        key: &str,
        expiry: Expiry,
        compute: Thunk<'_>,
    ) -> Result<String, CacheError> {
        let scoped = self.scoped_key(tags, key);
        self.entries.remember_raw(&scoped, expiry, compute)
    }

    fn forget_tagged(&self, tags: &TagSet, key: &str) -> Result<bool, CacheError> {
        let scoped = self.scoped_key(tags, key);
        Ok(self.entries.remove(&scoped))
    }

    fn flush_tag(&self, tag: &str) -> Result<(), CacheError> {
        rw_write(&self.tag_ids, SOURCE, "flush_tag").insert(tag.to_string(), new_tag_id());
        Ok(())
    }
}
