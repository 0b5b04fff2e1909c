//! Cache key and tag derivation.
//!
//! Keys are `namespace.view[.key]`; tag sets always lead with the namespace.

use std::fmt;

/// Separator between cache key segments.
pub const KEY_SEPARATOR: char = '.';

/// Key a rendered view is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for `view` in `namespace`, optionally disambiguated by `key`.
    pub fn for_view(namespace: &str, view: &str, key: Option<&str>) -> Self {
        let mut derived = String::with_capacity(
            namespace.len() + view.len() + key.map_or(0, |k| k.len() + 1) + 1,
        );
        derived.push_str(namespace);
        derived.push(KEY_SEPARATOR);
        derived.push_str(view);
        if let Some(key) = key {
            derived.push(KEY_SEPARATOR);
            derived.push_str(key);
        }
        Self(derived)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Caller-supplied tags: none, one, or an ordered list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for Tags {
    fn from(tag: &str) -> Self {
        Self(vec![tag.to_string()])
    }
}

impl From<String> for Tags {
    fn from(tag: String) -> Self {
        Self(vec![tag])
    }
}

impl From<Option<&str>> for Tags {
    fn from(tag: Option<&str>) -> Self {
        Self(tag.map(str::to_string).into_iter().collect())
    }
}

impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        Self(tags)
    }
}

impl From<Vec<&str>> for Tags {
    fn from(tags: Vec<&str>) -> Self {
        Self(tags.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Tags {
    fn from(tags: &[&str]) -> Self {
        Self(tags.iter().map(|tag| tag.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Tags {
    fn from(tags: [&str; N]) -> Self {
        Self(tags.iter().map(|tag| tag.to_string()).collect())
    }
}

impl FromIterator<String> for Tags {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Tags an entry is scoped under.
///
/// The namespace is always the first tag. Caller tags follow in the order
/// given; only repeats of the namespace itself are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new(namespace: &str, tags: &Tags) -> Self {
        let mut resolved = Vec::with_capacity(tags.0.len() + 1);
        resolved.push(namespace.to_string());
        resolved.extend(
            tags.iter()
                .filter(|tag| *tag != namespace)
                .map(str::to_string),
        );
        Self(resolved)
    }

    pub fn namespace(&self) -> &str {
        &self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}
