//! Header vocabulary and the header mapping exchanged with the transport.
//!
//! Names are stored lowercase. HTTP header names are case-insensitive, so every
//! lookup through [`Headers`] is as well.

use std::collections::BTreeMap;
use std::fmt::Display;

pub const PARTITION_KEY: &str = "x-ms-documentdb-partitionkey";
pub const PARTITION_KEY_RANGE_ID: &str = "x-ms-documentdb-partitionkeyrangeid";
pub const CONSISTENCY_LEVEL: &str = "x-ms-consistency-level";
pub const SESSION_TOKEN: &str = "x-ms-session-token";
pub const CONTINUATION: &str = "x-ms-continuation";
pub const IF_NONE_MATCH: &str = "if-none-match";
pub const IF_MATCH: &str = "if-match";
pub const UPSERT: &str = "x-ms-documentdb-is-upsert";
pub const INDEXING_DIRECTIVE: &str = "x-ms-indexing-directive";
pub const PRE_TRIGGER_INCLUDE: &str = "x-ms-documentdb-pre-trigger-include";
pub const POST_TRIGGER_INCLUDE: &str = "x-ms-documentdb-post-trigger-include";
pub const MAX_ITEM_COUNT: &str = "x-ms-max-item-count";
pub const A_IM: &str = "a-im";
pub const REQUEST_CHARGE: &str = "x-ms-request-charge";
pub const ITEM_COUNT: &str = "x-ms-item-count";
pub const ACTIVITY_ID: &str = "x-ms-activity-id";
pub const ETAG: &str = "etag";
pub const CONTENT_TYPE: &str = "content-type";
pub const VERSION: &str = "x-ms-version";
pub const DATE: &str = "x-ms-date";
pub const AUTHORIZATION: &str = "authorization";

/// Value of [`A_IM`] that switches a document listing into change feed mode.
pub const INCREMENTAL_FEED: &str = "Incremental Feed";

/// A mapping from lowercase header name to header value.
///
/// Each name appears at most once; inserting an existing name replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.0.insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Sets `name` only when `value` is present and non-empty.
    pub fn insert_present<S: AsRef<str>>(&mut self, name: &str, value: Option<S>) {
        if let Some(value) = value {
            let value = value.as_ref();
            if !value.is_empty() {
                self.insert(name, value);
            }
        }
    }

    /// Sets `name` to the comma-joined `values`, omitting it when the list is empty.
    pub fn insert_joined<S: AsRef<str>>(&mut self, name: &str, values: &[S]) {
        if values.is_empty() {
            return;
        }
        let joined = values
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        self.insert(name, joined);
    }

    /// Sets `name` to the decimal rendering of `value`, omitting zero.
    pub fn insert_nonzero<N>(&mut self, name: &str, value: N)
    where
        N: Default + PartialEq + Display,
    {
        if value != N::default() {
            self.insert(name, value.to_string());
        }
    }

    /// Always sets `name` to `"true"` or `"false"`.
    pub fn insert_flag(&mut self, name: &str, value: bool) {
        self.insert(name, if value { "true" } else { "false" });
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns `true` if `name` is set, whatever its case.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes `name` and returns its value, if it was set.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(&name.to_ascii_lowercase())
    }

    /// Copies every entry of `other` into `self`, overwriting on conflict.
    pub fn extend(&mut self, other: Headers) {
        self.0.extend(other.0);
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
