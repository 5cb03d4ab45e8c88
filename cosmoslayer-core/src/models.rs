//! Resource payloads exchanged with the service.
//!
//! The service decorates every stored resource with system properties (`_rid`,
//! `_ts`, `_self`, `_etag`). [`Resource`] captures those; the other types embed it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// System metadata common to every stored resource.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Resource {
    /// The user-supplied identifier.
    pub id: String,
    /// The service-generated resource id.
    #[serde(rename = "_rid", default, skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,
    /// Last modification time.
    #[serde(
        rename = "_ts",
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    /// The addressable self link.
    #[serde(rename = "_self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    /// Entity tag used for optimistic concurrency.
    #[serde(rename = "_etag", default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl Resource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A server-side JavaScript function registered on a collection.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StoredProcedure {
    #[serde(flatten)]
    pub resource: Resource,
    /// The function source.
    pub body: String,
}

impl StoredProcedure {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            resource: Resource::new(name),
            body: body.into(),
        }
    }
}

/// The stored procedure feed of a collection.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StoredProcedures {
    #[serde(rename = "_rid", default, skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,
    #[serde(rename = "StoredProcedures", default)]
    pub stored_procedures: Vec<StoredProcedure>,
    #[serde(rename = "_count", default)]
    pub count: u64,
}

/// One page of the document feed of a collection, as returned by the service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DocumentFeed<T> {
    #[serde(rename = "_rid", default, skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,
    #[serde(rename = "Documents")]
    pub documents: Vec<T>,
    #[serde(rename = "_count", default)]
    pub count: u64,
}

/// The kind of change a [`PatchOperation`] applies.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatchOperationType {
    Add,
    Set,
    Replace,
    Remove,
    #[serde(rename = "incr")]
    Increment,
}

/// A single step of a partial document update.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PatchOperation {
    pub op: PatchOperationType,
    /// JSON pointer to the target property, e.g. `/address/city`.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn add(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with_value(PatchOperationType::Add, path, value)
    }

    pub fn set(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with_value(PatchOperationType::Set, path, value)
    }

    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with_value(PatchOperationType::Replace, path, value)
    }

    pub fn increment(path: impl Into<String>, by: impl Into<Value>) -> Self {
        Self::with_value(PatchOperationType::Increment, path, by)
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOperationType::Remove,
            path: path.into(),
            value: None,
        }
    }

    fn with_value(op: PatchOperationType, path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op,
            path: path.into(),
            value: Some(value.into()),
        }
    }
}

/// Body of a `PATCH` request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct PatchRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<&'a str>,
    pub operations: &'a [PatchOperation],
}
