//! The request handed to a [`Transport`](crate::transport::Transport).

use std::fmt;

use bytes::Bytes;
use serde::Serialize;

use crate::{
    error::DocumentDbResult,
    headers::{self, Headers},
    link::ResourceLink,
};

pub const JSON: &str = "application/json";
pub const JSON_PATCH: &str = "application/json_patch+json";

/// HTTP verbs used by the REST API.
///
/// Creation and stored procedure execution use `Post`, reads and listings `Get`,
/// full replacement `Put`, partial updates `Patch` and removal `Delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// The uppercase HTTP method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully rendered request: verb, resource link, headers and optional body.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub link: ResourceLink,
    pub headers: Headers,
    pub body: Option<Bytes>,
}

impl Request {
    pub fn new(method: Method, link: ResourceLink) -> Self {
        Self {
            method,
            link,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Merges `headers` into the request, overwriting on conflict.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Serializes `body` as JSON and sets the content type.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentDbError::Serialization`](crate::error::DocumentDbError::Serialization)
    /// if `body` cannot be serialized.
    pub fn with_json_body<T: Serialize + ?Sized>(self, body: &T) -> DocumentDbResult<Self> {
        Ok(self.with_body(JSON, serde_json::to_vec(body)?))
    }

    pub fn with_body(mut self, content_type: &str, body: impl Into<Bytes>) -> Self {
        self.headers.insert(headers::CONTENT_TYPE, content_type);
        self.body = Some(body.into());
        self
    }

    /// The request path, e.g. `dbs/db/colls/col/docs`.
    pub fn path(&self) -> String {
        self.link.to_string()
    }
}
