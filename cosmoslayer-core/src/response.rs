//! Response parsing.
//!
//! A [`RawResponse`] is what the transport hands back. [`ResponseMetadata`]
//! extracts the service headers from it and never fails; body decoding is a
//! separate step that only happens when a caller asks for a destination type.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    error::DocumentDbResult,
    headers::{self, Headers},
    models::DocumentFeed,
};

/// Status, headers and body exactly as the transport received them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, headers: Headers, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// 2xx responses, plus `304 Not Modified`, which conditional reads and the
    /// change feed return when nothing changed.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) || self.status == 304
    }

    /// The body as text, for diagnostics.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Service-reported facts about a response, independent of the body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseMetadata {
    pub status: u16,
    /// Request units consumed. Zero when the service did not report a usable value.
    pub request_charge: f64,
    pub session_token: Option<String>,
    /// Resume token for the next page of a listing.
    pub continuation: Option<String>,
    pub etag: Option<String>,
    pub activity_id: Option<Uuid>,
    pub item_count: Option<u64>,
}

impl ResponseMetadata {
    pub fn from_response(response: &RawResponse) -> Self {
        let headers = &response.headers;
        let owned = |name: &str| {
            headers
                .get(name)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            status: response.status,
            request_charge: request_charge(headers),
            session_token: owned(headers::SESSION_TOKEN),
            continuation: owned(headers::CONTINUATION),
            etag: owned(headers::ETAG),
            activity_id: headers
                .get(headers::ACTIVITY_ID)
                .and_then(|v| Uuid::parse_str(v.trim()).ok()),
            item_count: headers
                .get(headers::ITEM_COUNT)
                .and_then(|v| v.trim().parse().ok()),
        }
    }
}

/// Parses the request charge header, degrading to zero.
pub fn request_charge(headers: &Headers) -> f64 {
    let Some(raw) = headers.get(headers::REQUEST_CHARGE) else {
        return 0.0;
    };

    match raw.trim().parse::<f64>() {
        Ok(charge) if charge.is_finite() => charge,
        _ => {
            tracing::warn!(value = raw, "ignoring malformed request charge header");
            0.0
        }
    }
}

/// Decodes the body into `T`, or `None` when the response has no body.
///
/// # Errors
///
/// Returns [`DocumentDbError::Serialization`](crate::error::DocumentDbError::Serialization)
/// when a body is present but does not match `T`.
pub fn decode_body<T: DeserializeOwned>(response: &RawResponse) -> DocumentDbResult<Option<T>> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&response.body)?))
}

/// A single-resource response: metadata plus the decoded resource, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentResponse<T> {
    pub metadata: ResponseMetadata,
    pub resource: Option<T>,
}

impl<T: DeserializeOwned> DocumentResponse<T> {
    pub fn from_raw(response: RawResponse) -> DocumentDbResult<Self> {
        Ok(Self {
            metadata: ResponseMetadata::from_response(&response),
            resource: decode_body(&response)?,
        })
    }
}

impl<T> DocumentResponse<T> {
    pub fn request_charge(&self) -> f64 {
        self.metadata.request_charge
    }

    /// Takes the decoded resource, discarding the metadata.
    pub fn into_resource(self) -> Option<T> {
        self.resource
    }
}

/// One page of a listing, with the token needed to fetch the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage<T> {
    pub metadata: ResponseMetadata,
    pub items: Vec<T>,
    /// The item count the service reported for this page.
    pub count: u64,
}

impl<T: DeserializeOwned> FeedPage<T> {
    pub fn from_raw(response: RawResponse) -> DocumentDbResult<Self> {
        let metadata = ResponseMetadata::from_response(&response);
        let page = match decode_body::<DocumentFeed<T>>(&response)? {
            Some(feed) => Self {
                count: feed.count,
                items: feed.documents,
                metadata,
            },
            None => Self {
                count: 0,
                items: Vec::new(),
                metadata,
            },
        };
        Ok(page)
    }
}

impl<T> FeedPage<T> {
    /// The token to pass as `continuation` to fetch the next page.
    pub fn continuation(&self) -> Option<&str> {
        self.metadata.continuation.as_deref()
    }

    pub fn request_charge(&self) -> f64 {
        self.metadata.request_charge
    }

    pub fn has_more(&self) -> bool {
        self.metadata.continuation.is_some()
    }
}
