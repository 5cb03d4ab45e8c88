//! Error types and result types for document database operations.
//!
//! Every fallible call in this crate returns [`DocumentDbResult<T>`]. Errors that
//! happen while turning options or names into wire format are grouped under
//! [`EncodingError`] and always surface before any network traffic.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Failures while rendering a request to its wire representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The partition key value has a shape the service cannot route on.
    #[error("Unsupported partition key type: {0}")]
    UnsupportedKeyType(String),
    /// A database, collection or item name was empty.
    /// The argument names the kind of resource that was missing a name.
    #[error("Empty {0} name")]
    EmptyResourceName(&'static str),
    /// A name was `.` or `..`, which URL resolution would collapse into a
    /// different resource.
    #[error("Reserved {0} name: {1:?}")]
    ReservedResourceName(&'static str, String),
    /// A resource link could not be decoded back into its components.
    #[error("Malformed resource link: {0}")]
    MalformedLink(String),
}

/// Represents all possible errors that can occur when talking to the document service.
#[derive(Error, Debug)]
pub enum DocumentDbError {
    /// An option set, partition key or resource name could not be rendered.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),
    /// A request body or response destination could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The transport collaborator failed to complete the exchange.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The caller's cancellation token fired before the response arrived.
    #[error("Request cancelled")]
    Cancelled,
    /// The per-call timeout elapsed before the response arrived.
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),
    /// The service answered with a non-success status code.
    #[error("Service returned status {status}: {body}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Raw error body as returned by the service.
        body: String,
    },
    /// The operation has no encoding in this client.
    #[error("Operation not implemented: {0}")]
    NotImplemented(&'static str),
}

impl DocumentDbError {
    /// Returns the remote status code, if the error came from the service.
    pub fn status(&self) -> Option<u16> {
        match self {
            DocumentDbError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the service reported that the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether the call was abandoned because of cancellation or timeout.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DocumentDbError::Cancelled | DocumentDbError::Timeout(_))
    }
}

/// A specialized `Result` type for document database operations.
pub type DocumentDbResult<T> = Result<T, DocumentDbError>;

impl From<SerdeJsonError> for DocumentDbError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentDbError::Serialization(err.to_string())
    }
}
