//! Convenient re-exports of commonly used types from cosmoslayer.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use cosmoslayer::prelude::*;
//! ```
//!
//! This provides access to:
//! - The client and its dispatch context
//! - Option sets and partition key values
//! - Response and resource types
//! - The transport trait and error types

pub use cosmoslayer_core::{
    client::DocumentClient,
    dispatch::Context,
    error::{DocumentDbError, DocumentDbResult, EncodingError},
    headers::Headers,
    link::{ResourceLink, ResourceType},
    models::{PatchOperation, PatchOperationType, Resource, StoredProcedure, StoredProcedures},
    options::{
        AsHeaders, ConsistencyLevel, CreateDocumentOptions, DeleteDocumentOptions,
        ExecuteStoredProcedureOptions, GetDocumentOptions, IndexingDirective, ListDocumentOptions,
        PatchDocumentOptions, QueryDocumentsOptions, ReplaceDocumentOptions, UpsertDocumentOptions,
    },
    partition_key::PartitionKeyValue,
    request::{Method, Request},
    response::{DocumentResponse, FeedPage, RawResponse, ResponseMetadata},
    transport::Transport,
};
pub use tokio_util::sync::CancellationToken;
