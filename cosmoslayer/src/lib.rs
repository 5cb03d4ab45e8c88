//! Main cosmoslayer crate providing typed access to the document database REST API.
//!
//! This crate is the primary entry point for users of the cosmoslayer framework.
//! It re-exports the core types and functionality from the sub-crates and provides
//! convenient access to the available transports.
//!
//! # Features
//!
//! - **Typed options** - Per-operation option sets rendered into exactly the headers the service expects
//! - **Safe addressing** - Resource links and partition keys that always encode unambiguously
//! - **Cancellable calls** - Every operation takes a context carrying a cancellation token and timeout
//! - **Pluggable transports** - In-memory for tests, `reqwest` for live accounts
//!
//! # Quick Start
//!
//! ```ignore
//! use cosmoslayer::{prelude::*, memory::MemoryTransport};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Order {
//!     pub id: String,
//!     pub customer: String,
//!     pub total: f64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> DocumentDbResult<()> {
//!     let client = DocumentClient::new(MemoryTransport::new());
//!     let context = Context::new().with_timeout(std::time::Duration::from_secs(5));
//!
//!     let order = Order { id: "o-1".into(), customer: "c-1".into(), total: 12.5 };
//!     client
//!         .create_document(
//!             &context,
//!             "shop",
//!             "orders",
//!             &order,
//!             Some(CreateDocumentOptions::default().with_partition_key(order.customer.as_str())),
//!         )
//!         .await?;
//!
//!     let page = client
//!         .list_documents::<Order>(
//!             &context,
//!             "shop",
//!             "orders",
//!             Some(ListDocumentOptions::default().with_max_item_count(100)),
//!         )
//!         .await?;
//!
//!     println!("{} orders, next page: {:?}", page.items.len(), page.continuation());
//!     Ok(())
//! }
//! ```
//!
//! # Cancellation
//!
//! ```ignore
//! let token = CancellationToken::new();
//! let context = Context::new().with_cancellation(token.clone());
//!
//! // from another task
//! token.cancel();
//!
//! // the in-flight call returns DocumentDbError::Cancelled
//! ```
//!
//! # Transports
//!
//! - [`memory`] - Recording transport with scripted responses for tests and offline work
//! - [`reqwest`] - HTTPS transport for live accounts (requires `reqwest` feature)

pub mod prelude;

pub use cosmoslayer_core::{
    client, dispatch, error, headers, link, models, options, partition_key, request, response,
    transport,
};

// Re-export JSON types for convenience
pub use serde_json;

/// In-memory transport implementations.
pub mod memory {
    pub use cosmoslayer_memory::{MemoryTransport, MemoryTransportBuilder};
}

/// HTTP transport implementations.
///
/// This module is only available when the `reqwest` feature is enabled.
#[cfg(feature = "reqwest")]
pub mod reqwest {
    pub use cosmoslayer_reqwest::{
        Authorizer, ReqwestTransport, ReqwestTransportBuilder, ReqwestTransportError, StaticToken,
    };
}
