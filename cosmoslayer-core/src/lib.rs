//! A typed access layer over the document database REST API.
//!
//! This crate is the core of the cosmoslayer project and provides:
//!
//! - **Resource addressing** ([`link`]) - Validated, injective resource links
//! - **Partition keys** ([`partition_key`]) - Typed values and their header encoding
//! - **Option sets** ([`options`]) - Per-operation options rendered into request headers
//! - **Requests and responses** ([`request`], [`response`]) - Wire model and metadata parsing
//! - **Transport abstraction** ([`transport`]) - The seam to whatever carries HTTP
//! - **Dispatch** ([`dispatch`]) - Cancellation and timeout around a single exchange
//! - **Client** ([`client`]) - Document and stored procedure operations
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use cosmoslayer_core::{client::DocumentClient, dispatch::Context, options::GetDocumentOptions};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Order {
//!     pub id: String,
//!     pub total: f64,
//! }
//!
//! let client = DocumentClient::new(transport);
//! let response = client
//!     .get_document::<Order>(
//!         &Context::new(),
//!         "shop",
//!         "orders",
//!         "order-1",
//!         Some(GetDocumentOptions::default().with_partition_key("customer-1")),
//!     )
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as cosmoslayer_core;

pub mod client;
pub mod dispatch;
pub mod error;
pub mod headers;
pub mod link;
pub mod models;
pub mod options;
pub mod partition_key;
pub mod request;
pub mod response;
pub mod transport;
