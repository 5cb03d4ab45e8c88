//! In-memory transport for cosmoslayer.
//!
//! This crate provides a [`Transport`](cosmoslayer_core::transport::Transport)
//! that never touches the network. It records every request it receives and
//! answers from a script, which makes it the transport of choice for tests and
//! for developing against the client without an account.
//!
//! # Features
//!
//! - **Request recording** - Inspect the exact method, link, headers and body sent
//! - **Scripted responses** - Queue responses up front or answer through a handler
//! - **Latency injection** - Delay responses to exercise cancellation and timeouts
//!
//! # Quick Start
//!
//! ```ignore
//! use cosmoslayer::{prelude::*, memory::MemoryTransport};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = MemoryTransport::new();
//!     transport.push_json(200, Headers::new(), json!({ "id": "a", "n": 1 })).await;
//!
//!     let client = DocumentClient::new(transport.clone());
//!     let doc = client
//!         .get_document::<serde_json::Value>(&Context::new(), "db", "col", "a", None)
//!         .await?;
//!
//!     println!("{:?}", doc.resource);
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as cosmoslayer_memory;

pub mod transport;

pub use transport::{MemoryTransport, MemoryTransportBuilder};
