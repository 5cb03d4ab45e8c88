//! HTTP transport for cosmoslayer.
//!
//! This crate provides a `reqwest`-based implementation of the
//! [`Transport`](cosmoslayer_core::transport::Transport) trait for talking to a
//! live account.
//!
//! To use this transport, include the `reqwest` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! cosmoslayer = { version = "x.y.z", features = ["reqwest"] }
//! ```
//!
//! # Authorization
//!
//! Requests are signed through an [`Authorizer`]. [`StaticToken`] covers resource
//! tokens handed out by a broker; master-key signing can be plugged in by
//! implementing the trait.
//!
//! # Example
//!
//! ```ignore
//! use cosmoslayer::{prelude::*, reqwest::{ReqwestTransport, StaticToken}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = ReqwestTransport::builder("https://myaccount.documents.azure.com/".parse()?)
//!         .with_authorizer(StaticToken::new(std::env::var("COSMOS_TOKEN")?))
//!         .build()?;
//!
//!     let client = DocumentClient::new(transport);
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as cosmoslayer_reqwest;

pub mod transport;

pub use transport::{
    Authorizer, ReqwestTransport, ReqwestTransportBuilder, ReqwestTransportError, StaticToken,
};
