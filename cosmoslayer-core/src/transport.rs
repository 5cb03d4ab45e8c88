//! Transport abstraction.
//!
//! The [`Transport`] trait is the seam between this crate and whatever actually
//! moves bytes over the network. A transport receives a fully rendered
//! [`Request`] and returns the [`RawResponse`] the service produced. Status codes
//! are not interpreted at this level, so a `404` is a successful exchange.
//!
//! Implementations must not retry. Cancellation is applied around the returned
//! future by [`dispatch`](crate::dispatch::dispatch), which drops it when the
//! caller gives up; transports should release their connection on drop.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use cosmoslayer_core::{transport::Transport, request::Request, response::RawResponse};
//!
//! #[derive(Debug)]
//! struct AlwaysEmpty;
//!
//! #[async_trait]
//! impl Transport for AlwaysEmpty {
//!     async fn send(&self, _request: Request) -> DocumentDbResult<RawResponse> {
//!         Ok(RawResponse::new(204, Headers::new(), Vec::new()))
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{error::DocumentDbResult, request::Request, response::RawResponse};

/// Moves a rendered request to the service and returns its raw response.
///
/// Failures to complete the exchange (connection refused, TLS, I/O) should be
/// reported as [`DocumentDbError::Transport`](crate::error::DocumentDbError::Transport).
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn send(&self, request: Request) -> DocumentDbResult<RawResponse>;
}

#[async_trait]
impl<T> Transport for &T
where
    T: Transport + ?Sized,
{
    async fn send(&self, request: Request) -> DocumentDbResult<RawResponse> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn send(&self, request: Request) -> DocumentDbResult<RawResponse> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T> Transport for Box<T>
where
    T: Transport + ?Sized,
{
    async fn send(&self, request: Request) -> DocumentDbResult<RawResponse> {
        (**self).send(request).await
    }
}
