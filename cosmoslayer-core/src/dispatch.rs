//! Request dispatch under a caller-supplied cancellation context.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    error::{DocumentDbError, DocumentDbResult},
    request::Request,
    response::{RawResponse, request_charge},
    transport::Transport,
};

/// Per-call cancellation and timeout.
///
/// Every client operation takes a `Context`. Cancelling its token, or letting
/// its timeout elapse, abandons the in-flight request.
///
/// # Example
///
/// ```ignore
/// let token = CancellationToken::new();
/// let context = Context::new()
///     .with_cancellation(token.child_token())
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancellation: CancellationToken,
    timeout: Option<Duration>,
}

impl Context {
    /// A context that never cancels and has no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the call when `token` fires. Child tokens let one parent cancel many calls.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Fails the call with [`Timeout`](crate::error::DocumentDbError::Timeout) once
    /// `timeout` has elapsed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns `true` once the token has fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// Sends `request` through `transport` and checks the status.
///
/// Headers and body are passed to the transport untouched.
///
/// # Errors
///
/// - [`DocumentDbError::Cancelled`] if the context is cancelled before or during the call
/// - [`DocumentDbError::Timeout`] if the context's timeout elapses first
/// - [`DocumentDbError::Remote`] for any status other than 2xx or 304
/// - whatever the transport itself reports
pub async fn dispatch<T>(
    transport: &T,
    request: Request,
    context: &Context,
) -> DocumentDbResult<RawResponse>
where
    T: Transport + ?Sized,
{
    if context.is_cancelled() {
        return Err(DocumentDbError::Cancelled);
    }

    let method = request.method;
    let path = request.path();
    tracing::trace!(%method, %path, headers = request.headers.len(), "dispatching request");

    let exchange = async {
        match context.timeout {
            Some(limit) => match tokio::time::timeout(limit, transport.send(request)).await {
                Ok(result) => result,
                Err(_) => Err(DocumentDbError::Timeout(limit)),
            },
            None => transport.send(request).await,
        }
    };

    let response = tokio::select! {
        biased;
        _ = context.cancellation.cancelled() => Err(DocumentDbError::Cancelled),
        result = exchange => result,
    };

    let response = match response {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(%method, %path, error = %err, "request failed");
            return Err(err);
        }
    };

    tracing::debug!(
        %method,
        %path,
        status = response.status,
        request_charge = request_charge(&response.headers),
        "request completed"
    );

    if !response.is_success() {
        return Err(DocumentDbError::Remote {
            status: response.status,
            body: response.body_text(),
        });
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{headers::Headers, link::ResourceLink, request::Method};
    use async_trait::async_trait;
    use std::time::Instant;

    #[derive(Debug)]
    struct Fixed {
        status: u16,
        delay: Duration,
    }

    #[async_trait]
    impl Transport for Fixed {
        async fn send(&self, _request: Request) -> DocumentDbResult<RawResponse> {
            tokio::time::sleep(self.delay).await;
            Ok(RawResponse::new(self.status, Headers::new(), b"{\"code\":\"NotFound\"}".to_vec()))
        }
    }

    fn request() -> Request {
        Request::new(Method::Get, ResourceLink::document("db", "col", "a").unwrap())
    }

    #[tokio::test]
    async fn non_success_statuses_become_remote_errors() {
        let transport = Fixed { status: 404, delay: Duration::ZERO };
        let err = dispatch(&transport, request(), &Context::new()).await.unwrap_err();
        match err {
            DocumentDbError::Remote { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("NotFound"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn already_cancelled_contexts_never_reach_the_transport() {
        let token = CancellationToken::new();
        token.cancel();
        let transport = Fixed { status: 200, delay: Duration::from_secs(30) };
        let context = Context::new().with_cancellation(token);

        let started = Instant::now();
        let err = dispatch(&transport, request(), &context).await.unwrap_err();
        assert!(matches!(err, DocumentDbError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn cancellation_during_the_call_returns_promptly() {
        let token = CancellationToken::new();
        let transport = Fixed { status: 200, delay: Duration::from_secs(30) };
        let context = Context::new().with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let started = Instant::now();
        let err = dispatch(&transport, request(), &context).await.unwrap_err();
        assert!(matches!(err, DocumentDbError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn timeouts_are_reported() {
        let transport = Fixed { status: 200, delay: Duration::from_secs(30) };
        let context = Context::new().with_timeout(Duration::from_millis(10));
        let err = dispatch(&transport, request(), &context).await.unwrap_err();
        assert!(matches!(err, DocumentDbError::Timeout(_)));
        assert!(err.is_cancelled());
    }
}
