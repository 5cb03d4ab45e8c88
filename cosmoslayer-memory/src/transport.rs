//! Recording transport with scripted responses.
//!
//! Every request sent through a [`MemoryTransport`] is recorded, then answered
//! with the next scripted response. When the script runs dry the fallback
//! handler answers instead; without one the transport replies `404`.

use std::{collections::VecDeque, fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use mea::rwlock::RwLock;
use serde_json::Value;

use cosmoslayer_core::{
    error::DocumentDbResult,
    headers::{self, Headers},
    request::{JSON, Request},
    response::RawResponse,
    transport::Transport,
};

type Handler = Arc<dyn Fn(&Request) -> RawResponse + Send + Sync>;

#[derive(Default)]
struct State {
    requests: Vec<Request>,
    script: VecDeque<RawResponse>,
}

/// An in-process [`Transport`] for tests and offline development.
///
/// `MemoryTransport` is cloneable; clones share the same recorded requests and
/// response script, so a test can keep one handle while the client owns another.
///
/// # Example
///
/// ```ignore
/// use cosmoslayer_memory::MemoryTransport;
/// use serde_json::json;
///
/// let transport = MemoryTransport::new();
/// transport.push_json(201, Headers::new(), json!({ "id": "a" })).await;
///
/// let client = DocumentClient::new(transport.clone());
/// client.create_document(&Context::new(), "db", "col", &json!({ "id": "a" }), None).await?;
///
/// assert_eq!(transport.requests().await.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MemoryTransport {
    state: Arc<RwLock<State>>,
    latency: Option<Duration>,
    fallback: Option<Handler>,
}

impl MemoryTransport {
    /// Creates a transport with an empty script and no latency.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> MemoryTransportBuilder {
        MemoryTransportBuilder::default()
    }

    /// Appends a response to the script.
    pub async fn push_response(&self, response: RawResponse) {
        self.state.write().await.script.push_back(response);
    }

    /// Appends a response with a JSON body to the script.
    pub async fn push_json(&self, status: u16, mut headers: Headers, body: Value) {
        headers.insert(headers::CONTENT_TYPE, JSON);
        self.push_response(RawResponse::new(status, headers, body.to_string()))
            .await;
    }

    /// Appends a response with no body to the script.
    pub async fn push_empty(&self, status: u16, headers: Headers) {
        self.push_response(RawResponse::new(status, headers, Vec::new()))
            .await;
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<Request> {
        self.state.read().await.requests.clone()
    }

    pub async fn last_request(&self) -> Option<Request> {
        self.state.read().await.requests.last().cloned()
    }

    /// Number of scripted responses not yet consumed.
    pub async fn pending(&self) -> usize {
        self.state.read().await.script.len()
    }

    /// Forgets recorded requests and drops any remaining script.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.requests.clear();
        state.script.clear();
    }
}

impl fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("latency", &self.latency)
            .field("fallback", &self.fallback.is_some())
            .finish_non_exhaustive()
    }
}

fn not_found() -> RawResponse {
    let body = serde_json::json!({
        "code": "NotFound",
        "message": "No scripted response for this request",
    });
    RawResponse::new(404, Headers::new(), body.to_string())
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: Request) -> DocumentDbResult<RawResponse> {
        let scripted = {
            let mut state = self.state.write().await;
            state.requests.push(request.clone());
            state.script.pop_front()
        };

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let response = match (scripted, &self.fallback) {
            (Some(response), _) => response,
            (None, Some(handler)) => handler(&request),
            (None, None) => not_found(),
        };

        tracing::trace!(
            method = %request.method,
            path = %request.path(),
            status = response.status,
            "memory transport answered"
        );

        Ok(response)
    }
}

/// Builder for [`MemoryTransport`] instances.
///
/// # Example
///
/// ```ignore
/// let transport = MemoryTransport::builder()
///     .with_latency(Duration::from_millis(50))
///     .with_handler(|_| RawResponse::new(204, Headers::new(), Vec::new()))
///     .build();
/// ```
#[derive(Default)]
pub struct MemoryTransportBuilder {
    latency: Option<Duration>,
    fallback: Option<Handler>,
    script: VecDeque<RawResponse>,
}

impl MemoryTransportBuilder {
    /// Delays every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Answers requests the script does not cover.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Request) -> RawResponse + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(handler));
        self
    }

    pub fn with_response(mut self, response: RawResponse) -> Self {
        self.script.push_back(response);
        self
    }

    pub fn build(self) -> MemoryTransport {
        MemoryTransport {
            state: Arc::new(RwLock::new(State {
                requests: Vec::new(),
                script: self.script,
            })),
            latency: self.latency,
            fallback: self.fallback,
        }
    }
}
