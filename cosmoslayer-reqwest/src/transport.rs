//! HTTP transport backed by `reqwest`.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

use cosmoslayer_core::{
    error::{DocumentDbError, DocumentDbResult},
    headers::{self, Headers},
    link::ResourceType,
    request::{Method, Request},
    response::RawResponse,
    transport::Transport,
};

/// REST API version sent when the builder is not told otherwise.
pub const DEFAULT_API_VERSION: &str = "2018-12-31";

const DEFAULT_USER_AGENT: &str = concat!("cosmoslayer/", env!("CARGO_PKG_VERSION"));

/// Failures while configuring a [`ReqwestTransport`].
#[derive(Error, Debug)]
pub enum ReqwestTransportError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("HTTP client initialization error: {0}")]
    Client(#[from] reqwest::Error),
}

impl From<ReqwestTransportError> for DocumentDbError {
    fn from(err: ReqwestTransportError) -> Self {
        DocumentDbError::Transport(err.to_string())
    }
}

/// Produces the `authorization` header for a request.
///
/// `date` is the exact `x-ms-date` value that will be sent, and `link` is the
/// resource link the signature covers. Master-key and resource-token signing both
/// fit behind this hook.
pub trait Authorizer: Send + Sync + fmt::Debug {
    fn authorize(
        &self,
        method: Method,
        resource_type: ResourceType,
        link: &str,
        date: &str,
    ) -> DocumentDbResult<String>;
}

/// An authorizer that sends the same pre-built token on every request.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

impl Authorizer for StaticToken {
    fn authorize(&self, _: Method, _: ResourceType, _: &str, _: &str) -> DocumentDbResult<String> {
        Ok(self.0.clone())
    }
}

/// A [`Transport`] that talks to a live account over HTTPS.
///
/// The transport adds `x-ms-version`, `x-ms-date` and, when an [`Authorizer`] is
/// configured, `authorization`. All other headers come from the request as rendered.
///
/// # Example
///
/// ```ignore
/// use cosmoslayer_reqwest::{ReqwestTransport, StaticToken};
///
/// let transport = ReqwestTransport::builder("https://myaccount.documents.azure.com/".parse()?)
///     .with_authorizer(StaticToken::new(token))
///     .with_timeout(Duration::from_secs(30))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: Url,
    api_version: String,
    authorizer: Option<Arc<dyn Authorizer>>,
}

impl ReqwestTransport {
    pub fn builder(endpoint: Url) -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn url_for(&self, request: &Request) -> DocumentDbResult<Url> {
        self.endpoint
            .join(&request.path())
            .map_err(|e| DocumentDbError::Transport(e.to_string()))
    }

    fn prepare(&self, request: Request, date: &str) -> DocumentDbResult<reqwest::Request> {
        let mut builder = self
            .client
            .request(http_method(request.method), self.url_for(&request)?)
            .header(headers::VERSION, &self.api_version)
            .header(headers::DATE, date);

        if let Some(authorizer) = &self.authorizer {
            let token = authorizer.authorize(
                request.method,
                request.link.resource_type(),
                &request.link.signing_link(),
                date,
            )?;
            builder = builder.header(headers::AUTHORIZATION, token);
        }

        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        builder
            .build()
            .map_err(|e| DocumentDbError::Transport(e.to_string()))
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_version", &self.api_version)
            .field("authorizer", &self.authorizer)
            .finish()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> DocumentDbResult<RawResponse> {
        let date = http_date(Utc::now());
        let prepared = self.prepare(request, &date)?;
        tracing::trace!(url = %prepared.url(), "sending request");

        let response = self
            .client
            .execute(prepared)
            .await
            .map_err(|e| DocumentDbError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let received = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect::<Headers>();
        let body = response
            .bytes()
            .await
            .map_err(|e| DocumentDbError::Transport(e.to_string()))?;

        Ok(RawResponse::new(status, received, body))
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Formats `date` the way the `x-ms-date` header expects (RFC 1123).
pub fn http_date(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Builder for [`ReqwestTransport`] instances.
pub struct ReqwestTransportBuilder {
    endpoint: Url,
    api_version: String,
    timeout: Option<Duration>,
    user_agent: String,
    authorizer: Option<Arc<dyn Authorizer>>,
}

impl ReqwestTransportBuilder {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            authorizer: None,
        }
    }

    /// Overrides the `x-ms-version` sent on every request.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Caps every exchange at `timeout`, independently of any per-call context.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Signs every request through `authorizer`. Without one, no `authorization`
    /// header is sent.
    pub fn with_authorizer(mut self, authorizer: impl Authorizer + 'static) -> Self {
        self.authorizer = Some(Arc::new(authorizer));
        self
    }

    pub fn build(self) -> Result<ReqwestTransport, ReqwestTransportError> {
        let mut endpoint = self.endpoint;
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.cannot_be_a_base() {
            return Err(ReqwestTransportError::InvalidEndpoint(endpoint.to_string()));
        }
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let mut client = reqwest::Client::builder().user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }

        Ok(ReqwestTransport {
            client: client.build()?,
            endpoint,
            api_version: self.api_version,
            authorizer: self.authorizer,
        })
    }
}
