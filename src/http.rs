//! HTTP transport seam.
//!
//! The dispatcher never talks to `reqwest` directly; it hands an
//! [`HttpRequest`] to an injected [`HttpTransport`]. [`ReqwestTransport`]
//! is the default implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;
use crate::link::Parameters;

/// Broker API version requested in the `Accept` header.
pub const API_VERSION: &str = "1.6";

const USER_AGENT: &str = concat!("openshift-api/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP method of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    /// Whether parameters travel in the request body.
    pub fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub params: Parameters,
    /// Overrides the transport's default timeout.
    pub timeout: Option<Duration>,
    /// Send without credentials (used when probing deployed applications).
    pub anonymous: bool,
}

impl HttpRequest {
    /// Create an authenticated request without parameters.
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            params: Parameters::new(),
            timeout: None,
            anonymous: false,
        }
    }

    /// Set the request parameters.
    #[must_use]
    pub fn with_params(mut self, params: Parameters) -> Self {
        self.params = params;
        self
    }

    /// Set a per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Strip credentials from this request.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the broker.
///
/// Implementations must map transport timeouts to
/// [`OpenShiftError::Timeout`](crate::OpenShiftError::Timeout) and must not
/// retry. Non-2xx responses are returned as-is; status checking happens in
/// the dispatcher.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Credentials presented to the broker.
#[derive(Clone, Default)]
pub enum Credentials {
    Basic { user: String, password: String },
    Token(String),
    #[default]
    None,
}

impl Credentials {
    /// Basic authentication.
    pub fn basic(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Bearer token authentication.
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .finish_non_exhaustive(),
            Self::Token(_) => f.write_str("Token(..)"),
            Self::None => f.write_str("None"),
        }
    }
}

/// Default transport backed by `reqwest`.
///
/// Cheaply cloneable; clones share the connection pool.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
    credentials: Credentials,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Create a transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_timeout(credentials, DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_timeout(credentials: Credentials, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(timeout)
            .build()?;

        Ok(Self { http, credentials })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .http
            .request(request.method.into(), request.url.clone())
            .header(ACCEPT, format!("application/json; version={API_VERSION}"));

        if !request.anonymous {
            builder = match &self.credentials {
                Credentials::Basic { user, password } => builder.basic_auth(user, Some(password)),
                Credentials::Token(token) => builder.bearer_auth(token),
                Credentials::None => builder,
            };
        }

        if request.method.has_body() {
            builder = builder.json(&request.params);
        } else if !request.params.is_empty() {
            builder = builder.query(&request.params.to_query_pairs());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(status, "received response");

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_link_json() {
        let method: HttpMethod = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(method, HttpMethod::Delete);
        assert!(!method.has_body());
        assert!(HttpMethod::Put.has_body());
    }

    #[test]
    fn test_transport_debug_hides_secrets() {
        let transport = ReqwestTransport::new(Credentials::basic("alice", "s3cret")).unwrap();
        let debug = format!("{transport:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("s3cret"));

        let transport = ReqwestTransport::new(Credentials::token("tok-123")).unwrap();
        assert!(!format!("{transport:?}").contains("tok-123"));
    }

    #[test]
    fn test_response_success_range() {
        let ok = HttpResponse { status: 204, body: String::new() };
        let err = HttpResponse { status: 422, body: String::new() };
        assert!(ok.is_success());
        assert!(!err.is_success());
    }
}
