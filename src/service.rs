//! Link-following request dispatcher.
//!
//! [`RestService`] turns a [`Link`] plus [`Parameters`] into an HTTP request,
//! sends it through the injected transport, checks the status and unwraps
//! the broker's response envelope.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{OpenShiftError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::link::{Link, Parameters};
use crate::messages::Messages;
use crate::models::RestResponse;

/// Data of a successful response together with the server's messages.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub data: T,
    pub messages: Messages,
}

/// Dispatches link requests through an [`HttpTransport`].
///
/// Cheaply cloneable; every resource keeps a clone.
#[derive(Clone)]
pub struct RestService {
    transport: Arc<dyn HttpTransport>,
    base_url: Arc<Url>,
}

impl fmt::Debug for RestService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestService")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestService {
    /// Create a dispatcher for the given REST base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Ok(Self {
            transport,
            base_url: Arc::new(Url::parse(&base_url_str)?),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch a path relative to the base URL.
    #[tracing::instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        let url = self.base_url.join(path)?;
        let request = HttpRequest::new(HttpMethod::Get, url);
        let response = self.send(request).await?;
        Self::unwrap_data(response)
    }

    /// Follow a link and parse the response data.
    ///
    /// # Errors
    ///
    /// Fails with [`OpenShiftError::InvalidRequest`] before any I/O if the
    /// parameters don't match the link, with [`OpenShiftError::Endpoint`] on a
    /// non-2xx status and with [`OpenShiftError::InvalidResponse`] if the
    /// response has no data.
    #[tracing::instrument(skip(self, link, params), fields(method = %link.method, href = %link.href))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        link: &Link,
        params: &Parameters,
        timeout: Option<Duration>,
    ) -> Result<Envelope<T>> {
        let request = self.build(link, params, timeout)?;
        let response = self.send(request).await?;
        Self::unwrap_data(response)
    }

    /// Follow a link whose response carries no data (e.g. deletes).
    #[tracing::instrument(skip(self, link, params), fields(method = %link.method, href = %link.href))]
    pub async fn request_messages(
        &self,
        link: &Link,
        params: &Parameters,
        timeout: Option<Duration>,
    ) -> Result<Messages> {
        let request = self.build(link, params, timeout)?;
        let response = self.send(request).await?;
        if response.body.trim().is_empty() {
            return Ok(Messages::new());
        }
        let parsed: RestResponse<serde_json::Value> = serde_json::from_str(&response.body)?;
        Ok(parsed.messages)
    }

    /// Send a request through the transport without status checks.
    pub async fn execute_raw(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.transport.execute(request).await
    }

    fn build(&self, link: &Link, params: &Parameters, timeout: Option<Duration>) -> Result<HttpRequest> {
        link.validate(params)?;
        let url = self.base_url.join(&link.href)?;
        Ok(HttpRequest::new(link.method, url)
            .with_params(params.clone())
            .with_timeout(timeout))
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.to_string();
        let response = self.transport.execute(request).await?;
        tracing::debug!(%method, %url, status = response.status, "broker response");

        if response.is_success() {
            return Ok(response);
        }

        let messages = serde_json::from_str::<RestResponse<serde_json::Value>>(&response.body)
            .map(|parsed| parsed.messages)
            .unwrap_or_default();

        Err(OpenShiftError::Endpoint {
            method,
            url,
            status: response.status,
            messages,
            body: response.body,
        })
    }

    fn unwrap_data<T: DeserializeOwned>(response: HttpResponse) -> Result<Envelope<T>> {
        let parsed: RestResponse<T> = serde_json::from_str(&response.body)?;
        let data = parsed.data.ok_or_else(|| {
            OpenShiftError::InvalidResponse(format!(
                "response of type {} has no data",
                parsed.data_type.as_deref().unwrap_or("<unknown>")
            ))
        })?;
        Ok(Envelope {
            data,
            messages: parsed.messages,
        })
    }
}
