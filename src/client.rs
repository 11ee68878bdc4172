//! OpenShift API client.
//!
//! Entry point of the library. Fetches the API root, whose links lead to
//! the user, the domains and the cartridge catalog. Everything else is
//! reached by following links on resources.

use std::env;
use std::sync::Arc;

use tokio::sync::OnceCell;
use url::Url;

use crate::error::{OpenShiftError, Result};
use crate::http::{Credentials, HttpTransport, ReqwestTransport};
use crate::link::{Links, Parameters};
use crate::models::{CartridgeDto, UserDto};
use crate::resources::UserResource;
use crate::service::{Envelope, RestService};

const DEFAULT_API_URL: &str = "https://openshift.redhat.com/broker/rest";
const API_PATH: &str = "api";
const LINK_GET_USER: &str = "GET_USER";
const LINK_LIST_CARTRIDGES: &str = "LIST_CARTRIDGES";

/// OpenShift broker client.
///
/// This struct is cheaply cloneable; clones share the transport and the
/// cached API root links.
///
/// # Example
///
/// ```no_run
/// use openshift_api::{Credentials, OpenShiftClient};
///
/// # async fn example() -> openshift_api::Result<()> {
/// // Create from environment variables
/// let client = OpenShiftClient::from_env()?;
///
/// // Or configure manually
/// let client = OpenShiftClient::new(
///     "https://openshift.redhat.com/broker/rest",
///     Credentials::basic("user@example.com", "secret"),
/// )?;
/// let mut user = client.user().await?;
/// let count = user.domains().await?.len();
/// println!("{} owns {} domains", user.login(), count);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OpenShiftClient {
    service: RestService,
    api_links: Arc<OnceCell<Arc<Links>>>,
}

impl std::fmt::Debug for OpenShiftClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenShiftClient")
            .field("base_url", &self.service.base_url().as_str())
            .finish_non_exhaustive()
    }
}

impl OpenShiftClient {
    /// Create a client from environment variables.
    ///
    /// Uses `OPENSHIFT_TOKEN` for bearer authentication, or
    /// `OPENSHIFT_USER` and `OPENSHIFT_PASSWORD` for basic authentication.
    /// `OPENSHIFT_API_URL` optionally overrides the REST base URL (defaults
    /// to `https://openshift.redhat.com/broker/rest`).
    ///
    /// # Errors
    ///
    /// Returns an error if no credentials are configured.
    pub fn from_env() -> Result<Self> {
        let credentials = credentials_from(|name| env::var(name).ok())?;
        let api_url = env::var("OPENSHIFT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&api_url, credentials)
    }

    /// Create a client with the default `reqwest` transport.
    ///
    /// # Arguments
    ///
    /// * `api_url` - REST base URL (e.g. `https://openshift.redhat.com/broker/rest`)
    /// * `credentials` - Credentials presented on every request
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(api_url: &str, credentials: Credentials) -> Result<Self> {
        let transport = ReqwestTransport::new(credentials)?;
        Self::with_transport(api_url, Arc::new(transport))
    }

    /// Create a client that sends requests through the given transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_transport(api_url: &str, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            service: RestService::new(transport, api_url)?,
            api_links: Arc::new(OnceCell::new()),
        })
    }

    /// Get the REST base URL.
    pub fn base_url(&self) -> &Url {
        self.service.base_url()
    }

    /// The dispatcher shared by all resources of this client.
    pub fn service(&self) -> &RestService {
        &self.service
    }

    /// Links of the API root, fetched once per client.
    #[tracing::instrument(skip(self))]
    pub async fn api_links(&self) -> Result<Arc<Links>> {
        let links = self
            .api_links
            .get_or_try_init(|| async {
                let envelope: Envelope<Links> = self.service.get(API_PATH).await?;
                Ok::<_, OpenShiftError>(Arc::new(envelope.data))
            })
            .await?;
        Ok(Arc::clone(links))
    }

    async fn api_link(&self, rel: &str) -> Result<(Arc<Links>, crate::link::Link)> {
        let links = self.api_links().await?;
        let link = links
            .get(rel)
            .cloned()
            .ok_or_else(|| OpenShiftError::UnsupportedOperation {
                resource: "api",
                operation: rel.to_string(),
            })?;
        Ok((links, link))
    }

    /// Fetch the authenticated user.
    #[tracing::instrument(skip(self))]
    pub async fn user(&self) -> Result<UserResource> {
        let (links, link) = self.api_link(LINK_GET_USER).await?;
        let envelope: Envelope<UserDto> = self.service.request(&link, &Parameters::new(), None).await?;
        Ok(UserResource::from_dto(
            self.service.clone(),
            links,
            envelope.data,
            envelope.messages,
        ))
    }

    /// Fetch the cartridge catalog.
    #[tracing::instrument(skip(self))]
    pub async fn cartridges(&self) -> Result<Vec<CartridgeDto>> {
        let (_, link) = self.api_link(LINK_LIST_CARTRIDGES).await?;
        let envelope: Envelope<Vec<CartridgeDto>> =
            self.service.request(&link, &Parameters::new(), None).await?;
        Ok(envelope.data)
    }
}

/// Resolve credentials from a variable lookup.
fn credentials_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Credentials> {
    if let Some(token) = lookup("OPENSHIFT_TOKEN").filter(|t| !t.is_empty()) {
        return Ok(Credentials::token(token));
    }
    match (lookup("OPENSHIFT_USER"), lookup("OPENSHIFT_PASSWORD")) {
        (Some(user), Some(password)) => Ok(Credentials::basic(user, password)),
        _ => Err(OpenShiftError::ConfigMissing(
            "set OPENSHIFT_TOKEN, or OPENSHIFT_USER and OPENSHIFT_PASSWORD".to_string(),
        )),
    }
}
