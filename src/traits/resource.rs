//! Resource trait for link-bearing entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{OpenShiftError, Result};
use crate::link::{Link, Links, Parameters};
use crate::messages::Messages;
use crate::service::{Envelope, RestService};

/// A client-side proxy for a server entity that carries links.
///
/// Implementors only expose their cached state; link lookup and dispatch
/// come for free. Looking up a link the server did not send fails with
/// [`OpenShiftError::UnsupportedOperation`].
///
/// # Example
///
/// ```ignore
/// use openshift_api::{OpenShiftClient, Resource};
///
/// let client = OpenShiftClient::from_env()?;
/// let mut user = client.user().await?;
/// let domain = user.default_domain().await?.unwrap();
/// if domain.supports("DELETE") {
///     domain.destroy(false).await?;
/// }
/// ```
#[async_trait]
pub trait Resource: Send + Sync {
    /// Entity name used in errors (e.g. `"domain"`).
    const KIND: &'static str;

    /// The dispatcher this resource sends requests through.
    fn service(&self) -> &RestService;

    /// Links the server sent with the last response.
    fn links(&self) -> &Links;

    /// Messages the server sent with the last response.
    fn messages(&self) -> &Messages;

    /// Whether the server currently permits the operation.
    fn supports(&self, rel: &str) -> bool {
        self.links().contains_key(rel)
    }

    /// Look up a link by relation name.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::UnsupportedOperation`] if the link is absent.
    fn link(&self, rel: &str) -> Result<&Link> {
        self.links()
            .get(rel)
            .ok_or_else(|| OpenShiftError::UnsupportedOperation {
                resource: Self::KIND,
                operation: rel.to_string(),
            })
    }

    /// Follow a link and parse the response data.
    async fn call<T>(&self, rel: &str, params: Parameters) -> Result<Envelope<T>>
    where
        T: DeserializeOwned + Send,
    {
        let link = self.link(rel)?;
        self.service().request(link, &params, None).await
    }

    /// Follow a link whose response carries no data.
    async fn call_messages(&self, rel: &str, params: Parameters) -> Result<Messages> {
        let link = self.link(rel)?;
        self.service().request_messages(link, &params, None).await
    }
}
