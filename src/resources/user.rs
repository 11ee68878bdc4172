//! User resource.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{OpenShiftError, Result};
use crate::link::{Links, Parameters};
use crate::messages::Messages;
use crate::models::{DomainDto, UserDto};
use crate::resources::domain::DomainResource;
use crate::service::{Envelope, RestService};
use crate::traits::{Refresh, Resource};

const LINK_GET_USER: &str = "GET_USER";
const LINK_LIST_DOMAINS: &str = "LIST_DOMAINS";
const LINK_ADD_DOMAIN: &str = "ADD_DOMAIN";

/// The authenticated user and the domains it owns.
///
/// Domain operations follow links of the API root, which the user keeps a
/// copy of.
#[derive(Debug, Clone)]
pub struct UserResource {
    service: RestService,
    api_links: Arc<Links>,
    id: Option<String>,
    login: String,
    consumed_gears: u32,
    max_gears: u32,
    plan_id: Option<String>,
    links: Links,
    messages: Messages,
    domains: Option<Vec<DomainResource>>,
}

impl UserResource {
    pub(crate) fn from_dto(
        service: RestService,
        api_links: Arc<Links>,
        dto: UserDto,
        messages: Messages,
    ) -> Self {
        Self {
            service,
            api_links,
            id: dto.id,
            login: dto.login,
            consumed_gears: dto.consumed_gears,
            max_gears: dto.max_gears,
            plan_id: dto.plan_id,
            links: dto.links,
            messages,
            domains: None,
        }
    }

    fn apply(&mut self, dto: UserDto, messages: Messages) {
        self.id = dto.id;
        self.login = dto.login;
        self.consumed_gears = dto.consumed_gears;
        self.max_gears = dto.max_gears;
        self.plan_id = dto.plan_id;
        self.links = dto.links;
        self.messages = messages;
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn consumed_gears(&self) -> u32 {
        self.consumed_gears
    }

    pub fn max_gears(&self) -> u32 {
        self.max_gears
    }

    pub fn plan_id(&self) -> Option<&str> {
        self.plan_id.as_deref()
    }

    fn api_link(&self, rel: &str) -> Result<&crate::link::Link> {
        self.api_links
            .get(rel)
            .ok_or_else(|| OpenShiftError::UnsupportedOperation {
                resource: "api",
                operation: rel.to_string(),
            })
    }

    async fn load_domains(&self) -> Result<Vec<DomainResource>> {
        let link = self.api_link(LINK_LIST_DOMAINS)?;
        let envelope: Envelope<Vec<DomainDto>> =
            self.service.request(link, &Parameters::new(), None).await?;
        Ok(envelope
            .data
            .into_iter()
            .map(|dto| DomainResource::from_dto(self.service.clone(), dto, Messages::new()))
            .collect())
    }

    async fn loaded_domains(&mut self) -> Result<&mut Vec<DomainResource>> {
        if self.domains.is_none() {
            let domains = self.load_domains().await?;
            self.domains = Some(domains);
        }
        Ok(self.domains.get_or_insert_with(Vec::new))
    }

    /// Domains of the user, loaded on first access.
    pub async fn domains(&mut self) -> Result<&[DomainResource]> {
        Ok(self.loaded_domains().await?.as_slice())
    }

    /// Look up a domain by namespace.
    pub async fn domain(&mut self, id: &str) -> Result<Option<&DomainResource>> {
        Ok(self.loaded_domains().await?.iter().find(|d| d.id() == id))
    }

    /// Mutable lookup of a domain by namespace.
    pub async fn domain_mut(&mut self, id: &str) -> Result<Option<&mut DomainResource>> {
        Ok(self
            .loaded_domains()
            .await?
            .iter_mut()
            .find(|d| d.id() == id))
    }

    /// The first domain, if the user has any.
    pub async fn default_domain(&mut self) -> Result<Option<&mut DomainResource>> {
        Ok(self.loaded_domains().await?.first_mut())
    }

    pub async fn has_domain(&mut self, id: &str) -> Result<bool> {
        Ok(self.domain(id).await?.is_some())
    }

    /// Create a domain and add it to this user.
    #[tracing::instrument(skip(self), fields(login = %self.login))]
    pub async fn create_domain(&mut self, id: &str) -> Result<&mut DomainResource> {
        // load first so the new domain is not listed twice
        self.loaded_domains().await?;

        let link = self.api_link(LINK_ADD_DOMAIN)?;
        let params = Parameters::new().with("name", id);
        let envelope: Envelope<DomainDto> = self.service.request(link, &params, None).await?;
        let created = DomainResource::from_dto(self.service.clone(), envelope.data, envelope.messages);

        let domains = self.loaded_domains().await?;
        domains.push(created);
        let index = domains.len() - 1;
        Ok(&mut domains[index])
    }

    /// Destroy a domain on the server and drop it from this user.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::NotFound`] if the user has no such domain,
    /// and the server's endpoint error (exit code 128) if the domain still
    /// has applications and `force` is not set.
    #[tracing::instrument(skip(self), fields(login = %self.login))]
    pub async fn destroy_domain(&mut self, id: &str, force: bool) -> Result<Messages> {
        let domains = self.loaded_domains().await?;
        let index = domains
            .iter()
            .position(|d| d.id() == id)
            .ok_or_else(|| OpenShiftError::NotFound {
                entity_type: DomainResource::KIND,
                id: id.to_string(),
            })?;
        let messages = domains[index].destroy(force).await?;
        domains.remove(index);
        Ok(messages)
    }
}

impl Resource for UserResource {
    const KIND: &'static str = "user";

    fn service(&self) -> &RestService {
        &self.service
    }

    fn links(&self) -> &Links {
        &self.links
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }
}

#[async_trait]
impl Refresh for UserResource {
    #[tracing::instrument(skip(self), fields(login = %self.login))]
    async fn refresh(&mut self) -> Result<()> {
        let link = self.api_link(LINK_GET_USER)?;
        let envelope: Envelope<UserDto> = self
            .service
            .request(link, &Parameters::new(), None)
            .await
            .map_err(|e| e.not_found_as(Self::KIND, &self.login))?;
        self.apply(envelope.data, envelope.messages);
        if self.domains.is_some() {
            let domains = self.load_domains().await?;
            self.domains = Some(domains);
        }
        Ok(())
    }
}
