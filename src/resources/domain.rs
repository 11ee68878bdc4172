//! Domain resource.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::cartridge::NewApplication;
use crate::error::{OpenShiftError, Result};
use crate::link::{Links, Parameters};
use crate::messages::Messages;
use crate::models::{ApplicationDto, DomainDto};
use crate::resources::application::ApplicationResource;
use crate::service::{Envelope, RestService};
use crate::traits::{Refresh, Resource};

const LINK_GET: &str = "GET";
const LINK_UPDATE: &str = "UPDATE";
const LINK_DELETE: &str = "DELETE";
const LINK_LIST_APPLICATIONS: &str = "LIST_APPLICATIONS";
const LINK_ADD_APPLICATION: &str = "ADD_APPLICATION";

const PARAMETER_GEAR_SIZE: &str = "gear_size";

/// A domain (namespace) owning applications.
#[derive(Debug, Clone)]
pub struct DomainResource {
    service: RestService,
    id: String,
    suffix: Option<String>,
    creation_time: Option<DateTime<Utc>>,
    links: Links,
    messages: Messages,
    applications: Option<Vec<ApplicationResource>>,
}

impl DomainResource {
    pub(crate) fn from_dto(service: RestService, dto: DomainDto, messages: Messages) -> Self {
        Self {
            service,
            id: dto.id,
            suffix: dto.suffix,
            creation_time: dto.creation_time,
            links: dto.links,
            messages,
            applications: None,
        }
    }

    fn apply(&mut self, dto: DomainDto, messages: Messages) {
        self.id = dto.id;
        self.suffix = dto.suffix;
        self.creation_time = dto.creation_time;
        self.links = dto.links;
        self.messages = messages;
    }

    /// The namespace.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn creation_time(&self) -> Option<DateTime<Utc>> {
        self.creation_time
    }

    /// Change the namespace.
    ///
    /// The server refuses while the domain still has applications.
    #[tracing::instrument(skip(self), fields(domain = %self.id))]
    pub async fn rename(&mut self, new_id: &str) -> Result<()> {
        let params = Parameters::new().with("name", new_id);
        let envelope: Envelope<DomainDto> = self.call(LINK_UPDATE, params).await?;
        self.apply(envelope.data, envelope.messages);
        // applications carry the old namespace in their links
        self.applications = None;
        Ok(())
    }

    /// Delete the domain on the server.
    ///
    /// Without `force` the server refuses to delete a domain that still has
    /// applications and answers with exit code 128. Use
    /// [`UserResource::destroy_domain`](crate::UserResource::destroy_domain)
    /// to also drop it from the user's list.
    #[tracing::instrument(skip(self), fields(domain = %self.id))]
    pub async fn destroy(&self, force: bool) -> Result<Messages> {
        let params = Parameters::new().with_opt("force", force.then_some(true));
        self.call_messages(LINK_DELETE, params).await
    }

    async fn load_applications(&self) -> Result<Vec<ApplicationResource>> {
        let envelope: Envelope<Vec<ApplicationDto>> =
            self.call(LINK_LIST_APPLICATIONS, Parameters::new()).await?;
        envelope
            .data
            .into_iter()
            .map(|dto| ApplicationResource::from_dto(self.service.clone(), dto, Messages::new()))
            .collect()
    }

    async fn loaded_applications(&mut self) -> Result<&mut Vec<ApplicationResource>> {
        if self.applications.is_none() {
            let applications = self.load_applications().await?;
            self.applications = Some(applications);
        }
        Ok(self.applications.get_or_insert_with(Vec::new))
    }

    /// Applications of the domain, loaded on first access.
    pub async fn applications(&mut self) -> Result<&[ApplicationResource]> {
        Ok(self.loaded_applications().await?.as_slice())
    }

    /// Look up an application by name, ignoring case.
    pub async fn application(&mut self, name: &str) -> Result<Option<&ApplicationResource>> {
        Ok(self
            .loaded_applications()
            .await?
            .iter()
            .find(|a| a.name().eq_ignore_ascii_case(name)))
    }

    /// Mutable lookup of an application by name, ignoring case.
    pub async fn application_mut(&mut self, name: &str) -> Result<Option<&mut ApplicationResource>> {
        Ok(self
            .loaded_applications()
            .await?
            .iter_mut()
            .find(|a| a.name().eq_ignore_ascii_case(name)))
    }

    pub async fn has_application(&mut self, name: &str) -> Result<bool> {
        Ok(self.application(name).await?.is_some())
    }

    /// Create an application and add it to this domain.
    ///
    /// Name clashes are decided by the server, which compares names
    /// case-insensitively and answers with an endpoint error.
    #[tracing::instrument(skip(self, application), fields(domain = %self.id, application = %application.name()))]
    pub async fn create_application(
        &mut self,
        application: NewApplication,
    ) -> Result<&mut ApplicationResource> {
        let params = application.to_parameters()?;
        // load first so the new application is not listed twice
        self.loaded_applications().await?;

        let link = self.link(LINK_ADD_APPLICATION)?;
        let envelope: Envelope<ApplicationDto> = self
            .service
            .request(link, &params, application.request_timeout())
            .await?;
        let created =
            ApplicationResource::from_dto(self.service.clone(), envelope.data, envelope.messages)?;

        let applications = self.loaded_applications().await?;
        applications.push(created);
        let index = applications.len() - 1;
        Ok(&mut applications[index])
    }

    /// Destroy an application on the server and drop it from this domain.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::NotFound`] if the domain has no such
    /// application.
    #[tracing::instrument(skip(self), fields(domain = %self.id))]
    pub async fn destroy_application(&mut self, name: &str) -> Result<Messages> {
        let applications = self.loaded_applications().await?;
        let index = applications
            .iter()
            .position(|a| a.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| OpenShiftError::NotFound {
                entity_type: ApplicationResource::KIND,
                id: name.to_string(),
            })?;
        let messages = applications[index].destroy().await?;
        applications.remove(index);
        Ok(messages)
    }

    /// Gear profiles the server accepts for new applications.
    pub fn available_gear_profiles(&self) -> Vec<String> {
        self.links
            .get(LINK_ADD_APPLICATION)
            .map(|link| link.valid_options(PARAMETER_GEAR_SIZE))
            .unwrap_or_default()
    }
}

impl PartialEq for DomainResource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DomainResource {}

impl Resource for DomainResource {
    const KIND: &'static str = "domain";

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
impl Refresh for DomainResource {
    #[tracing::instrument(skip(self), fields(domain = %self.id))]
    async fn refresh(&mut self) -> Result<()> {
        let envelope: Envelope<DomainDto> = self
            .call(LINK_GET, Parameters::new())
            .await
            .map_err(|e| e.not_found_as(Self::KIND, &self.id))?;
        self.apply(envelope.data, envelope.messages);
        if self.applications.is_some() {
            let applications = self.load_applications().await?;
            self.applications = Some(applications);
        }
        Ok(())
    }
}
