//! Application resource.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use url::Url;

use crate::cartridge::{ApplicationScale, CartridgeSpec};
use crate::error::{OpenShiftError, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::link::{Links, Parameters};
use crate::messages::Messages;
use crate::models::{ApplicationDto, CartridgeDto, CartridgeType, GearGroupDto};
use crate::resources::cartridge::{
    Cartridge, EmbeddedCartridgeResource, StandaloneCartridgeResource,
};
use crate::resources::gear_group::GearGroupResource;
use crate::service::{Envelope, RestService};
use crate::traits::{Refresh, Resource};

const LINK_GET: &str = "GET";
const LINK_DELETE: &str = "DELETE";
const LINK_START: &str = "START";
const LINK_STOP: &str = "STOP";
const LINK_FORCE_STOP: &str = "FORCE_STOP";
const LINK_RESTART: &str = "RESTART";
const LINK_SCALE_UP: &str = "SCALE_UP";
const LINK_SCALE_DOWN: &str = "SCALE_DOWN";
const LINK_ADD_ALIAS: &str = "ADD_ALIAS";
const LINK_REMOVE_ALIAS: &str = "REMOVE_ALIAS";
const LINK_LIST_CARTRIDGES: &str = "LIST_CARTRIDGES";
const LINK_ADD_CARTRIDGE: &str = "ADD_CARTRIDGE";
const LINK_GET_GEAR_GROUPS: &str = "GET_GEAR_GROUPS";

/// An application deployed in a domain.
///
/// Cartridges and gear groups are loaded on first access and cached until
/// the application is refreshed.
#[derive(Debug, Clone)]
pub struct ApplicationResource {
    service: RestService,
    name: String,
    uuid: String,
    domain_id: String,
    creation_time: Option<DateTime<Utc>>,
    framework: Option<String>,
    app_url: Option<String>,
    git_url: Option<String>,
    initial_git_url: Option<String>,
    scale: ApplicationScale,
    gear_profile: Option<String>,
    aliases: Vec<String>,
    links: Links,
    messages: Messages,
    cartridges: Option<LoadedCartridges>,
    gear_groups: Option<Vec<GearGroupResource>>,
}

#[derive(Debug, Clone)]
struct LoadedCartridges {
    standalone: Option<StandaloneCartridgeResource>,
    embedded: Vec<EmbeddedCartridgeResource>,
}

impl ApplicationResource {
    pub(crate) fn from_dto(service: RestService, dto: ApplicationDto, messages: Messages) -> Result<Self> {
        let mut application = Self {
            service,
            name: String::new(),
            uuid: String::new(),
            domain_id: String::new(),
            creation_time: None,
            framework: None,
            app_url: None,
            git_url: None,
            initial_git_url: None,
            scale: ApplicationScale::NoScale,
            gear_profile: None,
            aliases: Vec::new(),
            links: Links::new(),
            messages: Messages::new(),
            cartridges: None,
            gear_groups: None,
        };
        application.apply(dto, messages)?;
        Ok(application)
    }

    /// Replace local state with a server response.
    fn apply(&mut self, dto: ApplicationDto, messages: Messages) -> Result<()> {
        let inlined = dto
            .cartridges
            .map(|list| self.build_cartridges(&dto.name, list))
            .transpose()?;

        self.name = dto.name;
        self.uuid = dto.uuid;
        self.domain_id = dto.domain_id;
        self.creation_time = dto.creation_time;
        self.framework = dto.framework;
        self.app_url = dto.app_url;
        self.git_url = dto.git_url;
        self.initial_git_url = dto.initial_git_url;
        self.scale = ApplicationScale::from(dto.scalable);
        self.gear_profile = dto.gear_profile;
        self.aliases = dto.aliases;
        self.links = dto.links;
        self.messages = messages;
        if inlined.is_some() {
            self.cartridges = inlined;
        }
        self.gear_groups = None;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Namespace of the owning domain.
    pub fn domain_id(&self) -> &str {
        &self.domain_id
    }

    pub fn creation_time(&self) -> Option<DateTime<Utc>> {
        self.creation_time
    }

    /// Name of the standalone cartridge as reported with the application.
    pub fn framework(&self) -> Option<&str> {
        self.framework.as_deref()
    }

    pub fn application_url(&self) -> Option<&str> {
        self.app_url.as_deref()
    }

    pub fn git_url(&self) -> Option<&str> {
        self.git_url.as_deref()
    }

    pub fn initial_git_url(&self) -> Option<&str> {
        self.initial_git_url.as_deref()
    }

    pub fn scale(&self) -> ApplicationScale {
        self.scale
    }

    pub fn gear_profile(&self) -> Option<&str> {
        self.gear_profile.as_deref()
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }

    async fn event(&mut self, rel: &str, event: &str, extra: Parameters) -> Result<()> {
        let params = extra.with("event", event);
        let envelope: Envelope<ApplicationDto> = self.call(rel, params).await?;
        self.apply(envelope.data, envelope.messages)
    }

    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn start(&mut self) -> Result<()> {
        self.event(LINK_START, "start", Parameters::new()).await
    }

    /// Stop the application, killing its processes when `force` is set.
    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn stop(&mut self, force: bool) -> Result<()> {
        if force {
            self.event(LINK_FORCE_STOP, "force-stop", Parameters::new()).await
        } else {
            self.event(LINK_STOP, "stop", Parameters::new()).await
        }
    }

    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn restart(&mut self) -> Result<()> {
        self.event(LINK_RESTART, "restart", Parameters::new()).await
    }

    /// Add a gear. Only scalable applications offer this.
    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn scale_up(&mut self) -> Result<()> {
        self.event(LINK_SCALE_UP, "scale-up", Parameters::new()).await
    }

    /// Remove a gear. Only scalable applications offer this.
    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn scale_down(&mut self) -> Result<()> {
        self.event(LINK_SCALE_DOWN, "scale-down", Parameters::new()).await
    }

    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn add_alias(&mut self, alias: &str) -> Result<()> {
        let params = Parameters::new().with("alias", alias);
        self.event(LINK_ADD_ALIAS, "add-alias", params).await
    }

    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn remove_alias(&mut self, alias: &str) -> Result<()> {
        let params = Parameters::new().with("alias", alias);
        self.event(LINK_REMOVE_ALIAS, "remove-alias", params).await
    }

    /// Delete the application on the server.
    ///
    /// Use [`DomainResource::destroy_application`](crate::DomainResource::destroy_application)
    /// to also drop it from the domain's list.
    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn destroy(&self) -> Result<Messages> {
        self.call_messages(LINK_DELETE, Parameters::new()).await
    }

    /// Probe the deployed application once.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::ApplicationNotAvailable`] if the application
    /// URL is missing, unreachable or answers with a non-2xx status, and
    /// [`OpenShiftError::Timeout`] if it does not answer in time.
    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn check_available(&self, timeout: std::time::Duration) -> Result<()> {
        let raw_url = self.app_url.as_deref().ok_or_else(|| {
            OpenShiftError::ApplicationNotAvailable(format!("{} has no application url", self.name))
        })?;
        let url = Url::parse(raw_url).map_err(|e| {
            OpenShiftError::ApplicationNotAvailable(format!(
                "{} has a malformed application url {raw_url}: {e}",
                self.name
            ))
        })?;
        let request = HttpRequest::new(HttpMethod::Get, url)
            .with_timeout(Some(timeout))
            .anonymous();

        match self.service.execute_raw(request).await {
            Ok(response) if response.is_success() => Ok(()),
            Ok(response) => Err(OpenShiftError::ApplicationNotAvailable(format!(
                "{} at {raw_url} responded with status {}",
                self.name, response.status
            ))),
            Err(err) if err.is_timeout() => Err(err),
            Err(err) => Err(OpenShiftError::ApplicationNotAvailable(format!(
                "{} at {raw_url} is unreachable: {err}",
                self.name
            ))),
        }
    }

    fn build_cartridges(&self, application: &str, list: Vec<CartridgeDto>) -> Result<LoadedCartridges> {
        let mut loaded = LoadedCartridges {
            standalone: None,
            embedded: Vec::new(),
        };
        for dto in list {
            match dto.cartridge_type {
                CartridgeType::Standalone => {
                    loaded.standalone = Some(StandaloneCartridgeResource::from_dto(
                        self.service.clone(),
                        application,
                        dto,
                        Messages::new(),
                    )?);
                }
                CartridgeType::Embedded => {
                    loaded.embedded.push(EmbeddedCartridgeResource::from_dto(
                        self.service.clone(),
                        application,
                        dto,
                        Messages::new(),
                    )?);
                }
                CartridgeType::Unknown => {
                    tracing::warn!(cartridge = %dto.name, "ignoring cartridge of unknown type");
                }
            }
        }
        Ok(loaded)
    }

    async fn loaded_cartridges(&mut self) -> Result<&mut LoadedCartridges> {
        if self.cartridges.is_none() {
            let envelope: Envelope<Vec<CartridgeDto>> =
                self.call(LINK_LIST_CARTRIDGES, Parameters::new()).await?;
            let loaded = self.build_cartridges(&self.name, envelope.data)?;
            self.cartridges = Some(loaded);
        }
        Ok(self.cartridges.get_or_insert_with(|| LoadedCartridges {
            standalone: None,
            embedded: Vec::new(),
        }))
    }

    /// The standalone cartridge the application runs on.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::NotFound`] if the server lists no
    /// standalone cartridge for the application.
    pub async fn cartridge(&mut self) -> Result<&mut StandaloneCartridgeResource> {
        let name = self.name.clone();
        self.loaded_cartridges()
            .await?
            .standalone
            .as_mut()
            .ok_or(OpenShiftError::NotFound {
                entity_type: StandaloneCartridgeResource::KIND,
                id: name,
            })
    }

    pub async fn embedded_cartridges(&mut self) -> Result<&[EmbeddedCartridgeResource]> {
        Ok(self.loaded_cartridges().await?.embedded.as_slice())
    }

    /// Look up an embedded cartridge by name.
    pub async fn embedded_cartridge(&mut self, name: &str) -> Result<Option<&mut EmbeddedCartridgeResource>> {
        Ok(self
            .loaded_cartridges()
            .await?
            .embedded
            .iter_mut()
            .find(|c| c.name() == name))
    }

    /// Whether an embedded cartridge satisfying the spec is present.
    pub async fn has_embedded_cartridge(&mut self, spec: &CartridgeSpec) -> Result<bool> {
        Ok(self
            .embedded_cartridges()
            .await?
            .iter()
            .any(|c| spec.matches(c.name(), c.url())))
    }

    /// Embed a cartridge and return the deployed resource.
    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn add_embeddable_cartridge(
        &mut self,
        spec: &CartridgeSpec,
    ) -> Result<&mut EmbeddedCartridgeResource> {
        // load first so the new cartridge is not listed twice
        self.loaded_cartridges().await?;
        let envelope: Envelope<CartridgeDto> =
            self.call(LINK_ADD_CARTRIDGE, spec.add_to(Parameters::new())).await?;
        let cartridge = EmbeddedCartridgeResource::from_dto(
            self.service.clone(),
            &self.name,
            envelope.data,
            envelope.messages,
        )?;
        self.gear_groups = None;

        let embedded = &mut self.loaded_cartridges().await?.embedded;
        embedded.push(cartridge);
        let index = embedded.len() - 1;
        Ok(&mut embedded[index])
    }

    /// Remove an embedded cartridge on the server and from this application.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::NotFound`] if no such cartridge is embedded.
    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn remove_embedded_cartridge(&mut self, name: &str) -> Result<Messages> {
        let embedded = &mut self.loaded_cartridges().await?.embedded;
        let index = embedded
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| OpenShiftError::NotFound {
                entity_type: EmbeddedCartridgeResource::KIND,
                id: name.to_string(),
            })?;
        let messages = embedded[index].destroy().await?;
        embedded.remove(index);
        self.gear_groups = None;
        Ok(messages)
    }

    /// Reload standalone and embedded cartridges from the server.
    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn refresh_cartridges(&mut self) -> Result<()> {
        self.cartridges = None;
        self.loaded_cartridges().await?;
        Ok(())
    }

    /// Gear groups of the application, loaded on first access.
    pub async fn gear_groups(&mut self) -> Result<&[GearGroupResource]> {
        if self.gear_groups.is_none() {
            let envelope: Envelope<Vec<GearGroupDto>> =
                self.call(LINK_GET_GEAR_GROUPS, Parameters::new()).await?;
            self.gear_groups = Some(envelope.data.into_iter().map(GearGroupResource::from).collect());
        }
        Ok(self.gear_groups.get_or_insert_with(Vec::new).as_slice())
    }

    /// The gear group hosting the named cartridge.
    pub async fn gear_group_of(&mut self, cartridge: &str) -> Result<Option<&GearGroupResource>> {
        Ok(self
            .gear_groups()
            .await?
            .iter()
            .find(|g| g.contains_cartridge(cartridge)))
    }

    /// Additional storage of the gears hosting the named cartridge.
    ///
    /// `None` when no gear group hosts the cartridge or the server reports
    /// no additional storage.
    pub async fn additional_gear_storage(&mut self, cartridge: &str) -> Result<Option<u32>> {
        Ok(self
            .gear_group_of(cartridge)
            .await?
            .and_then(GearGroupResource::additional_storage))
    }

    /// Set additional storage for the gears hosting the named cartridge.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::NotFound`] if the application has no such
    /// cartridge.
    #[tracing::instrument(skip(self), fields(application = %self.name))]
    pub async fn set_additional_gear_storage(&mut self, cartridge: &str, size: u32) -> Result<()> {
        let loaded = self.loaded_cartridges().await?;
        if let Some(standalone) = loaded.standalone.as_mut().filter(|c| c.name() == cartridge) {
            standalone.set_additional_gear_storage(size).await?;
        } else if let Some(embedded) = loaded.embedded.iter_mut().find(|c| c.name() == cartridge) {
            embedded.set_additional_gear_storage(size).await?;
        } else {
            return Err(OpenShiftError::NotFound {
                entity_type: "cartridge",
                id: cartridge.to_string(),
            });
        }
        self.gear_groups = None;
        Ok(())
    }
}

impl PartialEq for ApplicationResource {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for ApplicationResource {}

impl Resource for ApplicationResource {
    const KIND: &'static str = "application";

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
impl Refresh for ApplicationResource {
    #[tracing::instrument(skip(self), fields(application = %self.name))]
    async fn refresh(&mut self) -> Result<()> {
        let envelope: Envelope<ApplicationDto> = self
            .call(LINK_GET, Parameters::new())
            .await
            .map_err(|e| e.not_found_as(Self::KIND, &self.name))?;
        let had_cartridges = self.cartridges.is_some();
        self.apply(envelope.data, envelope.messages)?;
        if had_cartridges {
            self.refresh_cartridges().await?;
        }
        Ok(())
    }
}
