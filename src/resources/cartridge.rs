//! Deployed cartridge resources.

use async_trait::async_trait;
use url::Url;

use crate::error::{OpenShiftError, Result};
use crate::link::{Links, Parameters};
use crate::messages::Messages;
use crate::models::{CartridgeDto, CartridgeType};
use crate::service::{Envelope, RestService};
use crate::traits::{Refresh, Resource};

const LINK_GET: &str = "GET";
const LINK_UPDATE: &str = "UPDATE";
const LINK_DELETE: &str = "DELETE";

/// Request field holding additional storage in gigabytes.
pub const PROPERTY_ADDITIONAL_GEAR_STORAGE: &str = "additional_gear_storage";

/// Attributes shared by standalone and embedded cartridges.
#[derive(Debug, Clone)]
pub struct CartridgeAttributes {
    name: String,
    display_name: Option<String>,
    description: Option<String>,
    url: Option<Url>,
    cartridge_type: CartridgeType,
    obsolete: bool,
    additional_gear_storage: Option<u32>,
    links: Links,
    messages: Messages,
}

impl CartridgeAttributes {
    fn from_dto(dto: CartridgeDto, expected: CartridgeType, messages: Messages) -> Result<Self> {
        if dto.cartridge_type != expected {
            return Err(OpenShiftError::InvalidResponse(format!(
                "cartridge '{}' is {}, expected {}",
                dto.name, dto.cartridge_type, expected
            )));
        }
        Ok(Self {
            name: dto.name,
            display_name: dto.display_name,
            description: dto.description,
            url: dto.url,
            cartridge_type: dto.cartridge_type,
            obsolete: dto.obsolete,
            additional_gear_storage: dto.additional_gear_storage,
            links: dto.links,
            messages,
        })
    }
}

/// Read access to cartridge attributes.
pub trait Cartridge {
    fn attributes(&self) -> &CartridgeAttributes;

    /// Name including version (e.g. `php-5.4`).
    fn name(&self) -> &str {
        &self.attributes().name
    }

    fn display_name(&self) -> Option<&str> {
        self.attributes().display_name.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.attributes().description.as_deref()
    }

    /// Manifest URL of a downloadable cartridge.
    fn url(&self) -> Option<&Url> {
        self.attributes().url.as_ref()
    }

    fn is_downloadable(&self) -> bool {
        self.attributes().url.is_some()
    }

    fn cartridge_type(&self) -> CartridgeType {
        self.attributes().cartridge_type
    }

    fn is_obsolete(&self) -> bool {
        self.attributes().obsolete
    }

    /// Additional storage as last reported with the cartridge itself.
    fn reported_gear_storage(&self) -> Option<u32> {
        self.attributes().additional_gear_storage
    }
}

/// The web framework cartridge an application runs on.
#[derive(Debug, Clone)]
pub struct StandaloneCartridgeResource {
    service: RestService,
    application: String,
    attributes: CartridgeAttributes,
}

impl StandaloneCartridgeResource {
    /// Build from a server DTO.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::InvalidResponse`] if the DTO is not a
    /// standalone cartridge.
    pub(crate) fn from_dto(
        service: RestService,
        application: &str,
        dto: CartridgeDto,
        messages: Messages,
    ) -> Result<Self> {
        Ok(Self {
            service,
            application: application.to_string(),
            attributes: CartridgeAttributes::from_dto(dto, CartridgeType::Standalone, messages)?,
        })
    }

    /// Name of the owning application.
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Set the total additional storage in gigabytes of the hosting gears.
    #[tracing::instrument(skip(self), fields(cartridge = %self.attributes.name))]
    pub async fn set_additional_gear_storage(&mut self, size: u32) -> Result<()> {
        let params = Parameters::new().with(PROPERTY_ADDITIONAL_GEAR_STORAGE, size);
        let envelope: Envelope<CartridgeDto> = self.call(LINK_UPDATE, params).await?;
        self.attributes =
            CartridgeAttributes::from_dto(envelope.data, CartridgeType::Standalone, envelope.messages)?;
        Ok(())
    }
}

impl Cartridge for StandaloneCartridgeResource {
    fn attributes(&self) -> &CartridgeAttributes {
        &self.attributes
    }
}

impl PartialEq for StandaloneCartridgeResource {
    fn eq(&self, other: &Self) -> bool {
        self.attributes.name == other.attributes.name
    }
}

impl Eq for StandaloneCartridgeResource {}

impl Resource for StandaloneCartridgeResource {
    const KIND: &'static str = "standalone cartridge";

    fn service(&self) -> &RestService {
        &self.service
    }

    fn links(&self) -> &Links {
        &self.attributes.links
    }

    fn messages(&self) -> &Messages {
        &self.attributes.messages
    }
}

#[async_trait]
impl Refresh for StandaloneCartridgeResource {
    #[tracing::instrument(skip(self), fields(cartridge = %self.attributes.name))]
    async fn refresh(&mut self) -> Result<()> {
        let envelope: Envelope<CartridgeDto> = self
            .call(LINK_GET, Parameters::new())
            .await
            .map_err(|e| e.not_found_as(Self::KIND, &self.attributes.name))?;
        self.attributes =
            CartridgeAttributes::from_dto(envelope.data, CartridgeType::Standalone, envelope.messages)?;
        Ok(())
    }
}

/// An add-on cartridge (database, cron, ...) embedded in an application.
#[derive(Debug, Clone)]
pub struct EmbeddedCartridgeResource {
    service: RestService,
    application: String,
    attributes: CartridgeAttributes,
}

impl EmbeddedCartridgeResource {
    /// Build from a server DTO.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::InvalidResponse`] if the DTO is not an
    /// embedded cartridge.
    pub(crate) fn from_dto(
        service: RestService,
        application: &str,
        dto: CartridgeDto,
        messages: Messages,
    ) -> Result<Self> {
        Ok(Self {
            service,
            application: application.to_string(),
            attributes: CartridgeAttributes::from_dto(dto, CartridgeType::Embedded, messages)?,
        })
    }

    /// Name of the owning application.
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Set the total additional storage in gigabytes of the hosting gears.
    #[tracing::instrument(skip(self), fields(cartridge = %self.attributes.name))]
    pub async fn set_additional_gear_storage(&mut self, size: u32) -> Result<()> {
        let params = Parameters::new().with(PROPERTY_ADDITIONAL_GEAR_STORAGE, size);
        let envelope: Envelope<CartridgeDto> = self.call(LINK_UPDATE, params).await?;
        self.attributes =
            CartridgeAttributes::from_dto(envelope.data, CartridgeType::Embedded, envelope.messages)?;
        Ok(())
    }

    /// Remove the cartridge from its application on the server.
    ///
    /// Use [`ApplicationResource::remove_embedded_cartridge`](crate::ApplicationResource::remove_embedded_cartridge)
    /// to also drop it from the application's list.
    #[tracing::instrument(skip(self), fields(cartridge = %self.attributes.name))]
    pub async fn destroy(&self) -> Result<Messages> {
        self.call_messages(LINK_DELETE, Parameters::new()).await
    }
}

impl Cartridge for EmbeddedCartridgeResource {
    fn attributes(&self) -> &CartridgeAttributes {
        &self.attributes
    }
}

impl PartialEq for EmbeddedCartridgeResource {
    fn eq(&self, other: &Self) -> bool {
        self.attributes.name == other.attributes.name
    }
}

impl Eq for EmbeddedCartridgeResource {}

impl Resource for EmbeddedCartridgeResource {
    const KIND: &'static str = "embedded cartridge";

    fn service(&self) -> &RestService {
        &self.service
    }

    fn links(&self) -> &Links {
        &self.attributes.links
    }

    fn messages(&self) -> &Messages {
        &self.attributes.messages
    }
}

#[async_trait]
impl Refresh for EmbeddedCartridgeResource {
    #[tracing::instrument(skip(self), fields(cartridge = %self.attributes.name))]
    async fn refresh(&mut self) -> Result<()> {
        let envelope: Envelope<CartridgeDto> = self
            .call(LINK_GET, Parameters::new())
            .await
            .map_err(|e| e.not_found_as(Self::KIND, &self.attributes.name))?;
        self.attributes =
            CartridgeAttributes::from_dto(envelope.data, CartridgeType::Embedded, envelope.messages)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpRequest, HttpResponse, HttpTransport};
    use std::sync::Arc;

    struct Unreachable;

    #[async_trait]
    impl HttpTransport for Unreachable {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
            panic!("no request expected");
        }
    }

    fn service() -> RestService {
        RestService::new(Arc::new(Unreachable), "https://broker/rest").unwrap()
    }

    fn dto(json: serde_json::Value) -> CartridgeDto {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_standalone_rejects_embedded_dto() {
        let embedded = dto(serde_json::json!({"name": "mysql-5.5", "type": "embedded"}));
        let err = StandaloneCartridgeResource::from_dto(service(), "app", embedded, Messages::new())
            .unwrap_err();
        assert!(matches!(err, OpenShiftError::InvalidResponse(_)));
    }

    #[test]
    fn test_downloadable_when_url_present() {
        let cartridge = StandaloneCartridgeResource::from_dto(
            service(),
            "app",
            dto(serde_json::json!({
                "name": "go-1.1",
                "type": "standalone",
                "url": "https://example.com/go/manifest.yml"
            })),
            Messages::new(),
        )
        .unwrap();

        assert!(cartridge.is_downloadable());
        assert_eq!(cartridge.application(), "app");
        assert_eq!(cartridge.cartridge_type(), CartridgeType::Standalone);
    }

    #[tokio::test]
    async fn test_update_without_link_is_unsupported() {
        let mut cartridge = EmbeddedCartridgeResource::from_dto(
            service(),
            "app",
            dto(serde_json::json!({"name": "cron-1.4", "type": "embedded", "links": {}})),
            Messages::new(),
        )
        .unwrap();

        let err = cartridge.set_additional_gear_storage(2).await.unwrap_err();
        assert!(err.is_unsupported());
        let err = cartridge.destroy().await.unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_equality_by_name() {
        let a = EmbeddedCartridgeResource::from_dto(
            service(),
            "app",
            dto(serde_json::json!({"name": "cron-1.4", "type": "embedded", "obsolete": true})),
            Messages::new(),
        )
        .unwrap();
        let b = EmbeddedCartridgeResource::from_dto(
            service(),
            "other",
            dto(serde_json::json!({"name": "cron-1.4", "type": "embedded"})),
            Messages::new(),
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
