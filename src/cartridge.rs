//! Request-side cartridge and application types.
//!
//! These describe what the caller asks for; what the server actually
//! deployed comes back as resources.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{json, Value};
use url::Url;

use crate::error::{OpenShiftError, Result};
use crate::link::Parameters;
use crate::models::{CartridgeDto, CartridgeType};

/// A cartridge to deploy, by catalog name or by manifest URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CartridgeSpec {
    Named(String),
    /// A downloadable cartridge; the server names it once deployed.
    Downloadable(Url),
}

impl CartridgeSpec {
    /// Cartridge from the catalog.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Downloadable cartridge.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest URL is invalid.
    pub fn downloadable(url: &str) -> Result<Self> {
        Ok(Self::Downloadable(Url::parse(url)?))
    }

    /// JSON form used in `cartridges` arrays.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Named(name) => json!({ "name": name }),
            Self::Downloadable(url) => json!({ "url": url.as_str() }),
        }
    }

    /// Add this cartridge to single-cartridge request parameters.
    pub(crate) fn add_to(&self, params: Parameters) -> Parameters {
        match self {
            Self::Named(name) => params.with("name", name.as_str()),
            Self::Downloadable(url) => params.with("url", url.as_str()),
        }
    }

    /// Whether a deployed cartridge satisfies this spec.
    pub fn matches(&self, name: &str, url: Option<&Url>) -> bool {
        match self {
            Self::Named(wanted) => wanted == name,
            Self::Downloadable(wanted) => url == Some(wanted),
        }
    }
}

impl From<&CartridgeDto> for CartridgeSpec {
    fn from(dto: &CartridgeDto) -> Self {
        match &dto.url {
            Some(url) => Self::Downloadable(url.clone()),
            None => Self::Named(dto.name.clone()),
        }
    }
}

/// Whether an application scales across gears.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ApplicationScale {
    Scale,
    #[default]
    NoScale,
}

impl ApplicationScale {
    pub fn is_scalable(self) -> bool {
        matches!(self, Self::Scale)
    }
}

impl From<bool> for ApplicationScale {
    fn from(scalable: bool) -> Self {
        if scalable {
            Self::Scale
        } else {
            Self::NoScale
        }
    }
}

/// Selects the newest catalog version of a cartridge family.
///
/// ```
/// use openshift_api::LatestVersionOf;
///
/// let php = LatestVersionOf::new("php");
/// assert_eq!(php.prefix(), "php");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestVersionOf {
    prefix: String,
    cartridge_type: Option<CartridgeType>,
}

impl LatestVersionOf {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            cartridge_type: None,
        }
    }

    pub fn php() -> Self {
        Self::new("php")
    }

    pub fn mysql() -> Self {
        Self::new("mysql")
    }

    pub fn jenkins() -> Self {
        Self::new("jenkins")
    }

    pub fn haproxy() -> Self {
        Self::new("haproxy")
    }

    /// Only consider cartridges of the given type.
    #[must_use]
    pub fn of_type(mut self, cartridge_type: CartridgeType) -> Self {
        self.cartridge_type = Some(cartridge_type);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Pick the newest non-obsolete `<prefix>-<version>` entry.
    pub fn find<'a>(&self, catalog: &'a [CartridgeDto]) -> Option<&'a CartridgeDto> {
        catalog
            .iter()
            .filter(|c| !c.obsolete)
            .filter(|c| self.cartridge_type.map_or(true, |t| t == c.cartridge_type))
            .filter_map(|c| self.version_of(&c.name).map(|v| (v, c)))
            .max_by(|(a, _), (b, _)| compare_versions(a, b))
            .map(|(_, c)| c)
    }

    fn version_of<'n>(&self, name: &'n str) -> Option<&'n str> {
        let rest = name.strip_prefix(self.prefix.as_str())?;
        let version = rest.strip_prefix('-')?;
        version
            .starts_with(|ch: char| ch.is_ascii_digit())
            .then_some(version)
    }
}

/// Compare dotted versions numerically, falling back to text.
fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split(['.', '-']);
    let mut right = b.split(['.', '-']);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// Parameters for creating an application.
///
/// ```
/// use openshift_api::{ApplicationScale, CartridgeSpec, NewApplication};
///
/// let app = NewApplication::new("blog")
///     .cartridge(CartridgeSpec::named("php-5.4"))
///     .embed(CartridgeSpec::named("mysql-5.5"))
///     .scale(ApplicationScale::Scale)
///     .gear_profile("small");
/// assert_eq!(app.name(), "blog");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NewApplication {
    name: String,
    cartridge: Option<CartridgeSpec>,
    embedded: Vec<CartridgeSpec>,
    scale: ApplicationScale,
    gear_profile: Option<String>,
    initial_git_url: Option<String>,
    environment: BTreeMap<String, String>,
    timeout: Option<Duration>,
}

impl NewApplication {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The standalone cartridge the application runs on.
    #[must_use]
    pub fn cartridge(mut self, cartridge: CartridgeSpec) -> Self {
        self.cartridge = Some(cartridge);
        self
    }

    /// Add an embedded cartridge.
    #[must_use]
    pub fn embed(mut self, cartridge: CartridgeSpec) -> Self {
        self.embedded.push(cartridge);
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: ApplicationScale) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn gear_profile(mut self, profile: impl Into<String>) -> Self {
        self.gear_profile = Some(profile.into());
        self
    }

    /// Repository to clone the initial application code from.
    #[must_use]
    pub fn initial_git_url(mut self, url: impl Into<String>) -> Self {
        self.initial_git_url = Some(url.into());
        self
    }

    /// Add an environment variable.
    #[must_use]
    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(name.into(), value.into());
        self
    }

    /// Timeout for the create request; creation can take minutes.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build request parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::InvalidRequest`] if the name or the
    /// standalone cartridge is missing.
    pub fn to_parameters(&self) -> Result<Parameters> {
        if self.name.trim().is_empty() {
            return Err(OpenShiftError::InvalidRequest(
                "application name is required".to_string(),
            ));
        }
        let cartridge = self.cartridge.as_ref().ok_or_else(|| {
            OpenShiftError::InvalidRequest(format!(
                "application '{}' needs a standalone cartridge",
                self.name
            ))
        })?;

        let cartridges: Vec<Value> = std::iter::once(cartridge)
            .chain(self.embedded.iter())
            .map(CartridgeSpec::to_value)
            .collect();

        let mut params = Parameters::new()
            .with("name", self.name.as_str())
            .with("cartridges", cartridges)
            .with("scale", self.scale.is_scalable())
            .with_opt("gear_size", self.gear_profile.as_deref())
            .with_opt("initial_git_url", self.initial_git_url.as_deref());

        if !self.environment.is_empty() {
            let variables: Vec<Value> = self
                .environment
                .iter()
                .map(|(name, value)| json!({ "name": name, "value": value }))
                .collect();
            params.insert("environment_variables", variables);
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_entry(name: &str, obsolete: bool, cartridge_type: CartridgeType) -> CartridgeDto {
        serde_json::from_value(json!({
            "name": name,
            "type": cartridge_type,
            "obsolete": obsolete
        }))
        .unwrap()
    }

    #[test]
    fn test_latest_version_skips_obsolete_and_other_families() {
        let catalog = vec![
            catalog_entry("php-5.3", true, CartridgeType::Standalone),
            catalog_entry("php-5.4", false, CartridgeType::Standalone),
            catalog_entry("php-5.10", true, CartridgeType::Standalone),
            catalog_entry("phpmyadmin-4", false, CartridgeType::Embedded),
            catalog_entry("python-2.7", false, CartridgeType::Standalone),
        ];

        let found = LatestVersionOf::php().find(&catalog).unwrap();
        assert_eq!(found.name, "php-5.4");
    }

    #[test]
    fn test_latest_version_compares_numerically() {
        let catalog = vec![
            catalog_entry("mysql-5.5", false, CartridgeType::Embedded),
            catalog_entry("mysql-5.10", false, CartridgeType::Embedded),
        ];
        let found = LatestVersionOf::mysql()
            .of_type(CartridgeType::Embedded)
            .find(&catalog)
            .unwrap();
        assert_eq!(found.name, "mysql-5.10");

        assert!(LatestVersionOf::mysql()
            .of_type(CartridgeType::Standalone)
            .find(&catalog)
            .is_none());
    }

    #[test]
    fn test_new_application_parameters() {
        let params = NewApplication::new("blog")
            .cartridge(CartridgeSpec::named("php-5.4"))
            .embed(CartridgeSpec::downloadable("https://example.com/manifest.yml").unwrap())
            .scale(ApplicationScale::Scale)
            .gear_profile("small")
            .env("MODE", "prod")
            .to_parameters()
            .unwrap();

        assert_eq!(params.get("name"), Some(&json!("blog")));
        assert_eq!(params.get("scale"), Some(&json!(true)));
        assert_eq!(params.get("gear_size"), Some(&json!("small")));
        assert_eq!(
            params.get("cartridges"),
            Some(&json!([
                {"name": "php-5.4"},
                {"url": "https://example.com/manifest.yml"}
            ]))
        );
        assert_eq!(
            params.get("environment_variables"),
            Some(&json!([{"name": "MODE", "value": "prod"}]))
        );
        assert!(params.get("initial_git_url").is_none());
    }

    #[test]
    fn test_new_application_requires_cartridge() {
        let err = NewApplication::new("blog").to_parameters().unwrap_err();
        assert!(matches!(err, OpenShiftError::InvalidRequest(_)));

        let err = NewApplication::new(" ")
            .cartridge(CartridgeSpec::named("php-5.4"))
            .to_parameters()
            .unwrap_err();
        assert!(matches!(err, OpenShiftError::InvalidRequest(_)));
    }
}
