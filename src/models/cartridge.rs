//! Cartridge DTO.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::link::Links;

/// Whether a cartridge hosts an application or is added to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartridgeType {
    /// Web framework the application is built on (php, jbossas, ...).
    Standalone,
    /// Add-on such as a database or cron.
    Embedded,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for CartridgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Standalone => "standalone",
            Self::Embedded => "embedded",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A cartridge, either from the catalog or deployed in an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartridgeDto {
    /// Cartridge name including version (e.g. `php-5.4`).
    pub name: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub cartridge_type: CartridgeType,

    /// Manifest URL of a downloadable cartridge.
    #[serde(default)]
    pub url: Option<Url>,

    #[serde(default)]
    pub obsolete: bool,

    /// Additional storage in gigabytes of the gear group hosting it.
    #[serde(default)]
    pub additional_gear_storage: Option<u32>,

    #[serde(default)]
    pub scales_from: Option<i32>,

    #[serde(default)]
    pub scales_to: Option<i32>,

    #[serde(default)]
    pub gear_profile: Option<String>,

    #[serde(default)]
    pub links: Links,
}
