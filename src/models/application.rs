//! Application DTO.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::link::Links;
use crate::models::CartridgeDto;

/// An application as returned by the broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDto {
    pub name: String,

    /// Application UUID.
    #[serde(rename = "id")]
    pub uuid: String,

    /// Namespace of the owning domain.
    pub domain_id: String,

    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,

    /// Name of the standalone cartridge.
    #[serde(default)]
    pub framework: Option<String>,

    #[serde(default)]
    pub app_url: Option<String>,

    #[serde(default)]
    pub git_url: Option<String>,

    #[serde(default)]
    pub initial_git_url: Option<String>,

    #[serde(default)]
    pub scalable: bool,

    #[serde(default)]
    pub gear_profile: Option<String>,

    #[serde(default)]
    pub aliases: Vec<String>,

    #[serde(default)]
    pub gear_count: Option<u32>,

    /// Inlined cartridges, present when requested with `include=cartridges`.
    #[serde(default)]
    pub cartridges: Option<Vec<CartridgeDto>>,

    #[serde(default)]
    pub links: Links,
}
