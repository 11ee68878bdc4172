//! Gear group DTO.

use serde::{Deserialize, Serialize};

/// State of a single gear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearState {
    Started,
    Stopped,
    Idle,
    Building,
    Deploying,
    New,
    #[serde(other)]
    Unknown,
}

/// A gear inside a gear group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearDto {
    pub id: String,
    pub state: GearState,
    #[serde(default)]
    pub ssh_url: Option<String>,
}

/// Cartridge reference inside a gear group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearGroupCartridgeDto {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A set of gears hosting the same cartridges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearGroupDto {
    /// Gear group UUID.
    #[serde(rename = "id")]
    pub uuid: String,

    pub name: String,

    #[serde(default)]
    pub gear_profile: Option<String>,

    /// Additional storage in gigabytes per gear.
    #[serde(rename = "additional_gear_storage", default)]
    pub additional_storage: Option<u32>,

    #[serde(default)]
    pub gears: Vec<GearDto>,

    #[serde(default)]
    pub cartridges: Vec<GearGroupCartridgeDto>,

    #[serde(default)]
    pub scales_from: Option<i32>,

    #[serde(default)]
    pub scales_to: Option<i32>,
}
