//! Gear group resource.

use crate::models::{GearDto, GearGroupDto, GearState};

/// A gear inside a gear group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gear {
    id: String,
    state: GearState,
    ssh_url: Option<String>,
}

impl Gear {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> GearState {
        self.state
    }

    pub fn ssh_url(&self) -> Option<&str> {
        self.ssh_url.as_deref()
    }
}

impl From<GearDto> for Gear {
    fn from(dto: GearDto) -> Self {
        Self {
            id: dto.id,
            state: dto.state,
            ssh_url: dto.ssh_url,
        }
    }
}

/// Gears of an application that host the same set of cartridges.
///
/// Gear groups carry no links; they change only when the owning
/// application reloads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearGroupResource {
    uuid: String,
    name: String,
    gear_profile: Option<String>,
    additional_storage: Option<u32>,
    gears: Vec<Gear>,
    cartridge_names: Vec<String>,
}

impl GearGroupResource {
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gear_profile(&self) -> Option<&str> {
        self.gear_profile.as_deref()
    }

    /// Additional storage in gigabytes, `None` when the server reports none.
    pub fn additional_storage(&self) -> Option<u32> {
        self.additional_storage
    }

    pub fn gears(&self) -> &[Gear] {
        &self.gears
    }

    pub fn cartridge_names(&self) -> &[String] {
        &self.cartridge_names
    }

    /// Whether the group hosts the named cartridge.
    pub fn contains_cartridge(&self, name: &str) -> bool {
        self.cartridge_names.iter().any(|c| c == name)
    }
}

impl From<GearGroupDto> for GearGroupResource {
    fn from(dto: GearGroupDto) -> Self {
        Self {
            uuid: dto.uuid,
            name: dto.name,
            gear_profile: dto.gear_profile,
            additional_storage: dto.additional_storage,
            gears: dto.gears.into_iter().map(Gear::from).collect(),
            cartridge_names: dto.cartridges.into_iter().map(|c| c.name).collect(),
        }
    }
}
