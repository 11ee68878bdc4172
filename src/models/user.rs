//! User DTO.

use serde::{Deserialize, Serialize};

use crate::link::Links;

/// The authenticated user as returned by `GET_USER`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    /// Internal user id.
    #[serde(default)]
    pub id: Option<String>,

    /// Login name.
    pub login: String,

    /// Gears currently in use.
    #[serde(default)]
    pub consumed_gears: u32,

    /// Gear quota.
    #[serde(default)]
    pub max_gears: u32,

    /// Billing plan.
    #[serde(default)]
    pub plan_id: Option<String>,

    #[serde(default)]
    pub links: Links,
}
