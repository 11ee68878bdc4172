//! Domain DTO.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::link::Links;

/// A domain (namespace) owning applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainDto {
    /// The namespace. Newer brokers call this field `name`.
    #[serde(alias = "name")]
    pub id: String,

    /// DNS suffix appended to application hostnames.
    #[serde(default)]
    pub suffix: Option<String>,

    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub links: Links,
}
