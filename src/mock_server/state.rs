//! Mock server state management.
//!
//! Provides the in-memory broker model served by the mock server.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use url::Url;

use crate::{CartridgeDto, CartridgeType, GearState};

/// Gear group hosting the web framework.
pub const WEB_GROUP: &str = "web";

/// An application held by the mock broker.
#[derive(Debug, Clone)]
pub struct MockApplication {
    pub uuid: String,
    pub name: String,
    /// Standalone cartridge name.
    pub framework: String,
    pub scalable: bool,
    pub gear_profile: String,
    pub aliases: Vec<String>,
    pub state: GearState,
    /// Gears of the web group.
    pub gear_count: u32,
    /// Embedded cartridge names, in the order they were added.
    pub embedded: Vec<String>,
    /// Additional storage in gigabytes, keyed by gear group name.
    pub storage: BTreeMap<String, u32>,
    /// Manifest URLs of downloadable cartridges, keyed by cartridge name.
    pub cartridge_urls: BTreeMap<String, Url>,
    pub initial_git_url: Option<String>,
    pub created: DateTime<Utc>,
}

impl MockApplication {
    /// Gear group hosting the named cartridge.
    ///
    /// Non-scalable applications run everything on one gear; scalable ones
    /// give each embedded cartridge a group of its own.
    pub fn group_of(&self, cartridge: &str) -> Option<String> {
        if cartridge == self.framework || (self.scalable && cartridge == HAPROXY) {
            return Some(WEB_GROUP.to_string());
        }
        if !self.embedded.iter().any(|c| c == cartridge) {
            return None;
        }
        if self.scalable {
            Some(cartridge.to_string())
        } else {
            Some(WEB_GROUP.to_string())
        }
    }

    /// Cartridge names grouped by gear group, web group first.
    pub fn gear_groups(&self) -> Vec<(String, Vec<String>)> {
        let mut web = vec![self.framework.clone()];
        if self.scalable {
            web.push(HAPROXY.to_string());
        }
        let mut groups = Vec::new();
        if self.scalable {
            groups.push((WEB_GROUP.to_string(), web));
            for cartridge in &self.embedded {
                groups.push((cartridge.clone(), vec![cartridge.clone()]));
            }
        } else {
            web.extend(self.embedded.iter().cloned());
            groups.push((WEB_GROUP.to_string(), web));
        }
        groups
    }

    /// Gears the application occupies.
    pub fn consumed_gears(&self) -> u32 {
        if self.scalable {
            self.gear_count + self.embedded.len() as u32
        } else {
            1
        }
    }

    pub fn has_cartridge(&self, name: &str) -> bool {
        self.group_of(name).is_some()
    }
}

/// Load balancer cartridge added to every scalable application.
pub const HAPROXY: &str = "haproxy-1.4";

/// A domain held by the mock broker.
#[derive(Debug, Clone)]
pub struct MockDomain {
    pub id: String,
    pub applications: Vec<MockApplication>,
    pub created: DateTime<Utc>,
}

impl MockDomain {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            applications: Vec::new(),
            created: Utc::now(),
        }
    }

    /// Look up an application by name, ignoring case.
    pub fn application(&self, name: &str) -> Option<&MockApplication> {
        self.applications
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn application_mut(&mut self, name: &str) -> Option<&mut MockApplication> {
        self.applications
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

/// Shared state for the mock server.
///
/// This struct holds everything the simulated broker knows about its single
/// user. It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    /// Absolute base URL used for link hrefs. Set by the server on start.
    pub base_url: String,

    pub login: String,

    pub max_gears: u32,

    /// DNS suffix of application hostnames.
    pub suffix: String,

    /// Gear profiles accepted on application creation.
    pub gear_profiles: Vec<String>,

    /// Domains in creation order.
    pub domains: Vec<MockDomain>,

    /// Cartridge catalog.
    pub catalog: Vec<CartridgeDto>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    next_id: u64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            login: "developer@example.com".to_string(),
            max_gears: 16,
            suffix: "rhcloud.example.com".to_string(),
            gear_profiles: vec!["small".to_string(), "medium".to_string()],
            domains: Vec::new(),
            catalog: Vec::new(),
            required_token: None,
            next_id: 0,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a domain to the state.
    pub fn with_domain(mut self, domain: MockDomain) -> Self {
        self.domains.push(domain);
        self
    }

    /// Add an application to an existing domain.
    pub fn with_application(mut self, domain: &str, application: MockApplication) -> Self {
        if let Some(d) = self.domain_mut(domain) {
            d.applications.push(application);
        }
        self
    }

    /// Add a cartridge to the catalog.
    pub fn with_cartridge(mut self, cartridge: CartridgeDto) -> Self {
        self.catalog.push(cartridge);
        self
    }

    /// Set the gear quota.
    pub fn with_max_gears(mut self, max_gears: u32) -> Self {
        self.max_gears = max_gears;
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Generate a new 24-character hex id.
    pub fn next_uuid(&mut self) -> String {
        self.next_id += 1;
        format!("{:024x}", 0x5339_0000_0000_0000_u64 + self.next_id)
    }

    pub fn domain(&self, id: &str) -> Option<&MockDomain> {
        self.domains.iter().find(|d| d.id == id)
    }

    pub fn domain_mut(&mut self, id: &str) -> Option<&mut MockDomain> {
        self.domains.iter_mut().find(|d| d.id == id)
    }

    /// Whether a namespace is taken, ignoring case.
    pub fn namespace_taken(&self, id: &str) -> bool {
        self.domains.iter().any(|d| d.id.eq_ignore_ascii_case(id))
    }

    pub fn application(&self, domain: &str, name: &str) -> Option<&MockApplication> {
        self.domain(domain).and_then(|d| d.application(name))
    }

    pub fn application_mut(&mut self, domain: &str, name: &str) -> Option<&mut MockApplication> {
        self.domain_mut(domain).and_then(|d| d.application_mut(name))
    }

    /// Gears used by all applications of the user.
    pub fn consumed_gears(&self) -> u32 {
        self.domains
            .iter()
            .flat_map(|d| d.applications.iter())
            .map(MockApplication::consumed_gears)
            .sum()
    }

    /// Look up a catalog cartridge by name.
    pub fn catalog_cartridge(&self, name: &str) -> Option<&CartridgeDto> {
        self.catalog.iter().find(|c| c.name == name)
    }

    /// Type of a cartridge, from the catalog or the application itself.
    pub fn cartridge_type(&self, application: &MockApplication, name: &str) -> CartridgeType {
        if name == application.framework {
            return CartridgeType::Standalone;
        }
        self.catalog_cartridge(name)
            .map(|c| c.cartridge_type)
            .unwrap_or(CartridgeType::Embedded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_state_application_lookup_ignores_case() {
        let state = MockState::new()
            .with_domain(MockDomain::new("foobar"))
            .with_application("foobar", Fixtures::application("Blog", "php-5.4"));

        assert!(state.application("foobar", "blog").is_some());
        assert!(state.application("foobar", "BLOG").is_some());
        assert!(state.application("other", "blog").is_none());
    }

    #[test]
    fn test_gear_groups_of_scalable_application() {
        let mut app = Fixtures::application("shop", "php-5.4");
        app.scalable = true;
        app.gear_count = 2;
        app.embedded.push("mysql-5.5".to_string());

        let groups = app.gear_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1, vec!["php-5.4".to_string(), HAPROXY.to_string()]);
        assert_eq!(app.group_of("mysql-5.5").as_deref(), Some("mysql-5.5"));
        assert_eq!(app.consumed_gears(), 3);
    }

    #[test]
    fn test_gear_groups_of_single_gear_application() {
        let mut app = Fixtures::application("blog", "php-5.4");
        app.embedded.push("mysql-5.5".to_string());

        let groups = app.gear_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(app.group_of("mysql-5.5").as_deref(), Some(WEB_GROUP));
        assert_eq!(app.group_of("cron-1.4"), None);
    }
}
