//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use std::collections::BTreeMap;

use chrono::Utc;

use super::state::{MockApplication, MockDomain};
use crate::{CartridgeDto, CartridgeType, GearState, Links};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// Default data set: one domain with one application.
pub struct DefaultScenario {
    pub domains: Vec<MockDomain>,
    pub catalog: Vec<CartridgeDto>,
}

impl Fixtures {
    // =========================================================================
    // Cartridge Fixtures
    // =========================================================================

    /// Create a catalog cartridge.
    pub fn cartridge(name: &str, cartridge_type: CartridgeType) -> CartridgeDto {
        CartridgeDto {
            name: name.to_string(),
            display_name: None,
            description: None,
            cartridge_type,
            url: None,
            obsolete: false,
            additional_gear_storage: None,
            scales_from: None,
            scales_to: None,
            gear_profile: None,
            links: Links::new(),
        }
    }

    /// Create a catalog cartridge that is still offered but superseded.
    pub fn obsolete_cartridge(name: &str, cartridge_type: CartridgeType) -> CartridgeDto {
        let mut cartridge = Self::cartridge(name, cartridge_type);
        cartridge.obsolete = true;
        cartridge
    }

    /// The catalog served by default.
    pub fn default_catalog() -> Vec<CartridgeDto> {
        use CartridgeType::{Embedded, Standalone};
        vec![
            Self::obsolete_cartridge("php-5.3", Standalone),
            Self::cartridge("php-5.4", Standalone),
            Self::cartridge("jbossas-7", Standalone),
            Self::cartridge("jenkins-1", Standalone),
            Self::cartridge("python-2.7", Standalone),
            Self::cartridge("mysql-5.1", Embedded),
            Self::cartridge("mysql-5.5", Embedded),
            Self::cartridge("postgresql-9.2", Embedded),
            Self::cartridge("mongodb-2.4", Embedded),
            Self::cartridge("cron-1.4", Embedded),
            Self::cartridge("jenkins-client-1", Embedded),
        ]
    }

    // =========================================================================
    // Application Fixtures
    // =========================================================================

    /// Create a started, non-scalable application.
    pub fn application(name: &str, framework: &str) -> MockApplication {
        MockApplication {
            uuid: format!("{:0>24}", name.bytes().map(|b| format!("{b:02x}")).collect::<String>()),
            name: name.to_string(),
            framework: framework.to_string(),
            scalable: false,
            gear_profile: "small".to_string(),
            aliases: Vec::new(),
            state: GearState::Started,
            gear_count: 1,
            embedded: Vec::new(),
            storage: BTreeMap::new(),
            cartridge_urls: BTreeMap::new(),
            initial_git_url: None,
            created: Utc::now(),
        }
    }

    /// Create an application with embedded cartridges.
    pub fn application_with(name: &str, framework: &str, embedded: &[&str]) -> MockApplication {
        let mut app = Self::application(name, framework);
        app.embedded = embedded.iter().map(|c| c.to_string()).collect();
        app
    }

    // =========================================================================
    // Scenario Fixtures
    // =========================================================================

    /// Create the default scenario used by [`MockServer::start`](super::MockServer::start).
    ///
    /// Domain `foobar` holds application `blog` (php-5.4 with mysql-5.5).
    pub fn default_scenario() -> DefaultScenario {
        let mut domain = MockDomain::new("foobar");
        let mut blog = Self::application_with("blog", "php-5.4", &["mysql-5.5"]);
        blog.uuid = "5339ad3de0b8cd7d6b000001".to_string();
        domain.applications.push(blog);

        DefaultScenario {
            domains: vec![domain],
            catalog: Self::default_catalog(),
        }
    }
}
