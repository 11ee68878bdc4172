//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{
    ApplicationResource, Cartridge, CartridgeDto, DomainResource, GearGroupResource,
    UserResource,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Trait for human-readable key-value output.
///
/// Implemented by resources to provide formatted output suitable for
/// terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(kind: &str, id: &str) -> Vec<String> {
    let title = format!("{kind}: {id}");
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

impl PrettyPrint for UserResource {
    fn pretty_print(&self) -> String {
        let mut lines = header("User", self.login());

        if let Some(id) = self.id() {
            lines.push(format!("Id:             {}", id));
        }

        lines.push(format!(
            "Gears:          {} of {} used",
            self.consumed_gears(),
            self.max_gears()
        ));

        if let Some(plan) = self.plan_id() {
            lines.push(format!("Plan:           {}", plan));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for DomainResource {
    fn pretty_print(&self) -> String {
        let mut lines = header("Domain", self.id());

        if let Some(suffix) = self.suffix() {
            lines.push(format!("Suffix:         {}", suffix));
        }

        if let Some(created) = self.creation_time() {
            lines.push(format!("Created:        {}", created.format(TIME_FORMAT)));
        }

        let profiles = self.available_gear_profiles();
        if !profiles.is_empty() {
            lines.push(format!("Gear Profiles:  {}", profiles.join(", ")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for ApplicationResource {
    fn pretty_print(&self) -> String {
        let mut lines = header("Application", self.name());
        lines.push(format!("Domain:         {}", self.domain_id()));

        if let Some(framework) = self.framework() {
            lines.push(format!("Framework:      {}", framework));
        }

        lines.push(format!(
            "Scalable:       {}",
            if self.scale().is_scalable() { "yes" } else { "no" }
        ));

        if let Some(profile) = self.gear_profile() {
            lines.push(format!("Gear Profile:   {}", profile));
        }

        if let Some(url) = self.application_url() {
            lines.push(format!("URL:            {}", url));
        }

        if let Some(git) = self.git_url() {
            lines.push(format!("Git:            {}", git));
        }

        if !self.aliases().is_empty() {
            lines.push(format!("Aliases:        {}", self.aliases().join(", ")));
        }

        if let Some(created) = self.creation_time() {
            lines.push(format!("Created:        {}", created.format(TIME_FORMAT)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for GearGroupResource {
    fn pretty_print(&self) -> String {
        let mut lines = header("Gear Group", self.name());
        lines.push(format!("Cartridges:     {}", self.cartridge_names().join(", ")));

        if let Some(profile) = self.gear_profile() {
            lines.push(format!("Gear Profile:   {}", profile));
        }

        if let Some(storage) = self.additional_storage() {
            lines.push(format!("Extra Storage:  {} GB", storage));
        }

        for gear in self.gears() {
            lines.push(format!("Gear:           {} ({:?})", gear.id(), gear.state()));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for CartridgeDto {
    fn pretty_print(&self) -> String {
        let mut lines = header("Cartridge", &self.name);
        lines.push(format!("Type:           {}", self.cartridge_type));

        if let Some(ref display_name) = self.display_name {
            lines.push(format!("Display Name:   {}", display_name));
        }

        if let Some(ref url) = self.url {
            lines.push(format!("Manifest:       {}", url));
        }

        if self.obsolete {
            lines.push("Obsolete:       yes".to_string());
        }

        lines.join("\n")
    }
}

/// One line per deployed cartridge, used under an application.
pub fn cartridge_line<C: Cartridge>(cartridge: &C) -> String {
    let storage = cartridge
        .reported_gear_storage()
        .map(|gb| format!(", +{gb} GB"))
        .unwrap_or_default();
    format!("{} ({}{})", cartridge.name(), cartridge.cartridge_type(), storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GearGroupDto;

    #[test]
    fn test_cartridge_pretty_print_format() {
        let cartridge: CartridgeDto = serde_json::from_value(serde_json::json!({
            "name": "mysql-5.5",
            "display_name": "MySQL 5.5",
            "type": "embedded",
            "obsolete": true
        }))
        .unwrap();

        let output = cartridge.pretty_print();
        assert!(output.starts_with("Cartridge: mysql-5.5"));
        assert!(output.contains("Type:           embedded"));
        assert!(output.contains("Obsolete:       yes"));
    }

    #[test]
    fn test_gear_group_pretty_print_lists_gears() {
        let dto: GearGroupDto = serde_json::from_value(serde_json::json!({
            "id": "gg1",
            "name": "web",
            "additional_gear_storage": 3,
            "gears": [{"id": "g1", "state": "started"}, {"id": "g2", "state": "idle"}],
            "cartridges": [{"name": "php-5.4"}]
        }))
        .unwrap();

        let output = GearGroupResource::from(dto).pretty_print();
        assert!(output.contains("Extra Storage:  3 GB"));
        assert!(output.contains("g1 (Started)"));
        assert!(output.contains("g2 (Idle)"));
    }
}
