//! Rendering of mock state into broker DTOs.
//!
//! Every rendered entity carries the links a real broker would send, with
//! absolute hrefs pointing back at the mock server.

use serde_json::{json, Value};
use urlencoding::encode;

use super::state::{MockApplication, MockDomain, MockState, HAPROXY};
use crate::{
    ApplicationDto, CartridgeDto, CartridgeType, DomainDto, GearDto, GearGroupCartridgeDto,
    GearGroupDto, HttpMethod, Link, LinkParameter, Links, UserDto,
};

fn param(name: &str, param_type: &str, valid_options: Vec<Value>) -> LinkParameter {
    LinkParameter {
        name: name.to_string(),
        param_type: Some(param_type.to_string()),
        description: None,
        valid_options,
        default_value: None,
    }
}

fn link(rel: &str, method: HttpMethod, href: String) -> Link {
    let mut link = Link::new(method, href);
    link.rel = Some(rel.to_string());
    link
}

fn requiring(mut link: Link, params: Vec<LinkParameter>) -> Link {
    link.required_params = params;
    link
}

fn accepting(mut link: Link, params: Vec<LinkParameter>) -> Link {
    link.optional_params = params;
    link
}

fn links<const N: usize>(entries: [(&str, Link); N]) -> Links {
    entries
        .into_iter()
        .map(|(name, link)| (name.to_string(), link))
        .collect()
}

pub fn domain_href(state: &MockState, domain: &str) -> String {
    format!("{}/domain/{}", state.base_url, encode(domain))
}

pub fn application_href(state: &MockState, domain: &str, name: &str) -> String {
    format!("{}/application/{}", domain_href(state, domain), encode(name))
}

/// Links of the API root.
pub fn api_links(state: &MockState) -> Links {
    let base = &state.base_url;
    links([
        ("GET_USER", link("Get user", HttpMethod::Get, format!("{base}/user"))),
        ("LIST_DOMAINS", link("List domains", HttpMethod::Get, format!("{base}/domains"))),
        (
            "ADD_DOMAIN",
            requiring(
                link("Create domain", HttpMethod::Post, format!("{base}/domains")),
                vec![param("name", "string", vec![])],
            ),
        ),
        (
            "LIST_CARTRIDGES",
            link("List cartridges", HttpMethod::Get, format!("{base}/cartridges")),
        ),
    ])
}

pub fn user_dto(state: &MockState) -> UserDto {
    UserDto {
        id: Some(format!("{:024x}", state.login.len())),
        login: state.login.clone(),
        consumed_gears: state.consumed_gears(),
        max_gears: state.max_gears,
        plan_id: Some("free".to_string()),
        links: Links::new(),
    }
}

pub fn domain_dto(state: &MockState, domain: &MockDomain) -> DomainDto {
    let href = domain_href(state, &domain.id);
    let gear_sizes: Vec<Value> = state.gear_profiles.iter().map(|p| json!(p)).collect();

    DomainDto {
        id: domain.id.clone(),
        suffix: Some(state.suffix.clone()),
        creation_time: Some(domain.created),
        links: links([
            ("GET", link("Get domain", HttpMethod::Get, href.clone())),
            (
                "UPDATE",
                requiring(
                    link("Update domain", HttpMethod::Put, href.clone()),
                    vec![param("name", "string", vec![])],
                ),
            ),
            (
                "DELETE",
                accepting(
                    link("Delete domain", HttpMethod::Delete, href.clone()),
                    vec![param("force", "boolean", vec![json!(true), json!(false)])],
                ),
            ),
            (
                "LIST_APPLICATIONS",
                link("List applications", HttpMethod::Get, format!("{href}/applications")),
            ),
            (
                "ADD_APPLICATION",
                accepting(
                    requiring(
                        link("Create application", HttpMethod::Post, format!("{href}/applications")),
                        vec![param("name", "string", vec![])],
                    ),
                    vec![
                        param("cartridges", "array", vec![]),
                        param("scale", "boolean", vec![json!(true), json!(false)]),
                        param("gear_size", "string", gear_sizes),
                        param("initial_git_url", "string", vec![]),
                        param("environment_variables", "array", vec![]),
                    ],
                ),
            ),
        ]),
    }
}

pub fn application_dto(state: &MockState, domain: &str, app: &MockApplication) -> ApplicationDto {
    let href = application_href(state, domain, &app.name);
    let events = format!("{href}/events");
    let event = |rel: &str, name: &str| {
        requiring(
            link(rel, HttpMethod::Post, events.clone()),
            vec![param("event", "string", vec![json!(name)])],
        )
    };
    let alias_event = |rel: &str, name: &str| {
        requiring(
            link(rel, HttpMethod::Post, events.clone()),
            vec![
                param("event", "string", vec![json!(name)]),
                param("alias", "string", vec![]),
            ],
        )
    };

    let mut app_links = links([
        ("GET", link("Get application", HttpMethod::Get, href.clone())),
        ("DELETE", link("Delete application", HttpMethod::Delete, href.clone())),
        ("START", event("Start application", "start")),
        ("STOP", event("Stop application", "stop")),
        ("FORCE_STOP", event("Force stop application", "force-stop")),
        ("RESTART", event("Restart application", "restart")),
        ("ADD_ALIAS", alias_event("Add alias", "add-alias")),
        ("REMOVE_ALIAS", alias_event("Remove alias", "remove-alias")),
        (
            "LIST_CARTRIDGES",
            link("List embedded cartridges", HttpMethod::Get, format!("{href}/cartridges")),
        ),
        (
            "ADD_CARTRIDGE",
            accepting(
                link("Embed a cartridge", HttpMethod::Post, format!("{href}/cartridges")),
                vec![param("name", "string", vec![]), param("url", "string", vec![])],
            ),
        ),
        (
            "GET_GEAR_GROUPS",
            link("Get gear groups", HttpMethod::Get, format!("{href}/gear_groups")),
        ),
    ]);
    if app.scalable {
        app_links.insert("SCALE_UP".to_string(), event("Scale up", "scale-up"));
        app_links.insert("SCALE_DOWN".to_string(), event("Scale down", "scale-down"));
    }

    let host = format!("{}-{}.{}", app.name.to_lowercase(), domain, state.suffix);
    ApplicationDto {
        name: app.name.clone(),
        uuid: app.uuid.clone(),
        domain_id: domain.to_string(),
        creation_time: Some(app.created),
        framework: Some(app.framework.clone()),
        app_url: Some(format!(
            "{}/app/{}/{}/",
            state.base_url,
            encode(domain),
            encode(&app.name)
        )),
        git_url: Some(format!("ssh://{}@{host}/~/git/{}.git/", app.uuid, app.name)),
        initial_git_url: app.initial_git_url.clone(),
        scalable: app.scalable,
        gear_profile: Some(app.gear_profile.clone()),
        aliases: app.aliases.clone(),
        gear_count: Some(app.consumed_gears()),
        cartridges: None,
        links: app_links,
    }
}

/// A cartridge deployed in an application.
pub fn cartridge_dto(
    state: &MockState,
    domain: &str,
    app: &MockApplication,
    name: &str,
) -> CartridgeDto {
    let cartridge_type = state.cartridge_type(app, name);
    let href = format!(
        "{}/cartridge/{}",
        application_href(state, domain, &app.name),
        encode(name)
    );
    let group = app.group_of(name);
    let storage = group.as_ref().and_then(|g| app.storage.get(g)).copied();

    let mut cartridge_links = links([("GET", link("Get cartridge", HttpMethod::Get, href.clone()))]);
    if name != HAPROXY {
        cartridge_links.insert(
            "UPDATE".to_string(),
            accepting(
                link("Update cartridge", HttpMethod::Put, href.clone()),
                vec![
                    param("additional_gear_storage", "integer", vec![]),
                    param("scales_from", "integer", vec![]),
                    param("scales_to", "integer", vec![]),
                ],
            ),
        );
    }
    if cartridge_type == CartridgeType::Embedded && name != HAPROXY {
        cartridge_links.insert(
            "DELETE".to_string(),
            link("Remove cartridge", HttpMethod::Delete, href),
        );
    }

    let catalog = state.catalog_cartridge(name);
    CartridgeDto {
        name: name.to_string(),
        display_name: catalog.and_then(|c| c.display_name.clone()),
        description: catalog.and_then(|c| c.description.clone()),
        cartridge_type,
        url: app
            .cartridge_urls
            .get(name)
            .cloned()
            .or_else(|| catalog.and_then(|c| c.url.clone())),
        obsolete: false,
        additional_gear_storage: storage,
        scales_from: Some(1),
        scales_to: Some(if app.scalable { -1 } else { 1 }),
        gear_profile: Some(app.gear_profile.clone()),
        links: cartridge_links,
    }
}

/// Cartridges of an application: framework, load balancer, embedded.
pub fn application_cartridges(
    state: &MockState,
    domain: &str,
    app: &MockApplication,
) -> Vec<CartridgeDto> {
    let mut names = vec![app.framework.as_str()];
    if app.scalable {
        names.push(HAPROXY);
    }
    names.extend(app.embedded.iter().map(String::as_str));
    names
        .into_iter()
        .map(|name| cartridge_dto(state, domain, app, name))
        .collect()
}

pub fn gear_groups(state: &MockState, domain: &str, app: &MockApplication) -> Vec<GearGroupDto> {
    app.gear_groups()
        .into_iter()
        .enumerate()
        .map(|(index, (group, cartridges))| {
            let gear_count = if index == 0 { app.gear_count } else { 1 };
            let gears = (0..gear_count)
                .map(|i| {
                    let id = format!("{}{index}{i}", app.uuid);
                    GearDto {
                        ssh_url: Some(format!(
                            "ssh://{id}@{}-{domain}.{}",
                            app.name.to_lowercase(),
                            state.suffix
                        )),
                        id,
                        state: app.state,
                    }
                })
                .collect();
            GearGroupDto {
                uuid: format!("{}g{index}", app.uuid),
                additional_storage: app.storage.get(&group).copied(),
                name: group,
                gear_profile: Some(app.gear_profile.clone()),
                gears,
                cartridges: cartridges
                    .into_iter()
                    .map(|name| GearGroupCartridgeDto {
                        name,
                        display_name: None,
                    })
                    .collect(),
                scales_from: Some(1),
                scales_to: Some(if app.scalable { -1 } else { 1 }),
            }
        })
        .collect()
}
