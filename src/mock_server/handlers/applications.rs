//! Application, embedded cartridge and gear group handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use url::Url;

use super::{
    acknowledge, application_not_found, domain_not_found, failure, failure_on, message, respond,
    Reply, SharedState,
};
use crate::mock_server::render;
use crate::mock_server::state::{MockApplication, MockState, HAPROXY};
use crate::{CartridgeType, GearState, Message, Severity, PROPERTY_ADDITIONAL_GEAR_STORAGE};

/// A cartridge requested by name or by manifest URL.
#[derive(Debug, Default, Deserialize)]
pub struct CartridgeRef {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Parameters for creating an application.
#[derive(Debug, Default, Deserialize)]
pub struct CreateApplicationParams {
    pub name: Option<String>,
    #[serde(default)]
    pub cartridges: Vec<CartridgeRef>,
    #[serde(default)]
    pub scale: bool,
    pub gear_size: Option<String>,
    pub initial_git_url: Option<String>,
}

/// Parameters of an application event.
#[derive(Debug, Default, Deserialize)]
pub struct EventParams {
    pub event: Option<String>,
    pub alias: Option<String>,
}

/// Parameters for updating a deployed cartridge.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCartridgeParams {
    pub additional_gear_storage: Option<u32>,
}

fn unprocessable(exit_code: i32, text: impl Into<String>) -> Response {
    failure(StatusCode::UNPROCESSABLE_ENTITY, exit_code, text)
}

fn find<'a>(state: &'a MockState, domain: &str, name: &str) -> Result<&'a MockApplication, Response> {
    state
        .domain(domain)
        .ok_or_else(|| domain_not_found(domain))?
        .application(name)
        .ok_or_else(|| application_not_found(name))
}

fn find_mut<'a>(
    state: &'a mut MockState,
    domain: &str,
    name: &str,
) -> Result<&'a mut MockApplication, Response> {
    state
        .domain_mut(domain)
        .ok_or_else(|| domain_not_found(domain))?
        .application_mut(name)
        .ok_or_else(|| application_not_found(name))
}

/// Resolve a requested cartridge to a name, and its manifest URL when
/// downloadable.
fn resolve_cartridge(
    state: &MockState,
    requested: &CartridgeRef,
    expected: CartridgeType,
) -> Result<(String, Option<Url>), Response> {
    if let Some(raw) = requested.url.as_deref() {
        let url = Url::parse(raw)
            .map_err(|_| unprocessable(109, format!("Invalid cartridge url '{raw}'.")))?;
        let name = url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map(|s| format!("custom-{}", s.trim_end_matches(".yml")))
            .unwrap_or_else(|| "custom".to_string());
        return Ok((name, Some(url)));
    }

    let name = requested.name.as_deref().unwrap_or_default();
    match state.catalog_cartridge(name) {
        Some(cartridge) if cartridge.cartridge_type == expected => Ok((name.to_string(), None)),
        Some(_) => Err(unprocessable(
            109,
            format!("Cartridge '{name}' is not {expected}."),
        )),
        None => Err(unprocessable(109, format!("Invalid cartridge '{name}' specified."))),
    }
}

fn added_message(name: &str) -> Message {
    message(
        Severity::Result,
        Some(0),
        format!("Added {name} to application. Connection URL: {name}://$OPENSHIFT_{}_HOST/", name.to_uppercase()),
    )
}

/// GET /domain/{id}/applications
pub async fn list_applications(
    State(state): State<SharedState>,
    Path(domain): Path<String>,
) -> Reply {
    let state = state.read().await;
    let found = state.domain(&domain).ok_or_else(|| domain_not_found(&domain))?;
    let applications: Vec<_> = found
        .applications
        .iter()
        .map(|app| render::application_dto(&state, &found.id, app))
        .collect();
    Ok(respond(StatusCode::OK, "applications", applications, vec![]))
}

/// POST /domain/{id}/applications
pub async fn create_application(
    State(state): State<SharedState>,
    Path(domain): Path<String>,
    Json(params): Json<CreateApplicationParams>,
) -> Reply {
    let mut state = state.write().await;
    let found = state.domain(&domain).ok_or_else(|| domain_not_found(&domain))?;

    let name = params.name.unwrap_or_default();
    if name.is_empty() || name.len() > 32 || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(failure_on(
            StatusCode::UNPROCESSABLE_ENTITY,
            105,
            Some("name"),
            format!("Invalid name '{name}'. Name must be alphanumeric with a maximum of 32 characters."),
        ));
    }
    if found.application(&name).is_some() {
        return Err(failure_on(
            StatusCode::UNPROCESSABLE_ENTITY,
            100,
            Some("name"),
            format!("The supplied application name '{name}' already exists"),
        ));
    }

    let (web, embedded) = params
        .cartridges
        .split_first()
        .ok_or_else(|| unprocessable(109, "Each application must contain one web cartridge."))?;
    let (framework, framework_url) = resolve_cartridge(&state, web, CartridgeType::Standalone)?;
    let mut embedded_names = Vec::new();
    let mut cartridge_urls = std::collections::BTreeMap::new();
    if let Some(url) = framework_url {
        cartridge_urls.insert(framework.clone(), url);
    }
    for requested in embedded {
        let (cartridge, url) = resolve_cartridge(&state, requested, CartridgeType::Embedded)?;
        if let Some(url) = url {
            cartridge_urls.insert(cartridge.clone(), url);
        }
        embedded_names.push(cartridge);
    }

    let gear_profile = match params.gear_size {
        Some(size) if !state.gear_profiles.contains(&size) => {
            return Err(failure_on(
                StatusCode::UNPROCESSABLE_ENTITY,
                134,
                Some("gear_size"),
                format!("Invalid size: {size}. Acceptable values are: {}", state.gear_profiles.join(", ")),
            ));
        }
        Some(size) => size,
        None => state.gear_profiles.first().cloned().unwrap_or_else(|| "small".to_string()),
    };

    let app = MockApplication {
        uuid: state.next_uuid(),
        name: name.clone(),
        framework,
        scalable: params.scale,
        gear_profile,
        aliases: Vec::new(),
        state: GearState::Started,
        gear_count: 1,
        embedded: embedded_names,
        storage: Default::default(),
        cartridge_urls,
        initial_git_url: params.initial_git_url,
        created: Utc::now(),
    };
    if state.consumed_gears() + app.consumed_gears() > state.max_gears {
        return Err(unprocessable(
            104,
            format!("Unable to create application: you are limited to {} gears.", state.max_gears),
        ));
    }

    let mut messages = vec![message(
        Severity::Info,
        Some(0),
        format!("Application {name} was created."),
    )];
    messages.extend(app.embedded.iter().map(|c| added_message(c)));

    let dto = render::application_dto(&state, &domain, &app);
    if let Some(d) = state.domain_mut(&domain) {
        d.applications.push(app);
    }
    Ok(respond(StatusCode::CREATED, "application", dto, messages))
}

/// GET /domain/{id}/application/{name}
pub async fn get_application(
    State(state): State<SharedState>,
    Path((domain, name)): Path<(String, String)>,
) -> Reply {
    let state = state.read().await;
    let app = find(&state, &domain, &name)?;
    Ok(respond(
        StatusCode::OK,
        "application",
        render::application_dto(&state, &domain, app),
        vec![],
    ))
}

/// DELETE /domain/{id}/application/{name}
pub async fn delete_application(
    State(state): State<SharedState>,
    Path((domain, name)): Path<(String, String)>,
) -> Reply {
    let mut state = state.write().await;
    let found = state.domain_mut(&domain).ok_or_else(|| domain_not_found(&domain))?;
    let index = found
        .applications
        .iter()
        .position(|a| a.name.eq_ignore_ascii_case(&name))
        .ok_or_else(|| application_not_found(&name))?;
    let removed = found.applications.remove(index);
    Ok(acknowledge(format!("Application {} is deleted.", removed.name)))
}

/// POST /domain/{id}/application/{name}/events
pub async fn application_event(
    State(state): State<SharedState>,
    Path((domain, name)): Path<(String, String)>,
    Json(params): Json<EventParams>,
) -> Reply {
    let mut state = state.write().await;
    let max_gears = state.max_gears;
    let consumed = state.consumed_gears();
    let app = find_mut(&mut state, &domain, &name)?;

    let event = params.event.unwrap_or_default();
    let text = match event.as_str() {
        "start" => {
            app.state = GearState::Started;
            format!("Application {} has started", app.name)
        }
        "stop" | "force-stop" => {
            app.state = GearState::Stopped;
            format!("Application {} has stopped", app.name)
        }
        "restart" => {
            app.state = GearState::Started;
            format!("Application {} has restarted", app.name)
        }
        "scale-up" if app.scalable => {
            if consumed >= max_gears {
                return Err(unprocessable(104, format!("You are limited to {max_gears} gears.")));
            }
            app.gear_count += 1;
            format!("Application {} has scaled up", app.name)
        }
        "scale-down" if app.scalable => {
            if app.gear_count <= 1 {
                return Err(unprocessable(
                    168,
                    "Cannot scale down below gear limit of 1.",
                ));
            }
            app.gear_count -= 1;
            format!("Application {} has scaled down", app.name)
        }
        "scale-up" | "scale-down" => {
            return Err(unprocessable(255, format!("Application {} is not scalable.", app.name)));
        }
        "add-alias" | "remove-alias" => {
            let alias = params.alias.unwrap_or_default();
            if alias.is_empty() {
                return Err(failure_on(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    105,
                    Some("alias"),
                    "Alias is required.",
                ));
            }
            let existing = app.aliases.iter().position(|a| a.eq_ignore_ascii_case(&alias));
            match (event.as_str(), existing) {
                ("add-alias", Some(_)) => {
                    return Err(unprocessable(140, format!("Alias {alias} is already in use.")));
                }
                ("add-alias", None) => {
                    app.aliases.push(alias.clone());
                    format!("Application {} has added alias", app.name)
                }
                (_, Some(index)) => {
                    app.aliases.remove(index);
                    format!("Application {} has removed alias", app.name)
                }
                (_, None) => {
                    return Err(failure(
                        StatusCode::NOT_FOUND,
                        173,
                        format!("Alias {alias} does not exist for application {}.", app.name),
                    ));
                }
            }
        }
        other => {
            return Err(failure_on(
                StatusCode::UNPROCESSABLE_ENTITY,
                126,
                Some("event"),
                format!("Invalid application event '{other}' specified."),
            ));
        }
    };

    let app = app.clone();
    Ok(respond(
        StatusCode::OK,
        "application",
        render::application_dto(&state, &domain, &app),
        vec![message(Severity::Info, Some(0), text)],
    ))
}

/// GET /domain/{id}/application/{name}/cartridges
pub async fn list_application_cartridges(
    State(state): State<SharedState>,
    Path((domain, name)): Path<(String, String)>,
) -> Reply {
    let state = state.read().await;
    let app = find(&state, &domain, &name)?;
    Ok(respond(
        StatusCode::OK,
        "cartridges",
        render::application_cartridges(&state, &domain, app),
        vec![],
    ))
}

/// POST /domain/{id}/application/{name}/cartridges
pub async fn add_cartridge(
    State(state): State<SharedState>,
    Path((domain, name)): Path<(String, String)>,
    Json(params): Json<CartridgeRef>,
) -> Reply {
    let mut state = state.write().await;
    let (cartridge, url) = resolve_cartridge(&state, &params, CartridgeType::Embedded)?;
    let app = find(&state, &domain, &name)?;
    if app.has_cartridge(&cartridge) {
        return Err(unprocessable(
            136,
            format!("{cartridge} already embedded in '{}'", app.name),
        ));
    }
    if app.scalable && state.consumed_gears() >= state.max_gears {
        return Err(unprocessable(
            104,
            format!("You are limited to {} gears.", state.max_gears),
        ));
    }

    let app = find_mut(&mut state, &domain, &name)?;
    app.embedded.push(cartridge.clone());
    if let Some(url) = url {
        app.cartridge_urls.insert(cartridge.clone(), url);
    }
    let app = app.clone();
    Ok(respond(
        StatusCode::CREATED,
        "cartridge",
        render::cartridge_dto(&state, &domain, &app, &cartridge),
        vec![added_message(&cartridge)],
    ))
}

/// GET /domain/{id}/application/{name}/cartridge/{cartridge}
pub async fn get_cartridge(
    State(state): State<SharedState>,
    Path((domain, name, cartridge)): Path<(String, String, String)>,
) -> Reply {
    let state = state.read().await;
    let app = find(&state, &domain, &name)?;
    if !app.has_cartridge(&cartridge) {
        return Err(cartridge_not_found(&cartridge, &app.name));
    }
    Ok(respond(
        StatusCode::OK,
        "cartridge",
        render::cartridge_dto(&state, &domain, app, &cartridge),
        vec![],
    ))
}

/// PUT /domain/{id}/application/{name}/cartridge/{cartridge}
pub async fn update_cartridge(
    State(state): State<SharedState>,
    Path((domain, name, cartridge)): Path<(String, String, String)>,
    Json(params): Json<UpdateCartridgeParams>,
) -> Reply {
    let mut state = state.write().await;
    let app = find_mut(&mut state, &domain, &name)?;
    let group = app
        .group_of(&cartridge)
        .ok_or_else(|| cartridge_not_found(&cartridge, &name))?;
    if let Some(size) = params.additional_gear_storage {
        if size > 30 {
            return Err(failure_on(
                StatusCode::UNPROCESSABLE_ENTITY,
                166,
                Some(PROPERTY_ADDITIONAL_GEAR_STORAGE),
                "Storage request exceeds the maximum of 30 GB.",
            ));
        }
        if size == 0 {
            app.storage.remove(&group);
        } else {
            app.storage.insert(group, size);
        }
    }
    let app = app.clone();
    Ok(respond(
        StatusCode::OK,
        "cartridge",
        render::cartridge_dto(&state, &domain, &app, &cartridge),
        vec![],
    ))
}

/// DELETE /domain/{id}/application/{name}/cartridge/{cartridge}
pub async fn delete_cartridge(
    State(state): State<SharedState>,
    Path((domain, name, cartridge)): Path<(String, String, String)>,
) -> Reply {
    let mut state = state.write().await;
    let app = find_mut(&mut state, &domain, &name)?;
    if cartridge == app.framework || cartridge == HAPROXY {
        return Err(unprocessable(
            137,
            format!("{cartridge} is not an embedded cartridge and cannot be removed."),
        ));
    }
    let index = app
        .embedded
        .iter()
        .position(|c| *c == cartridge)
        .ok_or_else(|| cartridge_not_found(&cartridge, &name))?;
    app.embedded.remove(index);
    app.cartridge_urls.remove(&cartridge);
    if app.scalable {
        app.storage.remove(&cartridge);
    }
    Ok(acknowledge(format!("Removed {cartridge} from application {name}")))
}

/// GET /domain/{id}/application/{name}/gear_groups
pub async fn list_gear_groups(
    State(state): State<SharedState>,
    Path((domain, name)): Path<(String, String)>,
) -> Reply {
    let state = state.read().await;
    let app = find(&state, &domain, &name)?;
    Ok(respond(
        StatusCode::OK,
        "gear_groups",
        render::gear_groups(&state, &domain, app),
        vec![],
    ))
}

fn cartridge_not_found(cartridge: &str, application: &str) -> Response {
    failure(
        StatusCode::NOT_FOUND,
        129,
        format!("Cartridge {cartridge} not embedded within application {application}"),
    )
}
