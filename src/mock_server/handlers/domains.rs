//! Domain endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;

use super::{acknowledge, domain_not_found, failure, failure_on, message, respond, Reply, SharedState};
use crate::mock_server::render;
use crate::mock_server::state::{MockDomain, MockState};
use crate::Severity;

/// Parameters for creating or renaming a domain.
#[derive(Debug, Default, Deserialize)]
pub struct DomainParams {
    pub name: Option<String>,
}

/// Query parameters for deleting a domain.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteDomainQuery {
    pub force: Option<bool>,
}

/// Check a requested namespace: alphanumeric, at most 16 characters, free.
fn valid_namespace(state: &MockState, name: Option<&str>) -> Result<String, Response> {
    let name = name.unwrap_or_default();
    if name.is_empty() || name.len() > 16 || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(failure_on(
            StatusCode::UNPROCESSABLE_ENTITY,
            106,
            Some("name"),
            format!("Invalid namespace '{name}'. Namespace must be alphanumeric with a maximum of 16 characters."),
        ));
    }
    if state.namespace_taken(name) {
        return Err(failure_on(
            StatusCode::UNPROCESSABLE_ENTITY,
            103,
            Some("name"),
            format!("Namespace '{name}' is already in use. Please choose another."),
        ));
    }
    Ok(name.to_string())
}

/// GET /domains
pub async fn list_domains(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    let domains: Vec<_> = state
        .domains
        .iter()
        .map(|d| render::domain_dto(&state, d))
        .collect();
    respond(StatusCode::OK, "domains", domains, vec![])
}

/// POST /domains
pub async fn create_domain(
    State(state): State<SharedState>,
    Json(params): Json<DomainParams>,
) -> Reply {
    let mut state = state.write().await;
    let id = valid_namespace(&state, params.name.as_deref())?;
    state.domains.push(MockDomain::new(&id));

    let domain = state.domain(&id).map(|d| render::domain_dto(&state, d));
    Ok(respond(
        StatusCode::CREATED,
        "domain",
        domain,
        vec![message(Severity::Info, Some(0), format!("Domain '{id}' created."))],
    ))
}

/// GET /domain/{id}
pub async fn get_domain(State(state): State<SharedState>, Path(id): Path<String>) -> Reply {
    let state = state.read().await;
    let domain = state.domain(&id).ok_or_else(|| domain_not_found(&id))?;
    Ok(respond(StatusCode::OK, "domain", render::domain_dto(&state, domain), vec![]))
}

/// PUT /domain/{id}
pub async fn update_domain(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(params): Json<DomainParams>,
) -> Reply {
    let mut state = state.write().await;
    let domain = state.domain(&id).ok_or_else(|| domain_not_found(&id))?;
    if !domain.applications.is_empty() {
        return Err(failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            128,
            "Domain contains applications. Delete applications first before changing the domain namespace.",
        ));
    }
    let new_id = valid_namespace(&state, params.name.as_deref())?;
    if let Some(domain) = state.domain_mut(&id) {
        domain.id = new_id.clone();
    }

    let domain = state.domain(&new_id).map(|d| render::domain_dto(&state, d));
    Ok(respond(
        StatusCode::OK,
        "domain",
        domain,
        vec![message(
            Severity::Info,
            Some(0),
            format!("Domain '{id}' renamed to '{new_id}'."),
        )],
    ))
}

/// DELETE /domain/{id}
pub async fn delete_domain(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteDomainQuery>,
) -> Reply {
    let mut state = state.write().await;
    let index = state
        .domains
        .iter()
        .position(|d| d.id == id)
        .ok_or_else(|| domain_not_found(&id))?;
    if !state.domains[index].applications.is_empty() && !query.force.unwrap_or(false) {
        return Err(failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            128,
            "Domain contains applications. Delete applications first or set force to true.",
        ));
    }
    state.domains.remove(index);
    Ok(acknowledge(format!("Domain '{id}' deleted.")))
}
