//! API root, user and application probe handlers.

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{application_not_found, failure, respond, SharedState};
use crate::mock_server::render;
use crate::GearState;

/// GET /api
pub async fn get_api(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    respond(StatusCode::OK, "links", render::api_links(&state), vec![])
}

/// GET /user
pub async fn get_user(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    respond(StatusCode::OK, "user", render::user_dto(&state), vec![])
}

/// GET /app/{domain}/{name}/
///
/// Stands in for the deployed application itself: answers only while the
/// application is started.
pub async fn probe_application(
    State(state): State<SharedState>,
    Path((domain, name)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    match state.application(&domain, &name) {
        Some(app) if app.state == GearState::Started => {
            (StatusCode::OK, format!("Welcome to {}", app.name)).into_response()
        }
        Some(_) => (StatusCode::SERVICE_UNAVAILABLE, "Service Temporarily Unavailable").into_response(),
        None => application_not_found(&name),
    }
}

/// Reject requests without the configured bearer token.
pub async fn require_token(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let required = state.read().await.required_token.clone();
    if let Some(token) = required {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if presented != Some(token.as_str()) {
            return failure(StatusCode::UNAUTHORIZED, 1, "Access denied.");
        }
    }
    next.run(request).await
}
