//! Cartridge catalog handler.

use axum::{extract::State, http::StatusCode, response::Response};

use super::{respond, SharedState};

/// GET /cartridges
pub async fn list_cartridges(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    respond(StatusCode::OK, "cartridges", state.catalog.clone(), vec![])
}
