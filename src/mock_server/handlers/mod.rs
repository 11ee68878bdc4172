//! HTTP request handlers for the mock server.

pub mod api;
pub mod applications;
pub mod cartridges;
pub mod domains;

pub use api::*;
pub use applications::*;
pub use cartridges::*;
pub use domains::*;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::{Message, Messages, RestResponse, Severity, API_VERSION};

pub(crate) type SharedState = Arc<RwLock<MockState>>;

/// Handler result; both sides are complete broker responses.
pub(crate) type Reply = Result<Response, Response>;

fn status_name(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "ok",
        StatusCode::CREATED => "created",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::UNPROCESSABLE_ENTITY => "unprocessable_entity",
        _ => "error",
    }
}

pub(crate) fn message(severity: Severity, exit_code: Option<i32>, text: impl Into<String>) -> Message {
    Message {
        text: text.into(),
        severity,
        exit_code,
        field: None,
    }
}

/// A successful envelope carrying data.
pub(crate) fn respond<T: Serialize>(
    status: StatusCode,
    data_type: &str,
    data: T,
    messages: Vec<Message>,
) -> Response {
    let body = RestResponse::with_status(data_type, status_name(status), data)
        .with_messages(Messages::from(messages));
    (status, Json(body)).into_response()
}

/// A successful envelope without data, as sent for deletes.
pub(crate) fn acknowledge(text: impl Into<String>) -> Response {
    let body = RestResponse::<Value> {
        data_type: None,
        status: Some(status_name(StatusCode::OK).to_string()),
        version: Some(API_VERSION.to_string()),
        data: None,
        messages: Messages::from(vec![message(Severity::Info, Some(0), text)]),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// An error envelope with one message.
pub(crate) fn failure(status: StatusCode, exit_code: i32, text: impl Into<String>) -> Response {
    failure_on(status, exit_code, None, text)
}

/// An error envelope whose message refers to a request field.
pub(crate) fn failure_on(
    status: StatusCode,
    exit_code: i32,
    field: Option<&str>,
    text: impl Into<String>,
) -> Response {
    let mut error = message(Severity::Error, Some(exit_code), text);
    error.field = field.map(str::to_string);
    let body = RestResponse::<Value> {
        data_type: None,
        status: Some(status_name(status).to_string()),
        version: Some(API_VERSION.to_string()),
        data: None,
        messages: Messages::from(vec![error]),
    };
    (status, Json(body)).into_response()
}

pub(crate) fn domain_not_found(id: &str) -> Response {
    failure(
        StatusCode::NOT_FOUND,
        127,
        format!("Domain '{id}' not found."),
    )
}

pub(crate) fn application_not_found(name: &str) -> Response {
    failure(
        StatusCode::NOT_FOUND,
        101,
        format!("Application '{name}' not found."),
    )
}
