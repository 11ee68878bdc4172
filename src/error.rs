//! Error types for OpenShift API operations.

use thiserror::Error;

use crate::http::HttpMethod;
use crate::messages::Messages;

/// Errors that can occur during OpenShift API operations.
#[derive(Debug, Error)]
pub enum OpenShiftError {
    /// Configuration is missing or incomplete.
    #[error("OpenShift configuration required: {0}")]
    ConfigMissing(String),

    /// The resource does not offer the requested operation.
    ///
    /// Raised when the server did not send a link for the operation, which
    /// means it is not permitted in the entity's current state.
    #[error("{resource} does not support operation {operation}")]
    UnsupportedOperation {
        resource: &'static str,
        operation: String,
    },

    /// Request parameters do not satisfy the link's declared parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The server answered with a non-success status.
    #[error("{method} {url} failed with status {status}: {}", summary(.messages, .body))]
    Endpoint {
        method: HttpMethod,
        url: String,
        status: u16,
        messages: Messages,
        body: String,
    },

    /// The request did not complete in time.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The deployed application did not answer.
    #[error("Application not available: {0}")]
    ApplicationNotAvailable(String),

    /// A success response did not carry what the operation expects.
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[source] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl From<reqwest::Error> for OpenShiftError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let url = err
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "<unknown>".to_string());
            return Self::Timeout { url };
        }
        Self::HttpError(err)
    }
}

impl OpenShiftError {
    /// Structured server messages carried by an endpoint error.
    pub fn messages(&self) -> Option<&Messages> {
        match self {
            Self::Endpoint { messages, .. } => Some(messages),
            _ => None,
        }
    }

    /// HTTP status of an endpoint error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Endpoint { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// First exit code reported by the server, if any.
    pub fn exit_code(&self) -> Option<i32> {
        self.messages().and_then(|m| m.exit_codes().next())
    }

    /// Whether this error is a transport timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether this error is an unsupported-operation error.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }

    /// Turn a 404 endpoint error into [`OpenShiftError::NotFound`].
    pub(crate) fn not_found_as(self, entity_type: &'static str, id: &str) -> Self {
        match self {
            Self::Endpoint { status: 404, .. } => Self::NotFound {
                entity_type,
                id: id.to_string(),
            },
            other => other,
        }
    }
}

fn summary(messages: &Messages, body: &str) -> String {
    let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
    if texts.is_empty() {
        body.to_string()
    } else {
        texts.join("; ")
    }
}

/// Result type alias for OpenShift operations.
pub type Result<T> = core::result::Result<T, OpenShiftError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Message, Severity};

    fn endpoint_error(status: u16) -> OpenShiftError {
        OpenShiftError::Endpoint {
            method: HttpMethod::Delete,
            url: "https://broker/rest/domain/foo".to_string(),
            status,
            messages: Messages::from(vec![Message {
                text: "Domain contains applications".to_string(),
                severity: Severity::Error,
                exit_code: Some(128),
                field: None,
            }]),
            body: String::new(),
        }
    }

    #[test]
    fn test_endpoint_error_display_uses_messages() {
        let err = endpoint_error(422);
        let text = err.to_string();
        assert!(text.contains("DELETE"));
        assert!(text.contains("422"));
        assert!(text.contains("Domain contains applications"));
        assert_eq!(err.exit_code(), Some(128));
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_not_found_mapping_only_for_404() {
        let err = endpoint_error(404).not_found_as("domain", "foo");
        assert!(matches!(err, OpenShiftError::NotFound { entity_type: "domain", .. }));

        let err = endpoint_error(422).not_found_as("domain", "foo");
        assert!(matches!(err, OpenShiftError::Endpoint { .. }));
    }
}
