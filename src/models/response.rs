//! Response envelope shared by every broker endpoint.

use serde::{Deserialize, Serialize};

use crate::messages::Messages;

/// The envelope wrapping every broker response.
///
/// `data` is absent (or `null`) in error responses and in responses to
/// deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestResponse<T> {
    /// Data type tag (e.g. `"domain"`, `"applications"`, `"links"`).
    #[serde(rename = "type", default)]
    pub data_type: Option<String>,

    /// Symbolic status (e.g. `"ok"`, `"created"`, `"unprocessable_entity"`).
    #[serde(default)]
    pub status: Option<String>,

    /// API version that produced the response.
    #[serde(default)]
    pub version: Option<String>,

    pub data: Option<T>,

    #[serde(default)]
    pub messages: Messages,
}

impl<T> RestResponse<T> {
    /// Wrap data in an envelope with a custom status.
    pub fn with_status(data_type: &str, status: &str, data: T) -> Self {
        Self {
            data_type: Some(data_type.to_string()),
            status: Some(status.to_string()),
            version: Some(crate::http::API_VERSION.to_string()),
            data: Some(data),
            messages: Messages::new(),
        }
    }

    /// Attach messages to the envelope.
    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }
}
