//! Structured messages returned by the broker.
//!
//! Every response envelope carries a list of messages. Each message has a
//! severity, an optional exit code and an optional field it refers to.
//! Messages without a field belong to [`Field::Default`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Message severity as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    /// Output of an operation, e.g. credentials of a freshly created cartridge.
    Result,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Result => "result",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// The request field a message refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    /// Messages that don't refer to a specific field.
    Default,
    Named(String),
}

impl Field {
    /// Field for the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

/// A single message from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub field: Option<String>,
}

fn default_severity() -> Severity {
    Severity::Info
}

impl Message {
    /// The field this message refers to.
    pub fn field(&self) -> Field {
        match self.field.as_deref() {
            None | Some("") => Field::Default,
            Some(name) => Field::named(name),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.text)?;
        if let Some(code) = self.exit_code {
            write!(f, " (exit code {code})")?;
        }
        Ok(())
    }
}

/// Ordered collection of server messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Messages(Vec<Message>);

impl Messages {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all messages in server order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }

    /// Messages that refer to the given field.
    pub fn by_field(&self, field: &Field) -> Vec<&Message> {
        self.0.iter().filter(|m| &m.field() == field).collect()
    }

    /// Messages with the given severity.
    pub fn by_severity(&self, severity: Severity) -> Vec<&Message> {
        self.0.iter().filter(|m| m.severity == severity).collect()
    }

    /// Exit codes of all messages that carry one.
    pub fn exit_codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().filter_map(|m| m.exit_code)
    }

    /// Whether any message has the given severity.
    pub fn has_severity(&self, severity: Severity) -> bool {
        self.0.iter().any(|m| m.severity == severity)
    }
}

impl From<Vec<Message>> for Messages {
    fn from(messages: Vec<Message>) -> Self {
        Self(messages)
    }
}

impl IntoIterator for Messages {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Messages {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> Messages {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_null_field_is_default() {
        let messages = parse(serde_json::json!([
            {"text": "Domain foo contains applications", "severity": "error", "exit_code": 128, "field": null},
            {"text": "Name is taken", "severity": "error", "exit_code": 100, "field": "name"}
        ]));

        assert_eq!(messages.len(), 2);
        let default = messages.by_field(&Field::Default);
        assert_eq!(default.len(), 1);
        assert_eq!(default[0].exit_code, Some(128));

        let named = messages.by_field(&Field::named("name"));
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].text, "Name is taken");
    }

    #[test]
    fn test_unknown_severity_is_tolerated() {
        let messages = parse(serde_json::json!([
            {"text": "hello", "severity": "shout"}
        ]));
        assert_eq!(messages.iter().next().unwrap().severity, Severity::Unknown);
    }

    #[test]
    fn test_exit_codes_skip_missing() {
        let messages = parse(serde_json::json!([
            {"text": "a", "severity": "info"},
            {"text": "b", "severity": "error", "exit_code": 101}
        ]));
        assert_eq!(messages.exit_codes().collect::<Vec<_>>(), vec![101]);
        assert!(messages.has_severity(Severity::Error));
        assert_eq!(messages.by_severity(Severity::Info).len(), 1);
    }

    #[test]
    fn test_message_display() {
        let message = Message {
            text: "Application created".to_string(),
            severity: Severity::Result,
            exit_code: Some(0),
            field: None,
        };
        assert_eq!(message.to_string(), "[result] Application created (exit code 0)");
    }
}
