//! Link descriptors and request parameters.
//!
//! The broker advertises every operation a resource currently permits as a
//! named link. A link tells the client which method and URL to use and
//! which parameters the request requires or accepts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{OpenShiftError, Result};
use crate::http::HttpMethod;

/// Links of a resource keyed by relation name (e.g. `"UPDATE"`).
pub type Links = BTreeMap<String, Link>;

/// A server-supplied operation descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    pub href: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub required_params: Vec<LinkParameter>,
    #[serde(default)]
    pub optional_params: Vec<LinkParameter>,
}

/// A parameter declared by a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkParameter {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub valid_options: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl Link {
    /// Create a link without declared parameters.
    pub fn new(method: HttpMethod, href: impl Into<String>) -> Self {
        Self {
            rel: None,
            href: href.into(),
            method,
            required_params: Vec::new(),
            optional_params: Vec::new(),
        }
    }

    /// Look up a declared parameter, required or optional.
    pub fn parameter(&self, name: &str) -> Option<&LinkParameter> {
        self.required_params
            .iter()
            .chain(self.optional_params.iter())
            .find(|p| p.name == name)
    }

    /// Valid options the server advertises for a parameter.
    pub fn valid_options(&self, name: &str) -> Vec<String> {
        self.parameter(name)
            .map(|p| p.valid_options.iter().map(option_text).collect())
            .unwrap_or_default()
    }

    /// Check parameters against the link's declaration.
    ///
    /// # Errors
    ///
    /// Returns [`OpenShiftError::InvalidRequest`] if a required parameter is
    /// missing or a scalar value is not among the declared valid options.
    pub fn validate(&self, params: &Parameters) -> Result<()> {
        for required in &self.required_params {
            match params.get(&required.name) {
                None | Some(Value::Null) => {
                    return Err(OpenShiftError::InvalidRequest(format!(
                        "missing required parameter '{}' for {} {}",
                        required.name, self.method, self.href
                    )));
                }
                Some(_) => {}
            }
        }

        for declared in self.required_params.iter().chain(&self.optional_params) {
            if declared.valid_options.is_empty() {
                continue;
            }
            let Some(value) = params.get(&declared.name) else {
                continue;
            };
            if value.is_array() || value.is_object() || value.is_null() {
                continue;
            }
            let given = option_text(value);
            if !declared
                .valid_options
                .iter()
                .any(|option| option_text(option) == given)
            {
                return Err(OpenShiftError::InvalidRequest(format!(
                    "'{given}' is not a valid value for '{}' (expected one of: {})",
                    declared.name,
                    self.valid_options(&declared.name).join(", ")
                )));
            }
        }

        Ok(())
    }
}

fn option_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Request parameters, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a parameter if a value is present.
    #[must_use]
    pub fn with_opt<V: Into<Value>>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(name, value);
        }
        self
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Get a parameter value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Render scalar parameters as query pairs. Nested values are skipped.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|(name, value)| match value {
                Value::Array(_) | Value::Object(_) | Value::Null => {
                    tracing::warn!(parameter = %name, "nested parameter dropped from query");
                    None
                }
                scalar => Some((name.clone(), option_text(scalar))),
            })
            .collect()
    }
}
