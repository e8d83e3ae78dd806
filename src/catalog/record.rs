use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::ValidationError;

pub const DEFAULT_LIFECYCLE_STATUS: &str = "Active";

/// One catalog product, backed by one YAML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_lifecycle_status")]
    pub lifecycle_status: String,
    /// Keys this application does not edit, written back untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_lifecycle_status() -> String {
    DEFAULT_LIFECYCLE_STATUS.to_string()
}

/// Accept `id: 42` as well as `id: "42"`
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {other:?}"
        ))),
    }
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            lifecycle_status: default_lifecycle_status(),
            extra: BTreeMap::new(),
        }
    }

    #[cfg(test)]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[cfg(test)]
    pub fn with_lifecycle_status(mut self, status: impl Into<String>) -> Self {
        self.lifecycle_status = status.into();
        self
    }

    /// Required fields are present and `id` can name a file
    pub fn validate(&self) -> Result<(), ValidationError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(ValidationError::MissingId);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if id != self.id
            || id.starts_with('.')
            || id.chars().any(|c| c == '/' || c == '\\' || c.is_control())
        {
            return Err(ValidationError::InvalidId(self.id.clone()));
        }
        Ok(())
    }

    /// Conventional file name for a new record
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.id)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    #[cfg(test)]
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
