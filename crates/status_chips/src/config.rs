//! Scope configuration
//!
//! The card options that decide which entities become chips, plus the stub
//! configuration proposed on first setup.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Dashboard path on which area filtering is skipped by default.
pub const DEFAULT_STATUS_PATH: &str = "home";

/// Errors raised when a scope configuration document is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid scope configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse scope configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Optional card behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Hide chips flagged `exclude_on_status_path`
    Optional,
}

/// User supplied card options. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScopeConfig {
    /// Area to show; falls back to the dashboard URL slug when unset
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub area: Option<String>,
    /// Extra label that status entities must also carry
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub additional_label: Option<String>,
    /// Label that replaces every other scoping rule
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub solo_label: Option<String>,
    /// Main dashboard path, `home` when unset
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub status_path: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub features: Option<Vec<Feature>>,
}

impl ScopeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration document, rejecting anything that is not an object.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::Invalid(format!(
                "expected an object, got {}",
                json_kind(&value)
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn with_additional_label(mut self, label: impl Into<String>) -> Self {
        self.additional_label = Some(label.into());
        self
    }

    pub fn with_solo_label(mut self, label: impl Into<String>) -> Self {
        self.solo_label = Some(label.into());
        self
    }

    pub fn with_status_path(mut self, path: impl Into<String>) -> Self {
        self.status_path = Some(path.into());
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        let features = self.features.get_or_insert_with(Vec::new);
        if !features.contains(&feature) {
            features.push(feature);
        }
        self
    }

    /// Configured area if non-empty.
    pub fn area(&self) -> Option<&str> {
        non_empty(&self.area)
    }

    pub fn additional_label(&self) -> Option<&str> {
        non_empty(&self.additional_label)
    }

    pub fn solo_label(&self) -> Option<&str> {
        non_empty(&self.solo_label)
    }

    pub fn status_path(&self) -> &str {
        non_empty(&self.status_path).unwrap_or(DEFAULT_STATUS_PATH)
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features
            .as_ref()
            .is_some_and(|features| features.contains(&feature))
    }

    /// Area the card is scoped to: the configured one, else the URL slug.
    pub fn resolve_area<'a>(&'a self, slug: Option<&'a str>) -> &'a str {
        self.area()
            .or(slug.filter(|s| !s.is_empty()))
            .unwrap_or_default()
    }

    /// Whether optional chips are hidden for this card instance.
    pub fn is_optional(&self, slug: Option<&str>) -> bool {
        self.has_feature(Feature::Optional) || self.resolve_area(slug) == self.status_path()
    }

    /// Drop an empty feature list, as the editor does before saving.
    pub fn normalized(mut self) -> Self {
        if self.features.as_ref().is_some_and(|f| f.is_empty()) {
            self.features = None;
        }
        self
    }
}

/// Default configuration suggested for a freshly added card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StubConfig {
    /// Empty when no area holds any status entity
    pub area: String,
}

impl From<StubConfig> for ScopeConfig {
    fn from(stub: StubConfig) -> Self {
        ScopeConfig {
            area: Some(stub.area),
            ..Default::default()
        }
    }
}

/// Dashboard slug from a page URL: last path segment without the query,
/// first `-` replaced by `_`.
pub fn slug_from_url(url: &str) -> Option<String> {
    let path = url.split('?').next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    if segment.is_empty() {
        return None;
    }
    Some(segment.replacen('-', "_", 1))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
