use serde::{Deserialize, Serialize};

/// Renderer feature id, either generated (numeric) or promoted from a property (string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(u64),
    Text(String),
}

impl FeatureId {
    /// Read an id out of a JSON value; floats and other types are rejected.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_u64().map(FeatureId::Number),
            serde_json::Value::String(s) => Some(FeatureId::Text(s.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureId::Number(n) => write!(f, "{n}"),
            FeatureId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for FeatureId {
    fn from(value: u64) -> Self { FeatureId::Number(value) }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self { FeatureId::Text(value.to_string()) }
}

/// Key of a per-feature renderer state entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStateKey {
    pub source_id: String,
    pub feature_id: FeatureId,
}

impl FeatureStateKey {
    pub fn new(source_id: impl Into<String>, feature_id: impl Into<FeatureId>) -> Self {
        Self { source_id: source_id.into(), feature_id: feature_id.into() }
    }
}
