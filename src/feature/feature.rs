use anyhow::{anyhow, Result};
use geo::{Coord, Geometry};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::geom::parse_geometry;
use crate::types::{FeatureId, FeatureStateKey};

/// Property carrying the dataset id of a feature (as opposed to the renderer id).
pub const ORIGINAL_ID_PROPERTY: &str = "id";

/// Property carrying the length of a line in meters.
pub const LENGTH_PROPERTY: &str = "l";

/// A feature hit reported by the rendering surface.
#[derive(Debug, Clone)]
pub struct FeatureRef {
    pub layer_id: String,
    pub source_id: String,
    pub geometry: Geometry<f64>,
    pub properties: Map<String, Value>,
    pub id: Option<FeatureId>,
}

impl FeatureRef {
    pub fn new(layer_id: impl Into<String>, source_id: impl Into<String>, geometry: Geometry<f64>) -> Self {
        Self {
            layer_id: layer_id.into(),
            source_id: source_id.into(),
            geometry,
            properties: Map::new(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<FeatureId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Build a hit from a renderer feature object:
    /// `{ "layer": { "id": .. } | "layerId": .., "source": .., "geometry": {..}, "properties": {..}, "id": .. }`
    pub fn from_value(value: &Value) -> Result<Self> {
        let layer_id = value["layer"]["id"].as_str()
            .or_else(|| value["layerId"].as_str())
            .ok_or_else(|| anyhow!("feature hit is missing its layer id"))?;
        let source_id = value["source"].as_str()
            .or_else(|| value["sourceId"].as_str())
            .unwrap_or_default();

        Ok(Self {
            layer_id: layer_id.to_string(),
            source_id: source_id.to_string(),
            geometry: parse_geometry(&value["geometry"])?,
            properties: value["properties"].as_object().cloned().unwrap_or_default(),
            id: value.get("id").and_then(FeatureId::from_json),
        })
    }

    /// Renderer state key; absent when the renderer assigned no id.
    pub fn state_key(&self) -> Option<FeatureStateKey> {
        self.id.clone().map(|id| FeatureStateKey { source_id: self.source_id.clone(), feature_id: id })
    }

    /// Dataset id from the properties bag, numbers rendered as strings.
    pub fn original_id(&self) -> Option<String> {
        match self.properties.get(ORIGINAL_ID_PROPERTY)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Numeric property, accepting numbers and numeric strings.
    pub fn number_property(&self, key: &str) -> Option<f64> {
        let value = match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }
}

/// Kind of a classified feature, with the data specific to that kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FeatureKind {
    Spot,
    Line {
        #[serde(skip_serializing_if = "Option::is_none")]
        length_m: Option<f64>,
    },
    Cluster {
        #[serde(skip_serializing_if = "Option::is_none")]
        point_count: Option<u64>,
    },
    Point {
        #[serde(skip_serializing_if = "Option::is_none")]
        length_m: Option<f64>,
    },
    Unknown,
}

impl FeatureKind {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureKind::Spot => "spot",
            FeatureKind::Line { .. } => "line",
            FeatureKind::Cluster { .. } => "cluster",
            FeatureKind::Point { .. } => "point",
            FeatureKind::Unknown => "unknown",
        }
    }
}

/// A hit resolved into the domain: what it is, which dataset entry, and where to anchor it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainFeature {
    #[serde(flatten)]
    pub kind: FeatureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
    #[serde(serialize_with = "serialize_coord")]
    pub center: Coord<f64>,
}

fn serialize_coord<S: serde::Serializer>(coord: &Coord<f64>, s: S) -> Result<S::Ok, S::Error> {
    [coord.x, coord.y].serialize(s)
}
