use anyhow::{anyhow, bail, Result};
use serde::Serialize;
use serde_json::Value;

use crate::camera::CameraCommand;
use crate::feature::{DomainFeature, FeatureRef};
use crate::types::FeatureStateKey;
use crate::viewport::Viewport;

/// Callbacks of the rendering surface, as events.
#[derive(Debug, Clone)]
pub enum MapEvent {
    /// Pointer moved; carries the topmost interactive hit, if any.
    PointerMove(Option<FeatureRef>),
    /// Click; carries the topmost interactive hit, if any.
    Click(Option<FeatureRef>),
    /// Style and initial sources are in place.
    MapLoaded,
    /// A source finished loading data.
    SourceDataLoaded { source_id: String },
    /// The camera stopped moving.
    MoveEnd(Viewport),
    /// The host closed the feature popup.
    PopupClosed,
    /// The view is going away.
    Teardown,
}

impl MapEvent {
    /// Decode a host event object: `{ "type": "click", "feature": {..} | null }`,
    /// `{ "type": "sourceDataLoaded", "sourceId": .. }`, `{ "type": "moveEnd", "longitude": .., .. }`, ...
    pub fn from_value(value: &Value) -> Result<Self> {
        let kind = value["type"].as_str().ok_or_else(|| anyhow!("event is missing its type"))?;
        let hit = || -> Result<Option<FeatureRef>> {
            match &value["feature"] {
                Value::Null => Ok(None),
                feature => FeatureRef::from_value(feature).map(Some),
            }
        };

        Ok(match kind {
            "pointerMove" => MapEvent::PointerMove(hit()?),
            "click" => MapEvent::Click(hit()?),
            "mapLoaded" => MapEvent::MapLoaded,
            "sourceDataLoaded" => {
                let source_id = value["sourceId"].as_str()
                    .ok_or_else(|| anyhow!("sourceDataLoaded event is missing sourceId"))?;
                MapEvent::SourceDataLoaded { source_id: source_id.to_string() }
            }
            "moveEnd" => {
                let coord = |key: &str| value[key].as_f64().ok_or_else(|| anyhow!("moveEnd event is missing {key}"));
                let zoom = value["zoom"].as_f64().unwrap_or(0.0);
                MapEvent::MoveEnd(Viewport::new(coord("longitude")?, coord("latitude")?, zoom))
            }
            "popupClosed" => MapEvent::PopupClosed,
            "teardown" => MapEvent::Teardown,
            other => bail!("unknown event type {other:?}"),
        })
    }
}

/// Per-feature renderer state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Hover,
    Selected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// What the host has to do in response to an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Effect {
    /// Toggle a renderer feature-state flag.
    SetFeatureState { key: FeatureStateKey, highlight: Highlight, value: bool },
    SetCursor { cursor: Cursor },
    HoverEnter { feature: DomainFeature },
    HoverLeave { feature: DomainFeature },
    /// Selection changed; `None` means nothing is selected.
    SelectionChanged { feature: Option<DomainFeature> },
    /// Fit the camera around a clustered point's original geometry.
    ZoomToFeature { feature_id: String, length_m: Option<f64> },
    /// Drop popup padding from the camera.
    ClearFocus,
    /// The point index can be populated now that the cluster source is loaded.
    LoadPointIndex,
    /// Map and tracked cluster source are both loaded.
    MapReady,
    /// Camera command for the rendering surface.
    Camera { command: CameraCommand },
    /// Camera settled; `param` is the URL encoding of `viewport`.
    ViewportChanged { viewport: Viewport, param: String },
}

/// Currently hovered and selected renderer features.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    pub hovered_id: Option<FeatureStateKey>,
    pub selected_id: Option<FeatureStateKey>,
}
