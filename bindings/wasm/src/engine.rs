use std::sync::Arc;

use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use slackmap_core::{
    classify, format_viewport_param, FeatureRef, LegendConfig, MapConfig, MapEvent, MapSession, MemSource, Viewport,
};

use crate::common::*;

/// One map view driven from JS. The host registers the map callbacks, turns
/// them into event objects for `dispatch` and applies the returned effects.
#[wasm_bindgen]
pub struct WasmMapEngine {
    docs: Arc<MemSource>,
    session: MapSession,
}

#[wasm_bindgen]
impl WasmMapEngine {
    /// config: optional partial map config object (same shape as the JSON config file).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmMapEngine, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            MapConfig::default()
        } else {
            serde_json::from_value(from_js(config)?).map_err(js_err)?
        };
        let docs = Arc::new(MemSource::new());
        let session = MapSession::new(config, docs.clone());
        Ok(WasmMapEngine { docs, session })
    }

    /// Hand over fetched documents: { "https://.../clustersMain.geojson": Uint8Array, ... }
    pub fn add_documents(&self, documents: JsValue) -> Result<(), JsValue> {
        for (url, bytes) in js_documents(documents).map_err(js_err)? {
            self.docs.insert(&url, bytes);
        }
        Ok(())
    }

    /// Current source/layer plan.
    pub fn plan(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.plan())
    }

    /// Apply a legend selection { spots, lines, guides, communities } and return the new plan.
    pub fn set_legend(&mut self, legend: JsValue) -> Result<JsValue, JsValue> {
        let legend: LegendConfig = serde_json::from_value(from_js(legend)?).map_err(js_err)?;
        to_js(self.session.set_legend(legend))
    }

    pub fn set_clustering(&mut self, enabled: bool) -> Result<JsValue, JsValue> {
        to_js(self.session.set_clustering(enabled))
    }

    pub fn set_excluded_feature(&mut self, feature_id: Option<String>) -> Result<JsValue, JsValue> {
        to_js(self.session.set_excluded_feature(feature_id))
    }

    /// Feed a map event, e.g. { type: "click", feature: {...} }; returns an array of effects.
    pub fn dispatch(&mut self, event: JsValue) -> Result<JsValue, JsValue> {
        let event = MapEvent::from_value(&from_js(event)?).map_err(js_err)?;
        to_js(&self.session.handle(event))
    }

    /// Domain view of a renderer feature object.
    pub fn classify(&self, feature: JsValue) -> Result<JsValue, JsValue> {
        let feature = FeatureRef::from_value(&from_js(feature)?).map_err(js_err)?;
        to_js(&classify(&feature))
    }

    /// Populate the point index from documents already handed over.
    pub fn load_points(&self) -> Result<usize, JsValue> {
        self.session.load_points().map_err(js_err)?;
        Ok(self.session.points().len())
    }

    /// Group info for a community point, or undefined.
    pub fn group_info(&self, id: String) -> Result<JsValue, JsValue> {
        match self.session.group_info(&id).map_err(js_err)? {
            Some(group) => to_js(&group),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Viewport from `location.search`, else the configured default.
    pub fn initial_viewport(&self, query: Option<String>) -> Result<JsValue, JsValue> {
        to_js(&self.session.config().initial_viewport(query.as_deref()))
    }

    /// Viewport from a query string, or undefined when absent/malformed.
    pub fn parse_viewport(query: &str) -> Result<JsValue, JsValue> {
        match Viewport::parse(query) {
            Some(viewport) => to_js(&viewport),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn format_viewport(longitude: f64, latitude: f64, zoom: f64) -> String {
        format_viewport_param(longitude, latitude, zoom)
    }
}
