use ahash::AHashMap;
use anyhow::{Context, Result};
use geo::Geometry;
use serde_json::Value;

use crate::geom::{read_features_from_bytes, GeoJsonFeature};
use crate::source::DocumentSource;

use super::load_once::LoadOnce;

/// Un-clustered geometries of the point collection, keyed by dataset id.
///
/// Clustered sources report distorted positions for their members, so the
/// true geometry is looked up here. The index is filled from the first
/// successful non-empty load and kept until `invalidate` is called; later
/// loads are no-ops even when asked for a different URL.
#[derive(Debug, Default)]
pub struct PointIndex {
    index: LoadOnce<AHashMap<String, Geometry<f64>>>,
}

impl PointIndex {
    pub fn new() -> Self { Self::default() }

    /// Fetch and index the collection at `url` unless the index is already populated.
    pub fn ensure_loaded(&self, source: &dyn DocumentSource, url: &str) -> Result<()> {
        self.load_with(|| {
            let bytes = source.fetch(url)?;
            index_collection(&bytes).with_context(|| format!("index point collection {url}"))
        })
    }

    /// Index a collection the host fetched itself.
    pub fn load_from_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.load_with(|| index_collection(bytes))
    }

    fn load_with(&self, load: impl FnOnce() -> Result<AHashMap<String, Geometry<f64>>>) -> Result<()> {
        let loaded = self.index.get_or_load(load, |index| !index.is_empty())?;
        match loaded {
            Some(index) => tracing::debug!(features = index.len(), "point index ready"),
            None => tracing::warn!("point collection contained no identifiable features"),
        }
        Ok(())
    }

    /// Original geometry of the feature with dataset id `id`.
    pub fn lookup(&self, id: &str) -> Option<Geometry<f64>> {
        self.index.get()?.get(id).cloned()
    }

    /// Number of indexed features, zero until loaded.
    pub fn len(&self) -> usize {
        self.index.get().map_or(0, |index| index.len())
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Drop the index so the next `ensure_loaded` fetches again.
    pub fn invalidate(&self) {
        self.index.invalidate();
    }
}

fn index_collection(bytes: &[u8]) -> Result<AHashMap<String, Geometry<f64>>> {
    let features = read_features_from_bytes(bytes)?;
    let mut index = AHashMap::with_capacity(features.len());
    for GeoJsonFeature { geometry, properties, .. } in features {
        let id = match properties.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => continue,
        };
        index.insert(id, geometry);
    }
    Ok(index)
}
