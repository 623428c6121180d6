use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::viewport::Viewport;

/// Location the GeoJSON documents are published under unless configured otherwise.
pub const DEFAULT_DATA_BASE: &str =
    "https://raw.githubusercontent.com/International-Slackline-Association/slackline-data/master/geojson";

/// Community group directory.
pub const DEFAULT_GROUPS_URL: &str =
    "https://raw.githubusercontent.com/International-Slackline-Association/slackline-data/master/communities/groups/groups.json";

/// URLs of the remote documents the map reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Endpoints {
    /// Points of spots and lines together, used for joined clustering and the point index.
    pub clusters_main: String,
    pub spot_points: String,
    pub line_points: String,
    /// Spot polygons.
    pub spots: String,
    /// Line strings.
    pub lines: String,
    pub communities: String,
    pub groups: String,
}

impl Endpoints {
    /// Endpoints for documents published as `<base>/<name>.geojson`.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let doc = |name: &str| format!("{base}/{name}.geojson");
        Self {
            clusters_main: doc("clustersMain"),
            spot_points: doc("spotPoints"),
            line_points: doc("linePoints"),
            spots: doc("spots"),
            lines: doc("lines"),
            communities: doc("communities"),
            groups: DEFAULT_GROUPS_URL.to_string(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self { Self::from_base(DEFAULT_DATA_BASE) }
}

/// Clustering parameters of the point sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusteringConfig {
    pub enabled: bool,
    /// Cluster radius in pixels.
    pub radius: u32,
    /// Fewest points that form a cluster.
    pub min_points: u32,
    /// Highest zoom that still clusters.
    pub max_zoom: u8,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self { enabled: true, radius: 60, min_points: 3, max_zoom: 13 }
    }
}

/// Top-level configuration of a map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    pub endpoints: Endpoints,
    /// Viewport used when the URL carries none.
    pub default_viewport: Viewport,
    pub clustering: ClusteringConfig,
    /// Padding factor applied to a feature's length when zooming to it.
    pub bounds_padding: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            default_viewport: Viewport::new(0.0, 30.0, 1.5),
            clustering: ClusteringConfig::default(),
            bounds_padding: 1.0,
        }
    }
}

impl MapConfig {
    /// Parse a (possibly partial) JSON document over the defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse map config")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read map config: {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Initial viewport: the one encoded in `query`, else the configured default.
    pub fn initial_viewport(&self, query: Option<&str>) -> Viewport {
        query.and_then(Viewport::parse).unwrap_or(self.default_viewport)
    }
}
