use std::collections::BTreeMap;

use serde::{ser::SerializeStruct, Serialize, Serializer};
use serde_json::{json, Value};

use crate::config::{ClusteringConfig, Endpoints, MapConfig};
use crate::feature::ORIGINAL_ID_PROPERTY;
use crate::types::LayerId;

use super::{LegendConfig, PlanMode};

/// Source id of the spots/lines point clusters.
pub const CLUSTER_SOURCE_ID: &str = "worldMapCluster";
/// Source id of the community point clusters.
pub const COMMUNITIES_SOURCE_ID: &str = "communitiesCluster";
pub const SPOTS_SOURCE_ID: &str = "spots";
pub const LINES_SOURCE_ID: &str = "lines";

/// Point property naming the category (spot or line) of a clustered point.
pub const CATEGORY_PROPERTY: &str = "ft";

/// Unclustered community points stay visible up to this zoom.
const COMMUNITY_POINT_MAX_ZOOM: u8 = 21;
/// Unclustered community points are drawn larger than slackline points.
const COMMUNITY_POINT_RADIUS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    None,
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible { Visibility::Visible } else { Visibility::None }
    }
}

/// Clustering setup of a point source.
/// Serializes with its `clusterProperties` expression when per-category counts are on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    /// `None` keeps clustering at every zoom.
    pub max_zoom: Option<u8>,
    pub min_points: u32,
    pub radius: u32,
    /// Aggregate the category property per cluster so counts can be split by category.
    pub per_category_counts: bool,
}

impl ClusterParams {
    /// Renderer `clusterProperties` expression, present only for per-category counts.
    pub fn cluster_properties(&self) -> Option<Value> {
        self.per_category_counts.then(|| {
            let mut properties = serde_json::Map::new();
            properties.insert(
                CATEGORY_PROPERTY.to_string(),
                json!([["get", CATEGORY_PROPERTY], ["get", CATEGORY_PROPERTY]]),
            );
            Value::Object(properties)
        })
    }
}

impl Serialize for ClusterParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ClusterParams", 5)?;
        state.serialize_field("maxZoom", &self.max_zoom)?;
        state.serialize_field("minPoints", &self.min_points)?;
        state.serialize_field("radius", &self.radius)?;
        state.serialize_field("perCategoryCounts", &self.per_category_counts)?;
        match self.cluster_properties() {
            Some(properties) => state.serialize_field("clusterProperties", &properties)?,
            None => state.skip_field("clusterProperties")?,
        }
        state.end()
    }
}

/// A rendering layer attached to a source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSpec {
    pub id: LayerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<u8>,
    /// Overrides the catalogue circle radius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circle_radius: Option<f64>,
}

impl LayerSpec {
    /// Layer with its catalogue zoom range.
    pub fn new(id: LayerId) -> Self {
        let (min_zoom, max_zoom) = id.zoom_range();
        Self { id, min_zoom, max_zoom, circle_radius: None }
    }
}

/// Source-level feature filter. Serialized as its renderer expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    NotEqual { property: String, value: String },
}

impl Filter {
    /// Renderer filter expression.
    pub fn to_expression(&self) -> Value {
        match self {
            Filter::NotEqual { property, value } => json!(["!=", ["get", property], value]),
        }
    }

    /// Whether a feature with `property = value` passes the filter.
    pub fn accepts(&self, property: &str, value: Option<&str>) -> bool {
        match self {
            Filter::NotEqual { property: p, value: v } => p != property || value != Some(v.as_str()),
        }
    }
}

/// Clustered point source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSource {
    pub id: String,
    pub url: String,
    pub params: ClusterParams,
    pub layers: Vec<LayerSpec>,
}

/// Non-clustered geometry source. Always loaded; legend toggles only flip layer visibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticSource {
    pub id: String,
    pub url: String,
    /// Property promoted to the renderer feature id.
    pub promote_id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "filter_expression")]
    pub filter: Option<Filter>,
    pub layers: Vec<LayerSpec>,
    pub layer_visibility: BTreeMap<LayerId, Visibility>,
}

/// Sources and layers to register for a legend configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePlan {
    pub mode: PlanMode,
    pub cluster: Option<ClusterSource>,
    pub static_sources: Vec<StaticSource>,
}

impl SourcePlan {
    pub fn cluster_source_id(&self) -> Option<&str> {
        self.cluster.as_ref().map(|cluster| cluster.id.as_str())
    }

    pub fn static_source(&self, id: &str) -> Option<&StaticSource> {
        self.static_sources.iter().find(|source| source.id == id)
    }

    /// Visibility of a static layer; cluster layers are always visible.
    pub fn visibility(&self, layer: LayerId) -> Option<Visibility> {
        self.static_sources.iter()
            .find_map(|source| source.layer_visibility.get(&layer).copied())
            .or_else(|| {
                self.cluster.as_ref()
                    .filter(|cluster| cluster.layers.iter().any(|spec| spec.id == layer))
                    .map(|_| Visibility::Visible)
            })
    }
}

/// Derives source plans from legend configurations.
#[derive(Debug, Clone)]
pub struct Planner {
    endpoints: Endpoints,
    clustering: ClusteringConfig,
}

impl Planner {
    pub fn new(endpoints: Endpoints, clustering: ClusteringConfig) -> Self {
        Self { endpoints, clustering }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(config.endpoints.clone(), config.clustering)
    }

    /// Plan for `legend`, dispatching on its mode.
    pub fn plan(&self, legend: &LegendConfig, clustering_enabled: bool, exclude_feature_id: Option<&str>) -> SourcePlan {
        match PlanMode::from(legend) {
            PlanMode::Slacklines => self.plan_slacklines(legend, clustering_enabled, exclude_feature_id),
            PlanMode::Communities => self.plan_communities(),
        }
    }

    /// Spots and lines: one optional point cluster source plus the always-loaded geometry sources.
    pub fn plan_slacklines(&self, legend: &LegendConfig, clustering_enabled: bool, exclude_feature_id: Option<&str>) -> SourcePlan {
        let cluster_url = match (legend.spots, legend.lines) {
            _ if !clustering_enabled => None,
            (true, true) => Some(&self.endpoints.clusters_main),
            (true, false) => Some(&self.endpoints.spot_points),
            (false, true) => Some(&self.endpoints.line_points),
            (false, false) => None,
        };

        let cluster = cluster_url.map(|url| ClusterSource {
            id: CLUSTER_SOURCE_ID.to_string(),
            url: url.clone(),
            params: ClusterParams {
                max_zoom: Some(self.clustering.max_zoom),
                min_points: self.clustering.min_points,
                radius: self.clustering.radius,
                // Joined clusters count across categories.
                per_category_counts: legend.spots != legend.lines,
            },
            layers: vec![
                LayerSpec::new(LayerId::Clusters),
                LayerSpec::new(LayerId::ClusterCount),
                LayerSpec::new(LayerId::UnclusteredPoint),
            ],
        });

        let filter = exclude_feature_id.map(|id| Filter::NotEqual {
            property: ORIGINAL_ID_PROPERTY.to_string(),
            value: id.to_string(),
        });

        let static_sources = vec![
            static_source(
                SPOTS_SOURCE_ID,
                &self.endpoints.spots,
                &filter,
                &[LayerId::Spot, LayerId::SpotOutline, LayerId::SpotLabel],
                legend.spots,
            ),
            static_source(
                LINES_SOURCE_ID,
                &self.endpoints.lines,
                &filter,
                &[LayerId::Line, LayerId::LineLabel],
                legend.lines,
            ),
        ];

        SourcePlan { mode: PlanMode::Slacklines, cluster, static_sources }
    }

    /// Communities: a single cluster source of group points, clustered at every zoom.
    pub fn plan_communities(&self) -> SourcePlan {
        let point_layer = LayerSpec {
            max_zoom: Some(COMMUNITY_POINT_MAX_ZOOM),
            circle_radius: Some(COMMUNITY_POINT_RADIUS),
            ..LayerSpec::new(LayerId::UnclusteredPoint)
        };

        let cluster = ClusterSource {
            id: COMMUNITIES_SOURCE_ID.to_string(),
            url: self.endpoints.communities.clone(),
            params: ClusterParams {
                max_zoom: None,
                min_points: self.clustering.min_points,
                radius: self.clustering.radius,
                per_category_counts: false,
            },
            layers: vec![LayerSpec::new(LayerId::Clusters), LayerSpec::new(LayerId::ClusterCount), point_layer],
        };

        SourcePlan { mode: PlanMode::Communities, cluster: Some(cluster), static_sources: Vec::new() }
    }
}

fn filter_expression<S: Serializer>(filter: &Option<Filter>, serializer: S) -> Result<S::Ok, S::Error> {
    filter.as_ref().map(Filter::to_expression).serialize(serializer)
}

fn static_source(id: &str, url: &str, filter: &Option<Filter>, layers: &[LayerId], visible: bool) -> StaticSource {
    StaticSource {
        id: id.to_string(),
        url: url.to_string(),
        promote_id: ORIGINAL_ID_PROPERTY,
        filter: filter.clone(),
        layers: layers.iter().copied().map(LayerSpec::new).collect(),
        layer_visibility: layers.iter().map(|&layer| (layer, Visibility::from(visible))).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> Planner {
        Planner::new(Endpoints::from_base("http://data"), ClusteringConfig::default())
    }

    fn legend(spots: bool, lines: bool) -> LegendConfig {
        LegendConfig { spots, lines, ..LegendConfig::default() }
    }

    #[test]
    fn spots_only_clusters_spot_points_with_category_counts() {
        let plan = planner().plan(&legend(true, false), true, None);
        let cluster = plan.cluster.as_ref().unwrap();

        assert_eq!(cluster.id, CLUSTER_SOURCE_ID);
        assert_eq!(cluster.url, "http://data/spotPoints.geojson");
        assert!(cluster.params.per_category_counts);
        assert_eq!(plan.visibility(LayerId::Spot), Some(Visibility::Visible));
        assert_eq!(plan.visibility(LayerId::SpotLabel), Some(Visibility::Visible));
        assert_eq!(plan.visibility(LayerId::Line), Some(Visibility::None));
        assert_eq!(plan.visibility(LayerId::LineLabel), Some(Visibility::None));
    }

    #[test]
    fn lines_only_clusters_line_points() {
        let plan = planner().plan(&legend(false, true), true, None);
        assert_eq!(plan.cluster.as_ref().unwrap().url, "http://data/linePoints.geojson");
        assert!(plan.cluster.as_ref().unwrap().params.per_category_counts);
    }

    #[test]
    fn both_categories_use_joined_clusters_without_category_counts() {
        let plan = planner().plan(&legend(true, true), true, None);
        let cluster = plan.cluster.as_ref().unwrap();

        assert_eq!(cluster.url, "http://data/clustersMain.geojson");
        assert!(!cluster.params.per_category_counts);
        assert_eq!(cluster.params.cluster_properties(), None);
        assert_eq!(cluster.params, ClusterParams { max_zoom: Some(13), min_points: 3, radius: 60, per_category_counts: false });
    }

    #[test]
    fn nothing_enabled_or_clustering_off_means_no_cluster_source() {
        let plan = planner().plan(&legend(false, false), true, None);
        assert!(plan.cluster.is_none());
        // Geometry stays registered, just hidden
        assert_eq!(plan.static_sources.len(), 2);
        assert_eq!(plan.visibility(LayerId::Spot), Some(Visibility::None));

        let plan = planner().plan(&legend(true, true), false, None);
        assert!(plan.cluster.is_none());
        assert_eq!(plan.visibility(LayerId::Line), Some(Visibility::Visible));
    }

    #[test]
    fn communities_replace_slackline_sources() {
        let plan = planner().plan(&LegendConfig { communities: true, ..LegendConfig::slacklines() }, false, Some("x"));
        let cluster = plan.cluster.as_ref().unwrap();

        assert_eq!(plan.mode, PlanMode::Communities);
        assert_eq!(cluster.id, COMMUNITIES_SOURCE_ID);
        assert_eq!(cluster.url, "http://data/communities.geojson");
        assert_eq!(cluster.params.max_zoom, None);
        assert!(plan.static_sources.is_empty());

        let point = cluster.layers.iter().find(|l| l.id == LayerId::UnclusteredPoint).unwrap();
        assert_eq!(point.max_zoom, Some(21));
        assert_eq!(point.circle_radius, Some(8.0));
    }

    #[test]
    fn exclusion_filter_applies_to_static_sources_only() {
        let plan = planner().plan(&legend(true, true), true, Some("spot-42"));
        for source in &plan.static_sources {
            let filter = source.filter.as_ref().unwrap();
            assert_eq!(filter.to_expression(), json!(["!=", ["get", "id"], "spot-42"]));
            assert!(!filter.accepts("id", Some("spot-42")));
            assert!(filter.accepts("id", Some("spot-43")));
        }
        let value = serde_json::to_value(plan.cluster.as_ref().unwrap()).unwrap();
        assert!(value.get("filter").is_none());
    }

    #[test]
    fn category_counts_expression() {
        let params = ClusterParams { max_zoom: Some(13), min_points: 3, radius: 60, per_category_counts: true };
        assert_eq!(params.cluster_properties(), Some(json!({ "ft": [["get", "ft"], ["get", "ft"]] })));
    }

    #[test]
    fn plan_serializes_layer_visibility_by_renderer_name() {
        let plan = planner().plan(&legend(true, false), true, None);
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["staticSources"][0]["layerVisibility"]["polygonLabel"], "visible");
        assert_eq!(value["staticSources"][1]["layerVisibility"]["lineLabel"], "none");
        assert_eq!(value["cluster"]["params"]["perCategoryCounts"], true);
        assert_eq!(value["cluster"]["params"]["clusterProperties"], json!({ "ft": [["get", "ft"], ["get", "ft"]] }));
        assert!(value["staticSources"][0].get("filter").is_none());

        let joined = serde_json::to_value(planner().plan(&legend(true, true), true, Some("line-9"))).unwrap();
        assert!(joined["cluster"]["params"].get("clusterProperties").is_none());
        for source in joined["staticSources"].as_array().unwrap() {
            assert_eq!(source["filter"], json!(["!=", ["get", "id"], "line-9"]));
        }
    }

    #[test]
    fn same_legend_same_plan() {
        let p = planner();
        assert_eq!(p.plan(&legend(true, false), true, Some("a")), p.plan(&legend(true, false), true, Some("a")));
    }
}
