#![doc = "Slackmap interactive map feature engine"]
mod cache;
mod camera;
mod config;
mod feature;
mod geom;
mod interaction;
mod plan;
mod session;
mod source;
mod types;
mod viewport;

#[doc(inline)]
pub use cache::{GroupDirectory, GroupInfo, GroupLink, PointIndex};

#[doc(inline)]
pub use camera::{CameraCommand, CameraController, Padding};

#[doc(inline)]
pub use config::{ClusteringConfig, Endpoints, MapConfig};

#[doc(inline)]
pub use feature::{classify, DomainFeature, FeatureKind, FeatureRef};

#[doc(inline)]
pub use geom::{center_of, compute_bounds, geometry_to_value, parse_geometry, read_features_from_bytes, Bounds, BoxArray, GeoJsonFeature};

#[doc(inline)]
pub use interaction::{reduce, Cursor, Effect, Highlight, HighlightState, InteractionState, MapEvent};

#[doc(inline)]
pub use plan::{
    ClusterParams, ClusterSource, Filter, LayerSpec, LegendConfig, PlanMode, Planner, SourcePlan, StaticSource,
    Visibility, CATEGORY_PROPERTY, CLUSTER_SOURCE_ID, COMMUNITIES_SOURCE_ID, LINES_SOURCE_ID, SPOTS_SOURCE_ID,
};

#[doc(inline)]
pub use session::{Liveness, MapSession};

#[doc(inline)]
pub use source::{DocumentSource, MemSource};

#[cfg(feature = "download")]
#[doc(inline)]
pub use source::HttpSource;

#[doc(inline)]
pub use types::{FeatureId, FeatureStateKey, LayerId};

#[doc(inline)]
pub use viewport::{format_viewport_param, Viewport, MAP_PARAM};
