mod legend;
mod plan;

pub use legend::{LegendConfig, PlanMode};
pub use plan::{
    ClusterParams, ClusterSource, Filter, LayerSpec, Planner, SourcePlan, StaticSource, Visibility,
    CATEGORY_PROPERTY, CLUSTER_SOURCE_ID, COMMUNITIES_SOURCE_ID, LINES_SOURCE_ID, SPOTS_SOURCE_ID,
};
