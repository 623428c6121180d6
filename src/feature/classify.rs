use geo::Geometry;

use crate::geom::center_of;
use crate::types::LayerId;

use super::{DomainFeature, FeatureKind, FeatureRef, LENGTH_PROPERTY};

/// Property the clustering engine writes onto cluster features.
const POINT_COUNT_PROPERTY: &str = "point_count";

/// Resolve a renderer hit into a domain feature.
/// Known layer ids decide the kind; otherwise the geometry type does.
/// Never fails: anything unrecognized comes back as `FeatureKind::Unknown`.
pub fn classify(feature: &FeatureRef) -> DomainFeature {
    let length_m = || feature.number_property(LENGTH_PROPERTY);

    let kind = match LayerId::from_str(&feature.layer_id) {
        Some(LayerId::Spot | LayerId::SpotOutline | LayerId::SpotLabel) => FeatureKind::Spot,
        Some(LayerId::Line | LayerId::LineLabel) => FeatureKind::Line { length_m: length_m() },
        Some(LayerId::Clusters | LayerId::ClusterCount) => FeatureKind::Cluster {
            point_count: feature.number_property(POINT_COUNT_PROPERTY)
                .filter(|n| *n >= 0.0)
                .map(|n| n as u64),
        },
        Some(LayerId::UnclusteredPoint) => FeatureKind::Point { length_m: length_m() },
        None => match feature.geometry {
            Geometry::LineString(_) => FeatureKind::Line { length_m: length_m() },
            Geometry::Polygon(_) => FeatureKind::Spot,
            _ => FeatureKind::Unknown,
        },
    };

    DomainFeature {
        kind,
        original_id: feature.original_id(),
        center: center_of(&feature.geometry),
    }
}
