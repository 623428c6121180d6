use serde::{Deserialize, Serialize};

/// Rendering layers registered by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerId {
    #[serde(rename = "spot")]
    Spot,           // Polygon fill
    #[serde(rename = "spot-outline")]
    SpotOutline,    // Polygon stroke
    #[serde(rename = "polygonLabel")]
    SpotLabel,
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "lineLabel")]
    LineLabel,
    #[serde(rename = "clusters")]
    Clusters,
    #[serde(rename = "cluster-count")]
    ClusterCount,
    #[serde(rename = "unclustered-point")]
    UnclusteredPoint,
}

impl LayerId {
    pub const ALL: [LayerId; 8] = [
        LayerId::Spot,
        LayerId::SpotOutline,
        LayerId::SpotLabel,
        LayerId::Line,
        LayerId::LineLabel,
        LayerId::Clusters,
        LayerId::ClusterCount,
        LayerId::UnclusteredPoint,
    ];

    /// Layers whose features are reported by pointer hits.
    pub const INTERACTIVE: [LayerId; 6] = [
        LayerId::Line,
        LayerId::LineLabel,
        LayerId::Spot,
        LayerId::SpotLabel,
        LayerId::UnclusteredPoint,
        LayerId::Clusters,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LayerId::Spot => "spot",
            LayerId::SpotOutline => "spot-outline",
            LayerId::SpotLabel => "polygonLabel",
            LayerId::Line => "line",
            LayerId::LineLabel => "lineLabel",
            LayerId::Clusters => "clusters",
            LayerId::ClusterCount => "cluster-count",
            LayerId::UnclusteredPoint => "unclustered-point",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layer| layer.to_str() == s)
    }

    /// Whether hits on this layer can be clicked or hovered at all.
    pub fn is_interactive(&self) -> bool { Self::INTERACTIVE.contains(self) }

    /// Whether this layer gets hover/select highlighting. Labels are excluded.
    pub fn is_hoverable(&self) -> bool {
        matches!(self, LayerId::Spot | LayerId::Line | LayerId::Clusters | LayerId::UnclusteredPoint)
    }

    /// Zoom range `(min, max)` the layer is drawn at.
    pub fn zoom_range(&self) -> (Option<u8>, Option<u8>) {
        match self {
            LayerId::Spot | LayerId::Line => (Some(13), None),
            LayerId::SpotOutline => (Some(13), Some(16)),
            LayerId::SpotLabel => (Some(15), None),
            LayerId::LineLabel => (Some(16), None),
            LayerId::Clusters | LayerId::ClusterCount => (None, None),
            LayerId::UnclusteredPoint => (None, Some(13)),
        }
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for layer in LayerId::ALL {
            assert_eq!(LayerId::from_str(layer.to_str()), Some(layer));
        }
        assert_eq!(LayerId::from_str("water"), None);
    }

    #[test]
    fn labels_are_interactive_but_not_hoverable() {
        assert!(LayerId::LineLabel.is_interactive());
        assert!(!LayerId::LineLabel.is_hoverable());
        assert!(LayerId::SpotLabel.is_interactive());
        assert!(!LayerId::SpotLabel.is_hoverable());
        assert!(!LayerId::ClusterCount.is_interactive());
        assert!(!LayerId::SpotOutline.is_hoverable());
    }

    #[test]
    fn serde_uses_renderer_names() {
        let json = serde_json::to_string(&LayerId::UnclusteredPoint).unwrap();
        assert_eq!(json, "\"unclustered-point\"");
        let back: LayerId = serde_json::from_str("\"polygonLabel\"").unwrap();
        assert_eq!(back, LayerId::SpotLabel);
    }
}
