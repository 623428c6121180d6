use serde::Serialize;

use crate::cache::PointIndex;
use crate::geom::{compute_bounds, BoxArray};

/// Screen padding around the camera target (pixels).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Padding {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Padding {
    pub const ZERO: Padding = Padding { top: 0.0, left: 0.0, bottom: 0.0, right: 0.0 };
}

/// Camera commands issued to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum CameraCommand {
    FitBounds { bounds: BoxArray },
    EaseTo { padding: Padding },
}

/// Turns feature focus requests into camera commands.
#[derive(Debug, Clone, Copy)]
pub struct CameraController {
    padding_factor: f64,
}

impl Default for CameraController {
    fn default() -> Self { Self::new(1.0) }
}

impl CameraController {
    pub fn new(padding_factor: f64) -> Self {
        Self { padding_factor }
    }

    /// Fit the camera around the un-clustered geometry of `feature_id`.
    /// Skipped (`None`) when the point index does not know the feature yet.
    pub fn zoom_to_feature(&self, index: &PointIndex, feature_id: &str, length_m: Option<f64>) -> Option<CameraCommand> {
        let Some(geometry) = index.lookup(feature_id) else {
            tracing::debug!(feature_id, loaded = !index.is_empty(), "zoom to feature skipped: no original geometry");
            return None;
        };
        let bounds = compute_bounds(&geometry, length_m, Some(self.padding_factor))?;
        Some(CameraCommand::FitBounds { bounds: bounds.margined.into() })
    }

    /// Drop any popup padding without otherwise moving the camera.
    pub fn clear_focus(&self) -> CameraCommand {
        CameraCommand::EaseTo { padding: Padding::ZERO }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_index() -> PointIndex {
        let index = PointIndex::new();
        let doc = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [8.5, 47.3] }, "properties": { "id": "p1" } },
            ]
        });
        index.load_from_bytes(doc.to_string().as_bytes()).unwrap();
        index
    }

    #[test]
    fn fits_margined_bounds_of_original_geometry() {
        let command = CameraController::default().zoom_to_feature(&loaded_index(), "p1", Some(200.0)).unwrap();
        let CameraCommand::FitBounds { bounds } = command else { panic!("expected fit bounds") };
        let [west, south, east, north] = bounds.0;
        assert!(west < 8.5 && 8.5 < east);
        assert!(south < 47.3 && 47.3 < north);
    }

    #[test]
    fn longer_padding_gives_wider_box() {
        let index = loaded_index();
        let width = |factor: f64| match CameraController::new(factor).zoom_to_feature(&index, "p1", Some(100.0)) {
            Some(CameraCommand::FitBounds { bounds }) => bounds.0[2] - bounds.0[0],
            other => panic!("unexpected {other:?}"),
        };
        assert!(width(2.0) > width(1.0));
    }

    #[test]
    fn cache_miss_skips_the_zoom() {
        assert!(CameraController::default().zoom_to_feature(&PointIndex::new(), "p1", None).is_none());
        assert!(CameraController::default().zoom_to_feature(&loaded_index(), "p2", None).is_none());
    }

    #[test]
    fn clear_focus_resets_padding() {
        assert_eq!(CameraController::default().clear_focus(), CameraCommand::EaseTo { padding: Padding::ZERO });
    }
}
