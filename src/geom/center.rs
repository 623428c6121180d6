use geo::{BoundingRect, Centroid, Coord, Geometry};

/// Representative center of a geometry: area-weighted for polygons, length-weighted
/// for lines. Degenerate geometries fall back to their box center, empty ones to NaN.
pub fn center_of(geometry: &Geometry<f64>) -> Coord<f64> {
    geometry.centroid()
        .map(|point| point.0)
        .or_else(|| geometry.bounding_rect().map(|rect| rect.center()))
        .unwrap_or(Coord { x: f64::NAN, y: f64::NAN })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Point, Polygon};

    #[test]
    fn polygon_center_is_centroid_not_box_midpoint() {
        let triangle = Geometry::Polygon(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)]),
            vec![],
        ));
        let center = center_of(&triangle);
        assert!((center.x - 4.0 / 3.0).abs() < 1e-9);
        assert!((center.y - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn line_center_is_length_weighted() {
        // Long leg along x dominates the short leg along y
        let line = Geometry::LineString(LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 1.0)]));
        let center = center_of(&line);
        assert!((center.x - (10.0 * 5.0 + 1.0 * 10.0) / 11.0).abs() < 1e-9);
        assert!((center.y - (1.0 * 0.5) / 11.0).abs() < 1e-9);
    }

    #[test]
    fn point_center_is_itself() {
        assert_eq!(center_of(&Geometry::Point(Point::new(3.0, -2.0))), Coord { x: 3.0, y: -2.0 });
    }

    #[test]
    fn empty_geometry_center_is_nan() {
        let center = center_of(&Geometry::LineString(LineString::<f64>(vec![])));
        assert!(center.x.is_nan() && center.y.is_nan());
    }
}
