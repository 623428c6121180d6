use geo::{BoundingRect, Coord, Geometry, Rect};
use serde::Serialize;

/// Mean earth radius used for buffering (meters).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Buffer radius applied when no feature length is known (kilometers).
pub const DEFAULT_RADIUS_KM: f64 = 0.3;

/// Number of vertices approximating the buffer circle.
const BUFFER_STEPS: usize = 4;

/// Camera boxes around a geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Axis-aligned bounding box of the geometry.
    pub exact: Rect<f64>,
    /// Box around a circle buffered from the center of `exact`.
    pub margined: Rect<f64>,
}

/// `[west, south, east, north]`, the order renderers take for fit-bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxArray(pub [f64; 4]);

impl From<Rect<f64>> for BoxArray {
    fn from(rect: Rect<f64>) -> Self {
        BoxArray([rect.min().x, rect.min().y, rect.max().x, rect.max().y])
    }
}

/// Buffer radius in kilometers for a feature of `length_m` meters.
/// Falls back to `DEFAULT_RADIUS_KM` when the length is unknown or not positive.
pub fn buffer_radius_km(length_m: Option<f64>, padding: Option<f64>) -> f64 {
    match length_m {
        Some(length) if length.is_finite() && length > 0.0 => {
            let radius = length * padding.unwrap_or(1.0) / 1000.0;
            if radius.is_finite() && radius > 0.0 { radius } else { DEFAULT_RADIUS_KM }
        }
        _ => DEFAULT_RADIUS_KM,
    }
}

/// Compute the exact and margined boxes of a geometry.
/// Returns `None` for geometries without coordinates.
pub fn compute_bounds(geometry: &Geometry<f64>, length_m: Option<f64>, padding: Option<f64>) -> Option<Bounds> {
    let exact = geometry.bounding_rect()?;
    let radius_m = buffer_radius_km(length_m, padding) * 1000.0;
    let margined = buffer_box(exact.center(), radius_m);
    Some(Bounds { exact, margined })
}

/// Box around a `BUFFER_STEPS`-gon of radius `radius_m` centered on `center`.
fn buffer_box(center: Coord<f64>, radius_m: f64) -> Rect<f64> {
    let mut min = Coord { x: f64::INFINITY, y: f64::INFINITY };
    let mut max = Coord { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY };

    for i in 0..BUFFER_STEPS {
        let bearing = -360.0 * i as f64 / BUFFER_STEPS as f64;
        let vertex = destination(center, bearing, radius_m);
        min.x = min.x.min(vertex.x);
        min.y = min.y.min(vertex.y);
        max.x = max.x.max(vertex.x);
        max.y = max.y.max(vertex.y);
    }
    Rect::new(min, max)
}

/// Point reached from `origin` travelling `distance_m` along `bearing_deg` on a sphere.
pub fn destination(origin: Coord<f64>, bearing_deg: f64, distance_m: f64) -> Coord<f64> {
    let lon1 = origin.x.to_radians();
    let lat1 = origin.y.to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1 + (bearing.sin() * delta.sin() * lat1.cos())
        .atan2(delta.cos() - lat1.sin() * lat2.sin());

    Coord { x: lon2.to_degrees(), y: lat2.to_degrees() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Point, Polygon};

    fn area(rect: &Rect<f64>) -> f64 { rect.width() * rect.height() }

    fn contains(rect: &Rect<f64>, c: Coord<f64>) -> bool {
        rect.min().x <= c.x && c.x <= rect.max().x && rect.min().y <= c.y && c.y <= rect.max().y
    }

    #[test]
    fn exact_box_matches_geometry_extent() {
        let line = Geometry::LineString(LineString::from(vec![(10.0, 45.0), (10.02, 45.01), (10.01, 45.03)]));
        let bounds = compute_bounds(&line, Some(300.0), None).unwrap();
        assert_eq!(bounds.exact.min(), Coord { x: 10.0, y: 45.0 });
        assert_eq!(bounds.exact.max(), Coord { x: 10.02, y: 45.03 });
    }

    #[test]
    fn margined_box_contains_center_and_has_area() {
        let geoms = [
            Geometry::Point(Point::new(-122.4, 37.8)),
            Geometry::LineString(LineString::from(vec![(0.0, 0.0), (0.001, 0.001)])),
            Geometry::Polygon(Polygon::new(
                LineString::from(vec![(5.0, 5.0), (5.01, 5.0), (5.01, 5.01), (5.0, 5.0)]),
                vec![],
            )),
        ];
        for geom in &geoms {
            for length in [None, Some(50.0), Some(1500.0)] {
                let bounds = compute_bounds(geom, length, Some(2.0)).unwrap();
                assert!(contains(&bounds.margined, bounds.exact.center()));
                assert!(area(&bounds.margined) > 0.0);
            }
        }
    }

    #[test]
    fn doubling_length_grows_margined_box() {
        let point = Geometry::Point(Point::new(8.5, 47.3));
        let mut last = 0.0;
        for length in [10.0, 20.0, 40.0, 80.0, 160.0] {
            let bounds = compute_bounds(&point, Some(length), Some(1.5)).unwrap();
            let a = area(&bounds.margined);
            assert!(a > last, "area {a} did not grow past {last} at length {length}");
            last = a;
        }
    }

    #[test]
    fn unknown_length_uses_default_radius() {
        assert_eq!(buffer_radius_km(None, Some(3.0)), DEFAULT_RADIUS_KM);
        assert_eq!(buffer_radius_km(Some(0.0), None), DEFAULT_RADIUS_KM);
        assert_eq!(buffer_radius_km(Some(f64::NAN), None), DEFAULT_RADIUS_KM);
        assert_eq!(buffer_radius_km(Some(500.0), None), 0.5);
        assert_eq!(buffer_radius_km(Some(500.0), Some(2.0)), 1.0);
    }

    #[test]
    fn default_radius_box_spans_roughly_its_diameter() {
        let bounds = compute_bounds(&Geometry::Point(Point::new(0.0, 0.0)), None, None).unwrap();
        // 600 m at the equator is ~0.0054 degrees
        assert!((bounds.margined.height() - 0.0054).abs() < 1e-4);
        assert!((bounds.margined.width() - 0.0054).abs() < 1e-4);
    }

    #[test]
    fn same_input_same_box() {
        let point = Geometry::Point(Point::new(14.2, -3.3));
        assert_eq!(compute_bounds(&point, Some(42.0), None), compute_bounds(&point, Some(42.0), None));
    }

    #[test]
    fn empty_geometry_has_no_bounds() {
        let empty = Geometry::LineString(LineString::<f64>(vec![]));
        assert!(compute_bounds(&empty, None, None).is_none());
    }

    #[test]
    fn box_array_is_west_south_east_north() {
        let rect = Rect::new(Coord { x: 3.0, y: 4.0 }, Coord { x: 1.0, y: 2.0 });
        assert_eq!(BoxArray::from(rect).0, [1.0, 2.0, 3.0, 4.0]);
    }
}
