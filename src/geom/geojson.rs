use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde_json::{Map, Value};

/// A feature read from a GeoJSON FeatureCollection.
#[derive(Debug, Clone)]
pub struct GeoJsonFeature {
    pub id: Option<Value>,
    pub geometry: Geometry<f64>,
    pub properties: Map<String, Value>,
}

/// Read all features with a decodable geometry from FeatureCollection bytes.
/// Features with a missing or unsupported geometry are skipped.
pub fn read_features_from_bytes(bytes: &[u8]) -> Result<Vec<GeoJsonFeature>> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    read_features(&value)
}

/// Read all features with a decodable geometry from a FeatureCollection value.
pub fn read_features(value: &Value) -> Result<Vec<GeoJsonFeature>> {
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("GeoJSON document is not a FeatureCollection"))?;

    let mut out = Vec::with_capacity(features.len());
    for feature in features {
        let Ok(geometry) = parse_geometry(&feature["geometry"]) else { continue };
        out.push(GeoJsonFeature {
            id: feature.get("id").cloned(),
            geometry,
            properties: feature["properties"].as_object().cloned().unwrap_or_default(),
        });
    }
    Ok(out)
}

/// Parse a GeoJSON geometry object into a geo::Geometry.
pub fn parse_geometry(value: &Value) -> Result<Geometry<f64>> {
    let ty = value["type"].as_str()
        .ok_or_else(|| anyhow!("Invalid geometry: missing type"))?;

    if ty == "GeometryCollection" {
        let members = value["geometries"].as_array()
            .ok_or_else(|| anyhow!("Invalid GeometryCollection: missing geometries"))?;
        let geoms = members.iter().map(parse_geometry).collect::<Result<Vec<_>>>()?;
        return Ok(Geometry::GeometryCollection(GeometryCollection(geoms)));
    }

    let coords = &value["coordinates"];
    let geometry = match ty {
        "Point" => Geometry::Point(Point(parse_coord(coords)?)),
        "MultiPoint" => Geometry::MultiPoint(MultiPoint(
            as_array(coords)?.iter().map(|c| parse_coord(c).map(Point)).collect::<Result<_>>()?,
        )),
        "LineString" => Geometry::LineString(parse_line(coords)?),
        "MultiLineString" => Geometry::MultiLineString(MultiLineString(
            as_array(coords)?.iter().map(parse_line).collect::<Result<_>>()?,
        )),
        "Polygon" => Geometry::Polygon(parse_polygon(coords)?),
        "MultiPolygon" => Geometry::MultiPolygon(MultiPolygon(
            as_array(coords)?.iter().map(parse_polygon).collect::<Result<_>>()?,
        )),
        other => bail!("Unsupported geometry type: {other}"),
    };
    Ok(geometry)
}

/// Write a geometry back out as a GeoJSON geometry object.
pub fn geometry_to_value(geometry: &Geometry<f64>) -> Value {
    fn coord(c: &Coord<f64>) -> Value { serde_json::json!([c.x, c.y]) }
    fn line(ls: &LineString<f64>) -> Value { Value::Array(ls.coords().map(coord).collect()) }
    fn polygon(p: &Polygon<f64>) -> Value {
        Value::Array(std::iter::once(p.exterior()).chain(p.interiors()).map(line).collect())
    }

    match geometry {
        Geometry::Point(p) => serde_json::json!({ "type": "Point", "coordinates": coord(&p.0) }),
        Geometry::MultiPoint(mp) => serde_json::json!({
            "type": "MultiPoint",
            "coordinates": mp.0.iter().map(|p| coord(&p.0)).collect::<Vec<_>>(),
        }),
        Geometry::LineString(ls) => serde_json::json!({ "type": "LineString", "coordinates": line(ls) }),
        Geometry::MultiLineString(mls) => serde_json::json!({
            "type": "MultiLineString",
            "coordinates": mls.0.iter().map(line).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(p) => serde_json::json!({ "type": "Polygon", "coordinates": polygon(p) }),
        Geometry::MultiPolygon(mp) => serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon).collect::<Vec<_>>(),
        }),
        Geometry::GeometryCollection(gc) => serde_json::json!({
            "type": "GeometryCollection",
            "geometries": gc.0.iter().map(geometry_to_value).collect::<Vec<_>>(),
        }),
        // Line, Rect and Triangle have no GeoJSON counterpart; emit them as polygons/lines.
        Geometry::Line(l) => serde_json::json!({
            "type": "LineString",
            "coordinates": [coord(&l.start), coord(&l.end)],
        }),
        Geometry::Rect(r) => serde_json::json!({ "type": "Polygon", "coordinates": polygon(&r.to_polygon()) }),
        Geometry::Triangle(t) => serde_json::json!({ "type": "Polygon", "coordinates": polygon(&t.to_polygon()) }),
    }
}

fn as_array(value: &Value) -> Result<&Vec<Value>> {
    value.as_array().ok_or_else(|| anyhow!("Invalid geometry: coordinates must be an array"))
}

/// Parse a position: [x, y, ...]. Extra dimensions are ignored.
fn parse_coord(value: &Value) -> Result<Coord<f64>> {
    let pair = as_array(value)?;
    if pair.len() < 2 {
        bail!("Invalid coordinate: expected at least two numbers");
    }
    let x = pair[0].as_f64()
        .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
    let y = pair[1].as_f64()
        .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
    Ok(Coord { x, y })
}

fn parse_line(value: &Value) -> Result<LineString<f64>> {
    Ok(LineString(as_array(value)?.iter().map(parse_coord).collect::<Result<_>>()?))
}

/// Format: [exterior, interior, interior, ...]
fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let rings = as_array(value)?;
    let (exterior, interiors) = rings.split_first()
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))?;

    // geo closes rings on construction
    Ok(Polygon::new(
        parse_line(exterior)?,
        interiors.iter().map(parse_line).collect::<Result<_>>()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_common_geometry_types() {
        let point = parse_geometry(&json!({ "type": "Point", "coordinates": [1.0, 2.0, 30.0] })).unwrap();
        assert_eq!(point, Geometry::Point(Point::new(1.0, 2.0)));

        let line = parse_geometry(&json!({ "type": "LineString", "coordinates": [[0, 0], [1, 1]] })).unwrap();
        assert!(matches!(line, Geometry::LineString(ref ls) if ls.0.len() == 2));

        let polygon = parse_geometry(&json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]
        })).unwrap();
        assert!(matches!(polygon, Geometry::Polygon(_)));
    }

    #[test]
    fn rejects_malformed_geometry() {
        assert!(parse_geometry(&json!({ "type": "Point", "coordinates": [1.0] })).is_err());
        assert!(parse_geometry(&json!({ "type": "Point", "coordinates": ["a", 1] })).is_err());
        assert!(parse_geometry(&json!({ "type": "Curve", "coordinates": [] })).is_err());
        assert!(parse_geometry(&json!({ "coordinates": [0, 0] })).is_err());
        assert!(parse_geometry(&json!({ "type": "Polygon", "coordinates": [] })).is_err());
    }

    #[test]
    fn feature_collection_skips_undecodable_features() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [5, 6] }, "properties": { "id": "a" } },
                { "type": "Feature", "geometry": null, "properties": { "id": "b" } },
                { "type": "Feature", "id": 7, "geometry": { "type": "Point", "coordinates": [1, 1] } },
            ]
        });
        let features = read_features_from_bytes(doc.to_string().as_bytes()).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].properties["id"], "a");
        assert_eq!(features[1].id, Some(json!(7)));
        assert!(features[1].properties.is_empty());
    }

    #[test]
    fn non_collection_is_an_error() {
        assert!(read_features_from_bytes(b"{\"type\":\"Feature\"}").is_err());
        assert!(read_features_from_bytes(b"not json").is_err());
    }

    #[test]
    fn geometry_survives_writing_and_reading() {
        let source = json!({
            "type": "MultiPolygon",
            "coordinates": [[[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 0.0]]]]
        });
        let geometry = parse_geometry(&source).unwrap();
        assert_eq!(geometry_to_value(&geometry), source);
    }
}
