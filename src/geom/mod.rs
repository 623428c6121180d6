mod bbox;
mod center;
mod geojson;

pub use bbox::{compute_bounds, Bounds, BoxArray};
pub use center::center_of;
pub use geojson::{geometry_to_value, parse_geometry, read_features_from_bytes, GeoJsonFeature};
