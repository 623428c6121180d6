use serde::{Deserialize, Serialize};

/// Name of the URL query parameter holding the viewport.
pub const MAP_PARAM: &str = "map";

/// Decimal places kept when encoding viewport values.
pub const PRECISION: i32 = 5;

/// Map camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub zoom: f64,
}

impl Viewport {
    pub fn new(longitude: f64, latitude: f64, zoom: f64) -> Self {
        Self { longitude, latitude, zoom }
    }

    /// Read the viewport out of a URL query string such as `?map=8.5,47.3,12&tab=spots`.
    /// Returns `None` when the parameter is absent or longitude/latitude are unusable.
    pub fn parse(query: &str) -> Option<Self> {
        let query = query.trim_start_matches('?');
        query.split('&')
            .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
            .find(|(key, _)| *key == MAP_PARAM)
            .and_then(|(_, value)| Self::parse_param(value))
    }

    /// Parse the `<lon>,<lat>[,<zoom>]` parameter value.
    pub fn parse_param(value: &str) -> Option<Self> {
        let value = decode_commas(value);
        let mut tokens = value.split(',').map(parse_number);

        let longitude = tokens.next().flatten()?;
        let latitude = tokens.next().flatten()?;
        let zoom = tokens.next().flatten().unwrap_or(0.0);
        Some(Self { longitude, latitude, zoom })
    }

    /// Encode as the `<lon>,<lat>[,<zoom>]` parameter value.
    pub fn to_param(&self) -> String {
        format_viewport_param(self.longitude, self.latitude, self.zoom)
    }

    /// Round every component to the encoding precision.
    pub fn rounded(&self) -> Self {
        Self {
            longitude: round(self.longitude, PRECISION),
            latitude: round(self.latitude, PRECISION),
            zoom: round(self.zoom, PRECISION),
        }
    }
}

/// Encode a viewport parameter value; the zoom term is dropped when zoom is zero or NaN.
pub fn format_viewport_param(longitude: f64, latitude: f64, zoom: f64) -> String {
    let mut out = format!("{},{}", round(longitude, PRECISION), round(latitude, PRECISION));
    if zoom != 0.0 && !zoom.is_nan() {
        out.push_str(&format!(",{}", round(zoom, PRECISION)));
    }
    out
}

/// Round half up to `precision` decimals. Negative zero is normalized to zero.
pub fn round(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor + 0.5).floor() / factor + 0.0
}

fn parse_number(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `URLSearchParams` percent-encodes commas when writing the parameter.
fn decode_commas(value: &str) -> String {
    value.replace("%2C", ",").replace("%2c", ",")
}
