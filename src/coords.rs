use std::sync::LazyLock;

use regex::Regex;

use crate::point::WGS84Point;
use crate::{Error, Result};

static AT_LAT_LON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([-\d\.]+),([-\d\.]+)").expect("valid regex"));

/// Finds the `@lat,lon` segment of a map URL and returns it as (lon, lat).
pub fn extract_coords_from_url(url: &str) -> Result<WGS84Point> {
    let caps = AT_LAT_LON
        .captures(url)
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
    let number = |i: usize| -> Result<f64> {
        caps[i]
            .parse::<f64>()
            .map_err(|_| Error::InvalidUrl(url.to_string()))
    };
    let lat = number(1)?;
    let lon = number(2)?;
    Ok(WGS84Point::new(lon, lat))
}

/// Parses a radius typed by the user. Negative and NaN values are refused.
pub fn parse_radius(text: &str) -> Result<f64> {
    let radius: f64 = text
        .trim()
        .parse()
        .map_err(|_| Error::InvalidNumericInput(format!("radius {:?} is not a number", text)))?;
    if radius.is_nan() || radius < 0.0 {
        return Err(Error::InvalidNumericInput(format!(
            "radius must be zero or positive, got {}",
            text
        )));
    }
    Ok(radius)
}

pub fn parse_degrees(text: &str, what: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidNumericInput(format!("{} {:?} is not a number", what, text)))
}
