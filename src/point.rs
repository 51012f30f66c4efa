use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WGS84Point {
    pub lon: f64,
    pub lat: f64,
}

impl WGS84Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        WGS84Point { lon, lat }
    }
    pub fn to_geo(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

impl fmt::Display for WGS84Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wgs(lat: {:.6}, lon: {:.6})", self.lat, self.lon)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for PlanarPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "planar(x: {:.2}, y: {:.2})", self.x, self.y)
    }
}

#[derive(Clone, Debug)]
pub struct WGS84BoundingBox {
    pub min: WGS84Point,
    pub max: WGS84Point,
}

impl WGS84BoundingBox {
    pub fn contains(&self, w: &WGS84Point) -> bool {
        w.lon >= self.min.lon
            && w.lon <= self.max.lon
            && w.lat >= self.min.lat
            && w.lat <= self.max.lat
    }
}

impl fmt::Display for WGS84BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wgsbbox(min: {}, max: {})", self.min, self.max)
    }
}
