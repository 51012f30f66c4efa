use geo::orient::Direction;
use geo::{Area, GeodesicArea, Orient};

use crate::{
    Error, Result,
    point::{PlanarPoint, WGS84BoundingBox, WGS84Point},
};

pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Exterior ring of a parcel in geodetic degrees. Always closed, with at
/// least four coordinate pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    wgs: Vec<WGS84Point>,
}

impl Polygon {
    pub fn new(wgs: Vec<WGS84Point>) -> Result<Self> {
        if wgs.is_empty() {
            return Err(Error::GeometryParse("empty ring".to_string()));
        }
        if wgs.first() != wgs.last() {
            return Err(Error::GeometryParse("ring is not closed".to_string()));
        }
        if wgs.len() < 4 {
            return Err(Error::GeometryParse(format!(
                "ring has {} coordinates, expected at least 4",
                wgs.len()
            )));
        }
        Ok(Polygon { wgs })
    }

    pub fn from_geo(polygon: &geo::Polygon<f64>) -> Result<Self> {
        let wgs = polygon
            .exterior()
            .0
            .iter()
            .map(|c| WGS84Point::new(c.x, c.y))
            .collect();
        Polygon::new(wgs)
    }

    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let coords: Vec<geo::Coord<f64>> = self
            .wgs
            .iter()
            .map(|p| geo::Coord { x: p.lon, y: p.lat })
            .collect();
        geo::Polygon::new(coords.into(), vec![])
    }

    pub fn ring(&self) -> &[WGS84Point] {
        &self.wgs
    }

    /// Area on the WGS84 ellipsoid in square meters, independent of any
    /// projection. Used to cross-check projected areas.
    pub fn geodesic_area(&self) -> f64 {
        // the geodesic sum expects a counter-clockwise exterior
        self.to_geo()
            .orient(Direction::Default)
            .geodesic_area_unsigned()
    }

    pub fn geodesic_hectares(&self) -> f64 {
        self.geodesic_area() / SQUARE_METERS_PER_HECTARE
    }

    pub fn info(&self) {
        log::trace!("polygon: len: {}", self.wgs.len());
        log::trace!("polygon: wgs bbox: {}", self.wgsbbox());
    }

    pub fn wgsbbox(&self) -> WGS84BoundingBox {
        let first = self.wgs[0];
        let (min, max) = self.wgs.iter().fold((first, first), |(min, max), curr| {
            (
                WGS84Point::new(min.lon.min(curr.lon), min.lat.min(curr.lat)),
                WGS84Point::new(max.lon.max(curr.lon), max.lat.max(curr.lat)),
            )
        });
        WGS84BoundingBox { min, max }
    }
}

/// A polygon after reprojection into a planar metric system.
#[derive(Clone, Debug)]
pub struct ProjectedPolygon {
    pub planar: Vec<PlanarPoint>,
}

impl ProjectedPolygon {
    /// Shoelace area of the planar ring, in square meters.
    pub fn area(&self) -> f64 {
        if self.planar.len() < 3 {
            return 0.0;
        }
        let ring: Vec<geo::Coord<f64>> = self
            .planar
            .iter()
            .map(|p| geo::Coord { x: p.x, y: p.y })
            .collect();
        geo::Polygon::new(ring.into(), vec![]).unsigned_area()
    }

    pub fn hectares(&self) -> f64 {
        self.area() / SQUARE_METERS_PER_HECTARE
    }
}
