use geo::{Distance, Euclidean};

use crate::point::WGS84Point;
use crate::polygon::Polygon;

/// Flat conversion used to turn a radius in meters into degrees. It ignores
/// latitude, so results drift away from the equator.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

#[derive(Clone, Copy, Debug)]
pub struct FilterCriterion {
    pub center: WGS84Point,
    pub radius_meters: f64,
}

impl FilterCriterion {
    pub fn new(center: WGS84Point, radius_meters: f64) -> Self {
        FilterCriterion {
            center,
            radius_meters,
        }
    }

    pub fn radius_degrees(&self) -> f64 {
        self.radius_meters / METERS_PER_DEGREE
    }

    pub fn matches(&self, polygon: &Polygon) -> bool {
        distance_degrees(polygon, &self.center) <= self.radius_degrees()
    }
}

/// Planar distance in degree space between the center and the polygon, zero
/// when the center lies inside or on the ring.
pub fn distance_degrees(polygon: &Polygon, center: &WGS84Point) -> f64 {
    Euclidean.distance(&center.to_geo(), &polygon.to_geo())
}

pub fn is_within_radius(polygon: &Polygon, center: &WGS84Point, radius_meters: f64) -> bool {
    FilterCriterion::new(*center, radius_meters).matches(polygon)
}
