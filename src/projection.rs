use serde::Deserialize;

use crate::{
    Error, Result,
    point::{PlanarPoint, WGS84BoundingBox, WGS84Point},
    polygon::{Polygon, ProjectedPolygon},
};

const WGS84_PROJ4: &str = "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs";

/// UTM zone used as the planar metric system. Defaults to EPSG:32723.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct UtmZone {
    pub zone: u8,
    pub south: bool,
}

impl Default for UtmZone {
    fn default() -> Self {
        UtmZone {
            zone: 23,
            south: true,
        }
    }
}

impl UtmZone {
    pub fn to_proj4(&self) -> String {
        let hemisphere = if self.south { " +south" } else { "" };
        format!(
            "+proj=utm +zone={}{} +datum=WGS84 +units=m +no_defs +type=crs",
            self.zone, hemisphere
        )
    }

    pub fn epsg(&self) -> u32 {
        let base = if self.south { 32700 } else { 32600 };
        base + self.zone as u32
    }

    /// Nominal extent of the zone.
    pub fn wgsbbox(&self) -> WGS84BoundingBox {
        let west = -180.0 + (self.zone as f64 - 1.0) * 6.0;
        let (south, north) = if self.south { (-80.0, 0.0) } else { (0.0, 84.0) };
        WGS84BoundingBox {
            min: WGS84Point::new(west, south),
            max: WGS84Point::new(west + 6.0, north),
        }
    }
}

pub struct UtmProjection {
    zone: UtmZone,
    wgs84_spec: proj4rs::proj::Proj,
    dst_spec: proj4rs::proj::Proj,
}

impl UtmProjection {
    pub fn new(zone: UtmZone) -> Result<UtmProjection> {
        use proj4rs::proj::Proj;
        if zone.zone == 0 || zone.zone > 60 {
            return Err(Error::Projection(format!("no such utm zone: {}", zone.zone)));
        }
        let dst_spec = Proj::from_proj_string(zone.to_proj4().as_str())
            .map_err(|e| Error::Projection(format!("{:?}", e)))?;
        let wgs84_spec =
            Proj::from_proj_string(WGS84_PROJ4).map_err(|e| Error::Projection(format!("{:?}", e)))?;
        log::debug!("projection: EPSG:{} ({})", zone.epsg(), zone.to_proj4());
        Ok(UtmProjection {
            zone,
            wgs84_spec,
            dst_spec,
        })
    }

    pub fn zone(&self) -> UtmZone {
        self.zone
    }

    /// Whether the whole polygon lies inside the zone's longitude band.
    pub fn covers(&self, polygon: &Polygon) -> bool {
        let zone = self.zone.wgsbbox();
        let bbox = polygon.wgsbbox();
        zone.contains(&bbox.min) && zone.contains(&bbox.max)
    }

    pub fn project(&self, wgs: &WGS84Point) -> Result<PlanarPoint> {
        let mut p = (wgs.lon.to_radians(), wgs.lat.to_radians());
        proj4rs::transform::transform(&self.wgs84_spec, &self.dst_spec, &mut p)
            .map_err(|e| Error::Projection(format!("{}: {:?}", wgs, e)))?;
        if !p.0.is_finite() || !p.1.is_finite() {
            return Err(Error::Projection(format!("{} has no planar image", wgs)));
        }
        Ok(PlanarPoint { x: p.0, y: p.1 })
    }

    pub fn project_polygon(&self, polygon: &Polygon) -> Result<ProjectedPolygon> {
        if !self.covers(polygon) {
            log::warn!("not in EPSG:{}: {}", self.zone.epsg(), polygon.wgsbbox());
        }
        let planar = polygon
            .ring()
            .iter()
            .map(|w| self.project(w))
            .collect::<Result<Vec<_>>>()?;
        Ok(ProjectedPolygon { planar })
    }
}
