use crate::polygon::Polygon;
use crate::{Error, Result};
use kml::Kml;
use kml::types::Geometry;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct PlacemarkPolygon {
    pub name: String,
    pub polygon: Polygon,
}

pub fn read_placemarks(path: &Path) -> Result<Vec<PlacemarkPolygon>> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::SourceNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    parse_placemarks(&content)
}

pub fn parse_placemarks(content: &str) -> Result<Vec<PlacemarkPolygon>> {
    let kml: Kml = content.parse()?;
    let mut ret = Vec::new();
    collect_polygons(&kml, &mut ret)?;
    Ok(ret)
}

// KML nests placemarks in documents and folders, walk all of them.
fn collect_polygons(kml: &Kml, ret: &mut Vec<PlacemarkPolygon>) -> Result<()> {
    match kml {
        Kml::KmlDocument(doc) => {
            for e in &doc.elements {
                collect_polygons(e, ret)?;
            }
        }
        Kml::Document { elements, .. } => {
            for e in elements {
                collect_polygons(e, ret)?;
            }
        }
        Kml::Folder(z) => {
            for e in &z.elements {
                collect_polygons(e, ret)?;
            }
        }
        Kml::Placemark(p) => {
            if let Some(Geometry::Polygon(ls)) = &p.geometry {
                let polygon = Polygon::from_geo(&geo::Polygon::from(ls.clone()))?;
                ret.push(PlacemarkPolygon {
                    name: p.name.clone().unwrap_or_default(),
                    polygon,
                });
            }
        }
        _ => {}
    }
    Ok(())
}
