use std::path::{Path, PathBuf};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::color::AbgrColor;
use crate::polygon::Polygon;
use crate::{Result, output};

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
/// Opaque red, in aabbggrr.
pub const LINE_COLOR: &str = "ff0000ff";
pub const LINE_WIDTH: u32 = 2;

#[derive(Clone, Debug)]
pub struct Placemark {
    pub name: String,
    pub polygon: Polygon,
}

/// In-memory KML document. A single document holds one bare placemark; a
/// combined one wraps its placemarks in a `<Document>`.
#[derive(Clone, Debug)]
pub struct KmlDocument {
    fill: AbgrColor,
    combined: bool,
    placemarks: Vec<Placemark>,
}

pub fn single_label(area_hectares: f64) -> String {
    format!("Polygon - Área: {:.2} ha", area_hectares)
}

pub fn single_document(polygon: &Polygon, area_hectares: f64, fill: &AbgrColor) -> KmlDocument {
    KmlDocument {
        fill: fill.clone(),
        combined: false,
        placemarks: vec![Placemark {
            name: single_label(area_hectares),
            polygon: polygon.clone(),
        }],
    }
}

pub fn combined_document<I>(polygons: I, fill: &AbgrColor) -> KmlDocument
where
    I: IntoIterator<Item = Polygon>,
{
    let mut doc = KmlDocument::combined(fill);
    for polygon in polygons {
        doc.push(polygon);
    }
    doc
}

impl KmlDocument {
    pub fn combined(fill: &AbgrColor) -> Self {
        KmlDocument {
            fill: fill.clone(),
            combined: true,
            placemarks: Vec::new(),
        }
    }

    /// Appends a placemark named `Polygon {n}`, n counting from 1, and
    /// returns n.
    pub fn push(&mut self, polygon: Polygon) -> usize {
        let n = self.placemarks.len() + 1;
        self.placemarks.push(Placemark {
            name: format!("Polygon {}", n),
            polygon,
        });
        n
    }

    pub fn len(&self) -> usize {
        self.placemarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placemarks.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut kml = BytesStart::new("kml");
        kml.push_attribute(("xmlns", KML_NAMESPACE));
        writer.write_event(Event::Start(kml))?;
        if self.combined {
            start(&mut writer, "Document")?;
        }
        for placemark in &self.placemarks {
            write_placemark(&mut writer, placemark, &self.fill)?;
        }
        if self.combined {
            end(&mut writer, "Document")?;
        }
        end(&mut writer, "kml")?;
        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Serializes the whole document, then moves it into place at `path`.
    pub fn write(&self, path: &Path) -> Result<PathBuf> {
        let bytes = self.to_bytes()?;
        output::write_atomically(path, &bytes)
    }
}

fn start(w: &mut Writer<Vec<u8>>, name: &str) -> quick_xml::Result<()> {
    w.write_event(Event::Start(BytesStart::new(name)))
}

fn end(w: &mut Writer<Vec<u8>>, name: &str) -> quick_xml::Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))
}

fn text_element(w: &mut Writer<Vec<u8>>, name: &str, text: &str) -> quick_xml::Result<()> {
    start(w, name)?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    end(w, name)
}

fn write_placemark(
    w: &mut Writer<Vec<u8>>,
    placemark: &Placemark,
    fill: &AbgrColor,
) -> quick_xml::Result<()> {
    start(w, "Placemark")?;
    text_element(w, "name", &placemark.name)?;

    start(w, "Style")?;
    start(w, "LineStyle")?;
    text_element(w, "color", LINE_COLOR)?;
    text_element(w, "width", &LINE_WIDTH.to_string())?;
    end(w, "LineStyle")?;
    start(w, "PolyStyle")?;
    text_element(w, "color", fill.as_str())?;
    end(w, "PolyStyle")?;
    end(w, "Style")?;

    start(w, "Polygon")?;
    start(w, "outerBoundaryIs")?;
    start(w, "LinearRing")?;
    text_element(w, "coordinates", &coordinates(&placemark.polygon))?;
    end(w, "LinearRing")?;
    end(w, "outerBoundaryIs")?;
    end(w, "Polygon")?;

    end(w, "Placemark")
}

fn number(v: f64) -> String {
    // integral values keep a trailing ".0"
    if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

pub fn coordinates(polygon: &Polygon) -> String {
    polygon
        .ring()
        .iter()
        .map(|p| format!("{},{},0", number(p.lon), number(p.lat)))
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_wkt;

    fn polygon() -> Polygon {
        read_wkt::parse("POLYGON ((-45.5 -15.25, -45 -15.25, -45 -15, -45.5 -15.25))").unwrap()
    }

    fn fill() -> AbgrColor {
        AbgrColor::from_rgb_hex("#112233").unwrap()
    }

    fn text(doc: &KmlDocument) -> String {
        String::from_utf8(doc.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_coordinates() {
        assert_eq!(
            coordinates(&polygon()),
            "-45.5,-15.25,0 -45.0,-15.25,0 -45.0,-15.0,0 -45.5,-15.25,0"
        );
    }

    #[test]
    fn test_single_document() {
        let doc = single_document(&polygon(), 12.3456, &fill());
        let s = text(&doc);
        assert!(s.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(s.contains(r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#));
        assert_eq!(s.matches("<kml").count(), 1);
        assert!(!s.contains("<Document>"));
        assert!(s.contains("<name>Polygon - Área: 12.35 ha</name>"));
        assert!(s.contains("<color>ff0000ff</color>"));
        assert!(s.contains("<width>2</width>"));
        assert!(s.contains("<color>7d332211</color>"));
        assert!(s.contains(
            "<coordinates>-45.5,-15.25,0 -45.0,-15.25,0 -45.0,-15.0,0 -45.5,-15.25,0</coordinates>"
        ));
        assert!(s.trim_end().ends_with("</kml>"));
    }

    #[test]
    fn test_element_order() {
        let s = text(&single_document(&polygon(), 1.0, &fill()));
        let name = s.find("<name>").unwrap();
        let style = s.find("<Style>").unwrap();
        let line = s.find("<LineStyle>").unwrap();
        let poly_style = s.find("<PolyStyle>").unwrap();
        let geometry = s.find("<Polygon>").unwrap();
        assert!(name < style && style < line && line < poly_style && poly_style < geometry);
    }

    #[test]
    fn test_same_input_same_bytes() {
        let a = single_document(&polygon(), 3.0, &fill()).to_bytes().unwrap();
        let b = single_document(&polygon(), 3.0, &fill()).to_bytes().unwrap();
        assert_eq!(a, b);

        let c = String::from_utf8(single_document(&polygon(), 4.0, &fill()).to_bytes().unwrap())
            .unwrap();
        let a = String::from_utf8(a).unwrap();
        assert_ne!(a, c);
        assert_eq!(a.replace("3.00 ha", "4.00 ha"), c);
    }

    #[test]
    fn test_combined_numbering() {
        let doc = combined_document(vec![polygon(), polygon(), polygon()], &fill());
        assert_eq!(doc.len(), 3);
        let s = text(&doc);
        assert_eq!(s.matches("<Document>").count(), 1);
        assert_eq!(s.matches("<Placemark>").count(), 3);
        for n in 1..=3 {
            assert!(s.contains(&format!("<name>Polygon {}</name>", n)));
        }
        assert!(!s.contains("Polygon 4"));
    }

    #[test]
    fn test_empty_combined() {
        let doc = KmlDocument::combined(&fill());
        assert!(doc.is_empty());
        let s = text(&doc);
        assert!(s.contains("<Document>"));
        assert!(!s.contains("<Placemark>"));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.kml");
        let doc = single_document(&polygon(), 1.0, &fill());
        doc.write(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), doc.to_bytes().unwrap());
    }
}
