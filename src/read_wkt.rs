use crate::point::WGS84Point;
use crate::polygon::Polygon;
use crate::{Error, Result};
use wkt::Wkt;

fn kind(geometry: &Wkt<f64>) -> &'static str {
    match geometry {
        Wkt::Point(_) => "POINT",
        Wkt::LineString(_) => "LINESTRING",
        Wkt::Polygon(_) => "POLYGON",
        Wkt::MultiPoint(_) => "MULTIPOINT",
        Wkt::MultiLineString(_) => "MULTILINESTRING",
        Wkt::MultiPolygon(_) => "MULTIPOLYGON",
        Wkt::GeometryCollection(_) => "GEOMETRYCOLLECTION",
    }
}

/// Decodes a `POLYGON ((...))` string into its exterior ring. Interior rings
/// are dropped. The ring is checked as written: it must already be closed and
/// hold at least four coordinates.
pub fn parse(text: &str) -> Result<Polygon> {
    let geometry: Wkt<f64> = text
        .trim()
        .parse()
        .map_err(|e: &str| Error::GeometryParse(e.to_string()))?;
    let polygon = match geometry {
        Wkt::Polygon(p) => p,
        other => {
            return Err(Error::GeometryParse(format!(
                "expected POLYGON, found {}",
                kind(&other)
            )));
        }
    };
    let Some(exterior) = polygon.rings().first() else {
        return Err(Error::GeometryParse("POLYGON EMPTY".to_string()));
    };
    let wgs = exterior
        .coords()
        .iter()
        .map(|c| WGS84Point::new(c.x, c.y))
        .collect();
    Polygon::new(wgs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_square() {
        let p = parse("POLYGON ((-45 -15, -44 -15, -44 -14, -45 -14, -45 -15))").unwrap();
        assert_eq!(p.ring().len(), 5);
        assert_eq!(p.ring()[0], WGS84Point::new(-45.0, -15.0));
        assert_eq!(p.ring()[2], WGS84Point::new(-44.0, -14.0));
        assert_eq!(p.ring().first(), p.ring().last());
    }

    #[test]
    fn test_parse_keeps_exterior_only() {
        let p = parse(
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 3 2, 3 3, 2 3, 2 2))",
        )
        .unwrap();
        assert_eq!(p.ring().len(), 5);
        assert_eq!(p.ring()[1], WGS84Point::new(10.0, 0.0));
    }

    #[test]
    fn test_parse_padded() {
        assert!(parse("  POLYGON((0 0, 1 0, 1 1, 0 0))  ").is_ok());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(parse("NOT A POLYGON"), Err(Error::GeometryParse(_))));
        assert!(matches!(parse(""), Err(Error::GeometryParse(_))));
        assert!(matches!(
            parse("POLYGON ((0 0, 1 0, 1 1"),
            Err(Error::GeometryParse(_))
        ));
    }

    #[test]
    fn test_rejects_unclosed_ring() {
        assert!(matches!(
            parse("POLYGON ((0 0, 1 0, 1 1, 0 1))"),
            Err(Error::GeometryParse(_))
        ));
        assert!(matches!(
            parse("POLYGON ((0 0, 1 0, 1 1))"),
            Err(Error::GeometryParse(_))
        ));
    }

    #[test]
    fn test_rejects_short_ring() {
        assert!(matches!(
            parse("POLYGON ((0 0, 1 0, 0 0))"),
            Err(Error::GeometryParse(_))
        ));
    }

    #[test]
    fn test_rejects_other_geometries() {
        assert!(matches!(parse("POINT (1 2)"), Err(Error::GeometryParse(_))));
        assert!(matches!(
            parse("LINESTRING (0 0, 1 1)"),
            Err(Error::GeometryParse(_))
        ));
        assert!(matches!(
            parse("MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)))"),
            Err(Error::GeometryParse(_))
        ));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(parse("POLYGON EMPTY"), Err(Error::GeometryParse(_))));
    }
}
