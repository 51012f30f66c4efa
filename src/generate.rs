use std::path::{Path, PathBuf};

use crate::color::AbgrColor;
use crate::config::AppConfig;
use crate::projection::UtmProjection;
use crate::records::{self, RowOutcome};
use crate::write_kml;
use crate::{Error, Result};

#[derive(Clone, Debug)]
pub struct KmlFilesRequest {
    pub source: PathBuf,
    pub fill: AbgrColor,
    pub target_directory: PathBuf,
}

#[derive(Clone, Debug)]
pub struct CombinedKmlRequest {
    pub source: PathBuf,
    pub fill: AbgrColor,
    pub destination: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CombinedSummary {
    pub destination: PathBuf,
    pub placemarks: usize,
    pub skipped: usize,
}

/// `{index}_{base}_{hectares}_polygon.kml`, where base is the source file
/// name with `.csv` removed.
pub fn kml_file_name(index: usize, source: &Path, area_hectares: f64) -> String {
    let base = source
        .file_name()
        .map(|n| n.to_string_lossy().replace(".csv", ""))
        .unwrap_or_default();
    format!("{}_{}_{:.2}_polygon.kml", index, base, area_hectares)
}

/// Writes one KML file per readable polygon of the source, labeled with its
/// projected area. Returns the written paths in source order.
pub fn generate_kml_files(request: &KmlFilesRequest, config: &AppConfig) -> Result<Vec<PathBuf>> {
    if !request.target_directory.is_dir() {
        return Err(Error::InvalidDirectory(request.target_directory.clone()));
    }
    let projection = UtmProjection::new(config.projection)?;
    let reader = records::read_rows(&request.source, config.records.delimiter_byte()?)?;
    log::info!(
        "kml: {} -> {} (EPSG:{})",
        request.source.display(),
        request.target_directory.display(),
        projection.zone().epsg()
    );

    let mut written = Vec::new();
    for outcome in reader.outcomes(config.records.wkt_column) {
        let row = match outcome? {
            RowOutcome::Parsed(row) => row,
            RowOutcome::Skipped(skipped) => {
                log::debug!("skip line {}: {}", skipped.line, skipped.reason);
                continue;
            }
        };
        row.polygon.info();
        let hectares = projection.project_polygon(&row.polygon)?.hectares();
        let index = written.len() + 1;
        let path = request
            .target_directory
            .join(kml_file_name(index, &request.source, hectares));
        log::trace!("line {}: {:.4} ha -> {}", row.line, hectares, path.display());
        let doc = write_kml::single_document(&row.polygon, hectares, &request.fill);
        written.push(doc.write(&path)?);
    }
    log::info!("kml: {} files written", written.len());
    Ok(written)
}

/// Collects every readable polygon of the source into one document with
/// placemarks numbered from 1.
pub fn generate_combined_kml(
    request: &CombinedKmlRequest,
    config: &AppConfig,
) -> Result<CombinedSummary> {
    let reader = records::read_rows(&request.source, config.records.delimiter_byte()?)?;
    let mut polygons = Vec::new();
    let mut skipped = 0;
    for outcome in reader.outcomes(config.records.wkt_column) {
        match outcome? {
            RowOutcome::Parsed(row) => {
                polygons.push(row.polygon);
                log::trace!("line {} -> Polygon {}", row.line, polygons.len());
            }
            RowOutcome::Skipped(s) => {
                log::debug!("skip line {}: {}", s.line, s.reason);
                skipped += 1;
            }
        }
    }
    let doc = write_kml::combined_document(polygons, &request.fill);
    let destination = doc.write(&request.destination)?;
    log::info!(
        "combined kml: {} placemarks written to {}",
        doc.len(),
        destination.display()
    );
    Ok(CombinedSummary {
        destination,
        placemarks: doc.len(),
        skipped,
    })
}
