use std::path::PathBuf;

use crate::config::RecordsConfig;
use crate::point::WGS84Point;
use crate::proximity::FilterCriterion;
use crate::records::{self, RowOutcome, RowWriter};
use crate::{Error, Result};

#[derive(Clone, Debug)]
pub struct FilterRequest {
    pub center: WGS84Point,
    pub radius_meters: f64,
    pub source: PathBuf,
    pub destination: PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSummary {
    pub destination: PathBuf,
    pub scanned: usize,
    pub written: usize,
    pub skipped: usize,
}

/// Copies the header and every row whose polygon lies within the radius of
/// the center, keeping source order. Rows without a readable polygon are
/// skipped.
pub fn filter_records(request: &FilterRequest, config: &RecordsConfig) -> Result<FilterSummary> {
    if request.radius_meters.is_nan() || request.radius_meters < 0.0 {
        return Err(Error::InvalidNumericInput(format!(
            "radius must be zero or positive, got {}",
            request.radius_meters
        )));
    }
    let criterion = FilterCriterion::new(request.center, request.radius_meters);
    let delimiter = config.delimiter_byte()?;
    log::info!(
        "filter: {} around {} within {} m ({:.6} deg)",
        request.source.display(),
        criterion.center,
        criterion.radius_meters,
        criterion.radius_degrees()
    );

    let reader = records::read_rows(&request.source, delimiter)?;
    let mut writer = RowWriter::create(&request.destination, reader.header(), delimiter)?;
    let mut summary = FilterSummary::default();
    for outcome in reader.outcomes(config.wkt_column) {
        summary.scanned += 1;
        match outcome? {
            RowOutcome::Parsed(row) => {
                if criterion.matches(&row.polygon) {
                    writer.write_row(&row.fields)?;
                    summary.written += 1;
                }
            }
            RowOutcome::Skipped(skipped) => {
                log::debug!("skip line {}: {}", skipped.line, skipped.reason);
                summary.skipped += 1;
            }
        }
    }
    summary.destination = writer.finish()?;
    log::info!(
        "filter: {} of {} rows written to {} ({} skipped)",
        summary.written,
        summary.scanned,
        summary.destination.display(),
        summary.skipped
    );
    Ok(summary)
}
