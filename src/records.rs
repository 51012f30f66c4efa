use std::fs::File;
use std::path::{Path, PathBuf};

use crate::output::Staged;
use crate::polygon::Polygon;
use crate::{Error, Result, read_wkt};

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// 1-based line number in the source file.
    pub line: u64,
    pub fields: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ParsedRow {
    pub line: u64,
    pub fields: Vec<String>,
    pub polygon: Polygon,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Clone, Debug)]
pub enum RowOutcome {
    Parsed(ParsedRow),
    Skipped(SkippedRow),
}

pub fn decode_row(row: Row, column: usize) -> RowOutcome {
    let Some(wkt) = row.fields.get(column) else {
        return RowOutcome::Skipped(SkippedRow {
            line: row.line,
            reason: format!("row has {} fields, no column {}", row.fields.len(), column),
        });
    };
    match read_wkt::parse(wkt) {
        Ok(polygon) => RowOutcome::Parsed(ParsedRow {
            line: row.line,
            fields: row.fields,
            polygon,
        }),
        Err(e) => RowOutcome::Skipped(SkippedRow {
            line: row.line,
            reason: e.to_string(),
        }),
    }
}

/// Lazily reads delimited rows. The first row is kept aside as the header.
pub struct RowReader {
    header: Vec<String>,
    records: csv::StringRecordsIntoIter<File>,
}

pub fn read_rows(path: &Path, delimiter: u8) -> Result<RowReader> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::SourceNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    let mut records = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(file)
        .into_records();
    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => Vec::new(),
    };
    Ok(RowReader { header, records })
}

impl RowReader {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Decodes the polygon column of each row. Rows that are not valid UTF-8
    /// are reported as skipped instead of failing the pass.
    pub fn outcomes(self, column: usize) -> impl Iterator<Item = Result<RowOutcome>> {
        self.records.map(move |record| match record {
            Ok(record) => Ok(decode_row(to_row(&record), column)),
            Err(e) => {
                if let csv::ErrorKind::Utf8 { pos, err } = e.kind() {
                    return Ok(RowOutcome::Skipped(SkippedRow {
                        line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
                        reason: format!("invalid utf-8: {}", err),
                    }));
                }
                Err(Error::Csv(e))
            }
        })
    }
}

fn to_row(record: &csv::StringRecord) -> Row {
    Row {
        line: record.position().map(|p| p.line()).unwrap_or(0),
        fields: record.iter().map(str::to_string).collect(),
    }
}

impl Iterator for RowReader {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records
            .next()
            .map(|record| record.map(|r| to_row(&r)).map_err(Error::from))
    }
}

/// Streams rows into a staged file that replaces `path` on `finish`.
pub struct RowWriter {
    path: PathBuf,
    writer: csv::Writer<Staged>,
    rows: usize,
}

impl RowWriter {
    pub fn create(path: &Path, header: &[String], delimiter: u8) -> Result<RowWriter> {
        let staged = Staged::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(csv::Terminator::CRLF)
            .flexible(true)
            .from_writer(staged);
        // an empty source has no header row to copy
        if !header.is_empty() {
            writer.write_record(header)?;
        }
        Ok(RowWriter {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        })
    }

    pub fn write_row(&mut self, fields: &[String]) -> Result<()> {
        self.writer.write_record(fields)?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(self) -> Result<PathBuf> {
        let RowWriter { path, writer, .. } = self;
        let staged = writer
            .into_inner()
            .map_err(|e| Error::DestinationUnwritable {
                path,
                source: std::io::Error::new(e.error().kind(), e.error().to_string()),
            })?;
        staged.commit()
    }
}

pub fn write_rows<I>(path: &Path, header: &[String], rows: I, delimiter: u8) -> Result<usize>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = RowWriter::create(path, header, delimiter)?;
    for row in rows {
        writer.write_row(&row)?;
    }
    let count = writer.rows();
    writer.finish()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "POLYGON ((-45 -15, -44 -15, -44 -14, -45 -14, -45 -15))";

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reads_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, format!("a;b;c;wkt\n1;2;3;{}\n4;5;6;x\n", SQUARE)).unwrap();

        let reader = read_rows(&path, b';').unwrap();
        assert_eq!(reader.header(), strings(&["a", "b", "c", "wkt"]).as_slice());
        let rows: Vec<Row> = reader.map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].fields[3], SQUARE);
        assert_eq!(rows[1].fields, strings(&["4", "5", "6", "x"]));
    }

    #[test]
    fn test_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        assert!(matches!(read_rows(&path, b';'), Err(Error::SourceNotFound(p)) if p == path));
    }

    #[test]
    fn test_empty_file_has_empty_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();
        let mut reader = read_rows(&path, b';').unwrap();
        assert!(reader.header().is_empty());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_decode_row() {
        let parsed = decode_row(
            Row {
                line: 2,
                fields: strings(&["1", "2", "3", SQUARE]),
            },
            3,
        );
        assert!(matches!(parsed, RowOutcome::Parsed(ref p) if p.polygon.ring().len() == 5));

        let short = decode_row(
            Row {
                line: 3,
                fields: strings(&["1", "2"]),
            },
            3,
        );
        assert!(matches!(short, RowOutcome::Skipped(SkippedRow { line: 3, .. })));

        let garbage = decode_row(
            Row {
                line: 4,
                fields: strings(&["1", "2", "3", "NOT A POLYGON"]),
            },
            3,
        );
        assert!(matches!(garbage, RowOutcome::Skipped(SkippedRow { line: 4, .. })));
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        let mut bytes = b"a;b;c;wkt\n1;\xff\xfe;3;x\n".to_vec();
        bytes.extend_from_slice(format!("7;8;9;{}\n", SQUARE).as_bytes());
        std::fs::write(&path, bytes).unwrap();

        let outcomes: Vec<RowOutcome> = read_rows(&path, b';')
            .unwrap()
            .outcomes(3)
            .map(|o| o.unwrap())
            .collect();
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0], RowOutcome::Skipped(_)));
        assert!(matches!(outcomes[1], RowOutcome::Parsed(ref p) if p.line == 3));
    }

    #[test]
    fn test_write_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let header = strings(&["id", "name"]);
        let rows = vec![strings(&["1", "plain"]), strings(&["2", "with;semicolon"])];
        let n = write_rows(&path, &header, rows, b';').unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "id;name\r\n1;plain\r\n2;\"with;semicolon\"\r\n"
        );

        let back: Vec<Row> = read_rows(&path, b';').unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(back[1].fields, strings(&["2", "with;semicolon"]));
    }

    #[test]
    fn test_empty_header_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let n = write_rows(&path, &[], Vec::new(), b';').unwrap();
        assert_eq!(n, 0);
        assert!(std::fs::read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_destination_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let header = strings(&["id"]);
        assert!(matches!(
            write_rows(&path, &header, Vec::new(), b';'),
            Err(Error::DestinationUnwritable { .. })
        ));
    }
}
