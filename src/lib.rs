use std::path::PathBuf;

pub mod color;
pub mod config;
pub mod coords;
pub mod filter;
pub mod generate;
pub mod output;
pub mod point;
pub mod polygon;
pub mod projection;
pub mod proximity;
pub mod read_kml;
pub mod read_wkt;
pub mod records;
pub mod write_kml;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("destination unwritable: {}: {source}", .path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("geometry parse error: {0}")]
    GeometryParse(String),

    #[error("invalid numeric input: {0}")]
    InvalidNumericInput(String),

    #[error("invalid color: {0}")]
    InvalidColorInput(String),

    #[error("invalid directory: {}", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("invalid url, no coordinates found: {0}")]
    InvalidUrl(String),

    #[error("projection error: {0}")]
    Projection(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("kml error: {0}")]
    Kml(#[from] kml::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
