use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::projection::UtmZone;
use crate::{Error, Result};

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub records: RecordsConfig,
    pub projection: UtmZone,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub filtered_dir: PathBuf,
    pub kml_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            input_dir: PathBuf::from("input"),
            filtered_dir: PathBuf::from("filtered"),
            kml_dir: PathBuf::from("kml"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RecordsConfig {
    pub delimiter: char,
    /// 0-based index of the WKT column.
    pub wkt_column: usize,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        RecordsConfig {
            delimiter: ';',
            wkt_column: 3,
        }
    }
}

impl RecordsConfig {
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "delimiter must be a single ascii character, got {:?}",
                    self.delimiter
                ))
            })
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::SourceNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [
            &self.paths.input_dir,
            &self.paths.filtered_dir,
            &self.paths.kml_dir,
        ] {
            if !dir.exists() {
                log::info!("creating directory {}", dir.display());
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    pub fn input_file(&self, year: &str) -> PathBuf {
        self.paths
            .input_dir
            .join(format!("sicor_glebas_wkt_{}.csv", year.trim()))
    }

    pub fn default_filtered_file(&self) -> PathBuf {
        self.paths.filtered_dir.join("sicor_glebas_wkt_filtered.csv")
    }

    pub fn default_combined_file(&self) -> PathBuf {
        self.paths.kml_dir.join("combined_polygons.kml")
    }
}
