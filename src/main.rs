use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gleba_filter::color::AbgrColor;
use gleba_filter::config::AppConfig;
use gleba_filter::filter::{self, FilterRequest};
use gleba_filter::generate::{self, CombinedKmlRequest, KmlFilesRequest};
use gleba_filter::point::WGS84Point;
use gleba_filter::projection::UtmProjection;
use gleba_filter::{Error, coords, read_kml};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Select land parcels near a point and export them as KML")]
struct Cli {
    /// TOML configuration, defaults apply when omitted
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Keep the rows whose polygon lies within a radius of a point
    Filter {
        /// Map URL containing `@lat,lon`
        #[arg(long, conflicts_with_all = ["lat", "lon"], required_unless_present_all = ["lat", "lon"])]
        url: Option<String>,
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<String>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<String>,
        /// Radius in meters
        #[arg(long)]
        radius: String,
        /// Year of the input file, e.g. 2024
        #[arg(long)]
        year: String,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Write one KML file per polygon, labeled with its area
    Kml {
        #[arg(short, long, value_name = "CSV")]
        input: PathBuf,
        /// Fill color as #RRGGBB
        #[arg(long, default_value = "")]
        color: String,
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Write every polygon into one KML document
    Combined {
        #[arg(short, long, value_name = "CSV")]
        input: PathBuf,
        /// Fill color as #RRGGBB
        #[arg(long, default_value = "")]
        color: String,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// List the polygon placemarks of a KML file with their areas
    Inspect { path: PathBuf },
}

fn center(url: Option<String>, lat: Option<String>, lon: Option<String>) -> Result<WGS84Point> {
    match (url, lat, lon) {
        (Some(url), _, _) => Ok(coords::extract_coords_from_url(&url)?),
        (None, Some(lat), Some(lon)) => Ok(WGS84Point::new(
            coords::parse_degrees(&lon, "longitude")?,
            coords::parse_degrees(&lat, "latitude")?,
        )),
        _ => Err(Error::InvalidUrl("no center given".to_string()).into()),
    }
}

fn require_source(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::SourceNotFound(path.to_path_buf()).into());
    }
    Ok(())
}

fn inspect(path: &Path, config: &AppConfig) -> Result<()> {
    let projection = UtmProjection::new(config.projection)?;
    let placemarks = read_kml::read_placemarks(path)
        .with_context(|| format!("Failed to read KML file: {}", path.display()))?;
    for p in &placemarks {
        let projected = projection.project_polygon(&p.polygon)?.hectares();
        let geodesic = p.polygon.geodesic_hectares();
        println!(
            "{}: {:.2} ha (EPSG:{}), {:.2} ha (geodesic)",
            p.name,
            projected,
            config.projection.epsg(),
            geodesic
        );
    }
    println!("{} polygon placemarks", placemarks.len());
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AppConfig::default(),
    };
    config
        .ensure_directories()
        .context("Failed to create working directories")?;

    match cli.command {
        Commands::Filter {
            url,
            lat,
            lon,
            radius,
            year,
            output,
        } => {
            let request = FilterRequest {
                center: center(url, lat, lon)?,
                radius_meters: coords::parse_radius(&radius)?,
                source: config.input_file(&year),
                destination: output.unwrap_or_else(|| config.default_filtered_file()),
            };
            let summary = filter::filter_records(&request, &config.records)?;
            println!(
                "Filtered records saved to: {} ({} of {} rows, {} skipped)",
                summary.destination.display(),
                summary.written,
                summary.scanned,
                summary.skipped
            );
        }
        Commands::Kml { input, color, dir } => {
            require_source(&input)?;
            let request = KmlFilesRequest {
                source: input,
                fill: AbgrColor::from_rgb_hex(&color)?,
                target_directory: dir.unwrap_or_else(|| config.paths.kml_dir.clone()),
            };
            let written = generate::generate_kml_files(&request, &config)?;
            println!(
                "{} KML files written to {}",
                written.len(),
                request.target_directory.display()
            );
        }
        Commands::Combined {
            input,
            color,
            output,
        } => {
            require_source(&input)?;
            let request = CombinedKmlRequest {
                source: input,
                fill: AbgrColor::from_rgb_hex(&color)?,
                destination: output.unwrap_or_else(|| config.default_combined_file()),
            };
            let summary = generate::generate_combined_kml(&request, &config)?;
            println!(
                "Combined KML saved to: {} ({} placemarks)",
                summary.destination.display(),
                summary.placemarks
            );
        }
        Commands::Inspect { path } => inspect(&path, &config)?,
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
