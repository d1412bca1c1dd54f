#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the window evaluation pipeline.
//!
//! Reference catalogs (stations, zone polygons, infiltration table,
//! window products, utility rates) are plain files in a data directory;
//! everything is loaded at startup and the requested subcommand runs
//! against the in-memory catalogs. Only `evaluate` and `site` touch the
//! network (one Nominatim request each).

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use window_scout_climate::{EnergyStarZones, ZoneIndex};
use window_scout_geocoder::GeocoderConfig;
use window_scout_infiltration::InfiltrationTable;
use window_scout_pipeline::{
    EvaluationRequest, ReferenceData, TablePredictor, evaluate, resolve_site,
};
use window_scout_rates::UtilityRates;
use window_scout_weather::StationCatalog;
use window_scout_windows::{WindowCandidate, WindowCatalog};

#[derive(Parser)]
#[command(name = "window-scout", about = "Residential window selection tool")]
struct Cli {
    /// Directory holding the reference catalogs.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Geocoder configuration TOML. Defaults to the public Nominatim
    /// instance when absent.
    #[arg(long)]
    geocoder_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every catalog window for a request and print the ranked
    /// result table
    Evaluate {
        /// Request TOML (postal code, building, bills, baseline)
        request: PathBuf,
        /// Precomputed load predictions CSV (`window_type`,
        /// `cooling_load`, `heating_load`, `cooling_window`,
        /// `heating_window`)
        #[arg(long)]
        predictions: PathBuf,
        /// Emit the full outcome as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Resolve a postal code to its site context (station, climate
    /// zone, season split)
    Site {
        /// Postal code to resolve
        postal_code: String,
        /// Emit the context as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Look up electricity and heating fuel rates for a ZIP code
    Rates {
        /// ZIP code to look up
        zip_code: String,
        /// Heating fuel name (e.g. "natural gas")
        #[arg(long, default_value = "natural gas")]
        fuel: String,
    },
    /// List the window product catalog in display order
    Windows,
}

/// A request file: the evaluation request plus optional session-local
/// window products appended to the default catalog.
#[derive(Debug, Deserialize)]
struct RequestFile {
    #[serde(flatten)]
    request: EvaluationRequest,
    #[serde(default)]
    custom_windows: Vec<WindowCandidate>,
}

fn load_reference(data_dir: &Path) -> Result<ReferenceData, Box<dyn std::error::Error>> {
    let start = Instant::now();

    let stations = StationCatalog::from_csv(File::open(data_dir.join("weather_stations.csv"))?)?;
    let zones =
        ZoneIndex::from_geojson(&std::fs::read_to_string(data_dir.join("climate_zones.geojson"))?)?;
    let infiltration = InfiltrationTable::from_csv(File::open(data_dir.join("infiltration.csv"))?)?;
    let energy_star =
        EnergyStarZones::from_csv(File::open(data_dir.join("energy_star_zones.csv"))?)?;
    let windows = WindowCatalog::from_csv(File::open(data_dir.join("windows.csv"))?)?;

    log::info!(
        "Loaded reference catalogs from {} in {:.2}s",
        data_dir.display(),
        start.elapsed().as_secs_f64()
    );

    Ok(ReferenceData {
        stations,
        zones,
        infiltration,
        energy_star,
        windows,
    })
}

fn load_geocoder_config(
    path: Option<&Path>,
) -> Result<GeocoderConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(GeocoderConfig::from_toml(&std::fs::read_to_string(path)?)?),
        None => Ok(GeocoderConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            request,
            predictions,
            json,
        } => {
            let mut reference = load_reference(&cli.data_dir)?;
            let file: RequestFile = toml::de::from_str(&std::fs::read_to_string(request)?)?;
            for window in file.custom_windows {
                log::info!("Adding custom window '{}'", window.name);
                reference.windows.add_custom(window);
            }

            let predictor = TablePredictor::from_csv(File::open(predictions)?)?;

            let config = load_geocoder_config(cli.geocoder_config.as_deref())?;
            let client = config.http_client()?;

            let outcome = evaluate(&client, &config, &reference, &file.request, &predictor).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }

            println!(
                "Site: zone {} ({}), station '{}' at {:.1} km",
                outcome.site.zone.iecc_code,
                outcome.site.zone.ba_zone,
                outcome.site.station.name,
                outcome.site.station_distance_km
            );
            println!(
                "Geometry: {:.0} sq ft of window, S/V {:.3}, infiltration option {} ({:.2} ACH50)",
                outcome.window_area,
                outcome.surface_to_volume,
                outcome.infiltration.index,
                outcome.infiltration.ach50
            );
            println!();
            println!(
                "{:<32} {:>10} {:>12} {:>14}",
                "WINDOW", "$/MONTH", "$/LIFETIME", "SAVINGS ($)"
            );
            println!("{}", "-".repeat(72));
            for result in &outcome.results {
                println!(
                    "{:<32} {:>10.2} {:>12.2} {:>14.2}",
                    result.name,
                    result.monthly_total_cost,
                    result.lifetime_total_cost,
                    result.lifetime_savings
                );
            }
            if !outcome.recommended.is_empty() {
                println!();
                println!(
                    "ENERGY STAR ({}): {}",
                    outcome.site.energy_star_zone.as_deref().unwrap_or(""),
                    outcome.recommended.join(", ")
                );
            }
        }
        Commands::Site { postal_code, json } => {
            let reference = load_reference(&cli.data_dir)?;
            let config = load_geocoder_config(cli.geocoder_config.as_deref())?;
            let client = config.http_client()?;

            let site = resolve_site(&client, &config, &reference, &postal_code).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&site)?);
                return Ok(());
            }

            println!("Postal code:  {}", site.postal_code);
            println!(
                "Coordinates:  {:.5}, {:.5}",
                site.coordinates.latitude, site.coordinates.longitude
            );
            println!(
                "Station:      {} ({:.1} km)",
                site.station.name, site.station_distance_km
            );
            println!(
                "Climate zone: {} ({})",
                site.zone.iecc_code, site.zone.ba_zone
            );
            println!(
                "Seasons:      {:.1} heating months, {:.1} cooling months",
                site.heating_period_months, site.cooling_period_months
            );
            if let Some(zone) = &site.energy_star_zone {
                println!("ENERGY STAR:  {zone}");
            }
        }
        Commands::Rates { zip_code, fuel } => {
            let rates = UtilityRates::from_csv(
                File::open(cli.data_dir.join("zip_state.csv"))?,
                File::open(cli.data_dir.join("utility_rates.csv"))?,
            )?;
            let state = rates.state_for_zip(&zip_code)?;
            let fuel_rates = rates.rates(&zip_code, &fuel)?;
            println!("State:        {state}");
            println!("Electricity:  ${:.2}/MMBtu", fuel_rates.electricity_rate);
            println!(
                "{:<13} ${:.2}/MMBtu",
                format!("{}:", title(&fuel)),
                fuel_rates.heating_fuel_rate
            );
        }
        Commands::Windows => {
            let reference = load_reference(&cli.data_dir)?;
            println!("{:<36} {:>8} {:>6}", "WINDOW", "U-FACTOR", "SHGC");
            println!("{}", "-".repeat(52));
            for window in reference.windows.sorted() {
                println!(
                    "{:<36} {:>8.2} {:>6.2}",
                    window.name, window.u_factor, window.shgc
                );
            }
        }
    }

    Ok(())
}

/// Capitalizes the first character for display.
fn title(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
