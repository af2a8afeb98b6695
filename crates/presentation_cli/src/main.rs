//! Paradecast CLI
//!
//! Checks whether the weather at a place on a date is likely to spoil an
//! outdoor event.

#![allow(clippy::print_stdout)]

mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use application::{
    AnalysisFlow, AnalysisService, AnalysisState, ApplicationError, FailureKind, HealthService,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use domain::{DailyWeather, DomainError, classify};
use infrastructure::{AppConfig, OpenMeteoAdapter, init_telemetry};
use tracing::{info, warn};

use crate::render::{CheckOutput, ClassifyOutput};

/// Paradecast CLI
#[derive(Parser)]
#[command(name = "paradecast")]
#[command(author, version, about = "Weather advisories for outdoor events", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a config file (default: ./paradecast.toml if present)
    #[arg(short, long, global = true, env = "PARADECAST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the forecast for a place and date
    ///
    /// Example: paradecast check "New York" 2026-10-20
    Check {
        /// Place name to geocode
        location: String,

        /// Event date: YYYY-MM-DD, "today" or "tomorrow"
        date: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Classify daily aggregates without calling any service
    ///
    /// Example: paradecast classify --temp-max 36 --temp-min -2 --precipitation 0 --wind 5 --humidity 40
    Classify {
        /// Maximum temperature in Celsius
        #[arg(long, allow_negative_numbers = true)]
        temp_max: f64,

        /// Minimum temperature in Celsius
        #[arg(long, allow_negative_numbers = true)]
        temp_min: f64,

        /// Precipitation sum in mm
        #[arg(long)]
        precipitation: f64,

        /// Maximum wind speed in km/h
        #[arg(long)]
        wind: f64,

        /// Mean relative humidity in percent
        #[arg(long)]
        humidity: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check the geocoding and forecast services
    Health {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Parse the event date argument
///
/// Blank input yields `Ok(None)` so the analysis reports it as missing.
fn parse_date(input: &str, today: NaiveDate) -> Result<Option<NaiveDate>, DomainError> {
    let input = input.trim();
    match input.to_lowercase().as_str() {
        "" => Ok(None),
        "today" => Ok(Some(today)),
        "tomorrow" => Ok(today.succ_opt()),
        _ => NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| {
                warn!(input, error = %e, "Unparseable date");
                DomainError::InvalidDateTime(input.to_string())
            }),
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if cli.verbose > 0 {
        config.telemetry.log_filter = log_filter_from_verbosity(cli.verbose).to_string();
    }
    init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Check {
            location,
            date,
            format,
        } => check(&config, &location, &date, format).await,

        Commands::Classify {
            temp_max,
            temp_min,
            precipitation,
            wind,
            humidity,
            format,
        } => {
            let weather = DailyWeather {
                temp_max,
                temp_min,
                precipitation_sum: precipitation,
                wind_speed_max: wind,
                humidity_mean: humidity,
            };
            let classification = classify(&weather);

            match format {
                OutputFormat::Text => {
                    print!("{}", render::metrics(&weather));
                    println!();
                    print!("{}", render::advisories(&classification.advisories));
                },
                OutputFormat::Json => print_json(&ClassifyOutput {
                    weather: &weather,
                    classification: &classification,
                })?,
            }
            Ok(ExitCode::SUCCESS)
        },

        Commands::Health { format } => {
            let adapter = Arc::new(OpenMeteoAdapter::with_config(config.weather.clone())?);
            let report = HealthService::new(adapter.clone(), adapter)
                .with_timeout(config.analysis.call_timeout())
                .check_all()
                .await;

            match format {
                OutputFormat::Text => print!("{}", render::health(&report)),
                OutputFormat::Json => print_json(&report)?,
            }

            Ok(if report.healthy {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        },

        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        },
    }
}

async fn check(
    config: &AppConfig,
    location: &str,
    date: &str,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let today = Local::now().date_naive();
    let date = match parse_date(date, today) {
        Ok(date) => date,
        Err(e) => return report_failure(ApplicationError::from(e).failure_kind(), format),
    };

    let adapter = Arc::new(OpenMeteoAdapter::with_config(config.weather.clone())?);
    let service =
        AnalysisService::new(adapter.clone(), adapter).with_config(config.analysis.clone());

    let flow = service
        .analyze_on(AnalysisFlow::new(), location, date, today)
        .await;

    match flow.state() {
        AnalysisState::Done { result } => {
            match format {
                OutputFormat::Text => print!("{}", render::report(result)),
                OutputFormat::Json => print_json(&CheckOutput::Ok { result })?,
            }
            Ok(ExitCode::SUCCESS)
        },
        AnalysisState::Failed { kind, .. } => report_failure(*kind, format),
        state => anyhow::bail!("analysis stopped in unexpected state: {state:?}"),
    }
}

fn report_failure(kind: FailureKind, format: OutputFormat) -> anyhow::Result<ExitCode> {
    info!(?kind, "Check failed");
    let message = kind.user_message();
    match format {
        OutputFormat::Text => println!("❌ {message}"),
        OutputFormat::Json => print_json(&CheckOutput::Error { kind, message })?,
    }
    Ok(ExitCode::FAILURE)
}
