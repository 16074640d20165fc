use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDateTime, TimeDelta, Timelike, Utc};
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod atmosphere;
mod bulletin;
mod config;
mod dataset;
mod error;
mod layers;
mod models;
mod pipeline;
mod profile;
mod wind;

use config::BulletinConfig;
use models::BatchHeader;

#[derive(Parser)]
#[command(name = "bwr")]
#[command(about = "Basic wind report generator for layered tactical wind bulletins", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// JSON file overriding the default levels, layers, and header lines
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate bulletins for every area valid at the forecast end time
    Generate {
        /// Wind dataset CSV (metadata row, header row, data rows)
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "dane/bwr.txt")]
        out: PathBuf,
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        header: HeaderArgs,
    },
    /// Preview the header block shared by every bulletin
    Header {
        #[arg(long, default_value = "-")]
        area: String,
        #[command(flatten)]
        header: HeaderArgs,
    },
    /// Show configured pressure levels and layer target heights
    Levels,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("tag")
        .args(["exercise", "character"])
        .multiple(false)
))]
struct HeaderArgs {
    /// Full exercise/classification line, e.g. EXER/TESTCOAS/-
    #[arg(long)]
    exercise: Option<String>,
    /// Message character (OPER or EXER), combined with --name
    #[arg(long, requires = "name")]
    character: Option<String>,
    /// Message name, combined with --character
    #[arg(long, requires = "character")]
    name: Option<String>,
    /// Creation time (UTC); defaults to now
    #[arg(long, value_parser = parse_timestamp)]
    created: Option<NaiveDateTime>,
    /// Model run start (UTC)
    #[arg(long, value_parser = parse_timestamp)]
    model_start: NaiveDateTime,
    /// Forecast start (UTC)
    #[arg(long, value_parser = parse_timestamp)]
    forecast_start: NaiveDateTime,
    /// Forecast end (UTC), the valid time matched against the dataset;
    /// defaults to forecast start plus the configured horizon
    #[arg(long, value_parser = parse_timestamp)]
    forecast_end: Option<NaiveDateTime>,
}

impl HeaderArgs {
    fn into_batch_header(self, config: &BulletinConfig) -> anyhow::Result<BatchHeader> {
        let exercise_tag = match (self.exercise, self.character, self.name) {
            (Some(tag), _, _) => tag,
            (None, Some(character), Some(name)) => {
                format!("{}/{}/-", character.trim().to_uppercase(), name.trim().to_uppercase())
            }
            _ => "EXER/TESTCOAS/-".to_string(),
        };
        let created_at = self.created.unwrap_or_else(now_to_minute);
        let forecast_end = match self.forecast_end {
            Some(end) => end,
            None => default_forecast_end(self.forecast_start, config.horizon_hours)?,
        };

        Ok(BatchHeader {
            exercise_tag,
            created_at,
            model_start: self.model_start,
            forecast_start: self.forecast_start,
            forecast_end,
        })
    }
}

fn default_forecast_end(forecast_start: NaiveDateTime, horizon_hours: i64) -> anyhow::Result<NaiveDateTime> {
    TimeDelta::try_hours(horizon_hours)
        .and_then(|horizon| forecast_start.checked_add_signed(horizon))
        .with_context(|| format!("forecast start {forecast_start} plus {horizon_hours} h is out of range"))
}

fn now_to_minute() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(now)
}

/// Accepts `2025-04-16T06:00`, `2025-04-16 06:00:00`, `2025-04-16T06`, with
/// an optional trailing `Z`.
fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    let trimmed = value.trim().trim_end_matches('Z');
    let formats = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in formats {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    NaiveDateTime::parse_from_str(&format!("{trimmed}:00"), "%Y-%m-%dT%H:%M")
        .map_err(|_| format!("invalid timestamp '{value}', expected YYYY-MM-DDTHH:MM"))
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let config = match &cli.config {
        Some(path) => BulletinConfig::from_json_file(path)?,
        None => BulletinConfig::default(),
    };

    match cli.command {
        Commands::Generate {
            input,
            out,
            json,
            header,
        } => {
            let header = header.into_batch_header(&config)?;
            let summary = pipeline::run(&config, &input, &out, header)
                .with_context(|| format!("failed to generate bulletins from {}", input.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Generated {} BWR bulletins from {} rows ({} skipped) into {}.",
                    summary.bulletins,
                    summary.rows_scanned,
                    summary.skipped,
                    out.display()
                );
            }
        }
        Commands::Header { area, header } => {
            let header = header.into_batch_header(&config)?;
            print!("{}", bulletin::render_header(&header, &config.header, &area));
        }
        Commands::Levels => {
            config.validate().context("invalid bulletin configuration")?;
            println!("Pressure levels:");
            for level in &config.levels_hpa {
                println!(
                    "- {:>4} hPa  {:>8.0} m",
                    level,
                    atmosphere::pressure_to_height(f64::from(*level))
                );
            }
            println!("Layers:");
            for top in config.sorted_layer_tops() {
                println!("- {:02} km  sampled at {:>6.0} m", top, layers::target_height_m(top));
            }
        }
    }

    Ok(())
}
