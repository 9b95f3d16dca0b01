use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "station-obs")]
#[command(about = "Meteorological station observation entry and derived-value lookups")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Settings file [default: station-obs.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up dew point and relative humidity for a dry/wet-bulb pair
    Humidity {
        #[arg(short, long, allow_hyphen_values = true, help = "Dry-bulb reading (°C)")]
        dry_bulb: f64,

        #[arg(short, long, allow_hyphen_values = true, help = "Wet-bulb reading (°C)")]
        wet_bulb: f64,
    },

    /// Derive station level and sea-level pressure from a barometer reading
    Pressure {
        #[arg(short, long, allow_hyphen_values = true, help = "Dry-bulb reading (°C)")]
        dry_bulb: f64,

        #[arg(short, long, help = "Barometer as read (hPa)")]
        bar_as_read: f64,
    },

    /// Derive humidity and pressure values for every row of an observation CSV
    Derive {
        #[arg(short, long, help = "Observation CSV file")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output CSV path [default: {input}-derived.csv next to the input]"
        )]
        output: Option<PathBuf>,

        #[arg(short, long, default_value = "false", help = "Hide the progress spinner")]
        quiet: bool,
    },

    /// Show the coverage of the loaded reference tables
    Tables,

    /// Recalculate and submit a first card draft (JSON)
    SubmitFirstCard {
        #[arg(short, long, help = "First card draft JSON file")]
        draft: PathBuf,

        #[arg(long, default_value = "false", help = "Print the payload without posting it")]
        dry_run: bool,
    },

    /// Submit a daily summary draft (JSON)
    SubmitDailySummary {
        #[arg(short, long, help = "Daily summary draft JSON file")]
        draft: PathBuf,

        #[arg(long, default_value = "false", help = "Print the payload without posting it")]
        dry_run: bool,
    },
}
