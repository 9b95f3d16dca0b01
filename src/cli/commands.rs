use anyhow::{anyhow, bail, Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::models::{DailySummaryDraft, FirstCardDraft, Notice, SummaryTab};
use crate::processors::{BatchDeriver, DailySummarySession, DerivedValueResolver, FirstCardSession};
use crate::readers::{ObservationReader, ReferenceTables};
use crate::utils::constants::DAILY_NETWORK_ERROR_MESSAGE;
use crate::utils::filename::derived_filename_for;
use crate::utils::progress::ProgressReporter;
use crate::writers::{DerivedWriter, SubmissionClient};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    match cli.command {
        Commands::Humidity { dry_bulb, wet_bulb } => {
            let resolver = load_resolver(&settings)?;
            let reading = resolver.resolve_humidity(Some(dry_bulb), Some(wet_bulb))?;

            println!("Dry-bulb: {} °C (table row {})", dry_bulb, reading.dry_bulb_key);
            println!("Wet-bulb: {} °C", wet_bulb);
            println!("Difference: {:.1} °C", reading.difference);
            println!("Dew point: {} °C", reading.dew_point);
            println!("Relative humidity: {} %", reading.relative_humidity);
        }

        Commands::Pressure {
            dry_bulb,
            bar_as_read,
        } => {
            let resolver = load_resolver(&settings)?;
            let pressure = resolver.resolve_pressure(Some(dry_bulb), Some(bar_as_read))?;

            println!("Bar as read: {:.2} hPa at {} °C", bar_as_read, dry_bulb);
            println!(
                "Height difference correction: {:.2} hPa (level {})",
                pressure.height_difference_correction, pressure.correction_level
            );
            println!(
                "Station level pressure: {:.2} hPa",
                pressure.station_level_pressure
            );
            println!(
                "Sea level reduction constant: {:.2} hPa (level {})",
                pressure.sea_level_reduction_constant, pressure.reduction_level
            );
            println!("Sea level pressure: {:.2} hPa", pressure.sea_level_pressure);
        }

        Commands::Derive {
            input,
            output,
            quiet,
        } => {
            let output = output.unwrap_or_else(|| derived_filename_for(&input));
            if !quiet {
                println!("Deriving observation values...");
                println!("Input file: {}", input.display());
                println!("Output file: {}", output.display());
            }

            let resolver = load_resolver(&settings)?;
            let rows = ObservationReader::new()
                .read_observations(&input)
                .with_context(|| format!("Failed to read observations from {}", input.display()))?;

            let progress = ProgressReporter::new_spinner("Deriving rows...", quiet);
            let (records, summary) = BatchDeriver::new(resolver).derive_all(&rows, Some(&progress));

            let writer = DerivedWriter::new();
            writer
                .write_records(&records, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            if !quiet {
                println!("\n{}", summary.summary());
                let file_info = writer.get_file_info(&records, &output)?;
                println!("\n{}", file_info.summary());
                println!("Derivation complete!");
            }
        }

        Commands::Tables => {
            let tables = ReferenceTables::load(&settings.tables)
                .context("Failed to load reference tables")?;
            println!("{}", tables.summary());
        }

        Commands::SubmitFirstCard { draft, dry_run } => {
            let draft: FirstCardDraft = read_json(&draft)?;
            let mut session = FirstCardSession::with_draft(load_resolver(&settings)?, draft);
            print_notices(session.take_notices());

            let payload = session.begin_submit()?;
            if dry_run {
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            println!("Submitting first card to {}...", settings.submission.base_url);
            let client = SubmissionClient::new(&settings.submission)?;
            let outcome = client.submit_first_card(&payload).await;
            session.finish_submit(&outcome)?;
            print_notices(session.take_notices());

            if let Some(message) = outcome.failure_message() {
                bail!("First card was not saved: {}", message);
            }
        }

        Commands::SubmitDailySummary { draft, dry_run } => {
            let draft: DailySummaryDraft = read_json(&draft)?;
            let mut session = DailySummarySession::with_draft(draft);
            session.select_tab(SummaryTab::WindDirection);

            let payload = match session.begin_submit() {
                Ok(payload) => payload,
                Err(e) => {
                    print_notices(session.take_notices());
                    return Err(e.into());
                }
            };
            if dry_run {
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            println!(
                "Submitting daily summary to {}...",
                settings.submission.base_url
            );
            let client = SubmissionClient::new(&settings.submission)?;
            let outcome = client.submit_daily_summary(&payload).await;
            session.finish_submit(&outcome)?;
            print_notices(session.take_notices());

            if let Some(message) = outcome.failure_message_or(DAILY_NETWORK_ERROR_MESSAGE) {
                bail!("Daily summary was not saved: {}", message);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to install logger: {}", e))
}

fn load_resolver(settings: &Settings) -> Result<DerivedValueResolver> {
    let tables =
        ReferenceTables::load(&settings.tables).context("Failed to load reference tables")?;
    Ok(DerivedValueResolver::new(&tables))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("Invalid draft in {}", path.display()))
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        println!("{}", notice);
    }
}
