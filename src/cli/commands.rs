use crate::analyzers::{GazetteerGeocoder, ViewRequest};
use crate::cli::args::{Cli, Commands, ViewArgs};
use crate::error::Result;
use crate::models::{Selection, YearRange};
use crate::pipeline::DashboardContext;
use crate::utils::filename::{generate_default_cleaned_filename, OutputFormat};
use crate::utils::progress::ProgressReporter;
use crate::utils::Settings;
use crate::writers::{CsvWriter, MapCache, MapOutcome, MapWriter, ParquetWriter};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber; `RUST_LOG` wins over `--verbose`
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed (e.g. by tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Clean {
            input,
            output_file,
            compression,
        } => {
            let output_file = output_file.unwrap_or_else(generate_default_cleaned_filename);
            println!("Cleaning air-quality data...");
            println!("Input: {}", input.display());
            println!("Output file: {}", output_file.display());

            let context = load_context(settings, &input, "Reading observations...")?;
            println!("\n{}", context.integrity_summary());

            // Create output directory if it doesn't exist
            if let Some(parent) = output_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            match OutputFormat::from_path(&output_file) {
                OutputFormat::Parquet => {
                    let writer = ParquetWriter::new().with_compression(&compression)?;
                    writer.write_dataset(&context.dataset, &output_file)?;
                    let file_info = writer.get_file_info(&output_file)?;
                    println!("\n{}", file_info.summary());
                }
                OutputFormat::Csv => {
                    CsvWriter::new()
                        .with_delimiter(context.settings.delimiter_byte())
                        .write_dataset(&context.dataset, &output_file)?;
                }
            }

            println!(
                "Wrote {} records to {}",
                context.dataset.len(),
                output_file.display()
            );
        }

        Commands::Validate { input } => {
            println!("Validating air-quality data...");
            println!("Input: {}", input.display());

            let context = load_context(settings, &input, "Validating data...")?;
            println!("\n{}", context.integrity_summary());

            if context.integrity.is_complete() {
                println!("✅ Every station has a value in every column after cleaning");
            } else {
                println!(
                    "⚠️  {} station columns have no values to interpolate from",
                    context.integrity.unresolved.len()
                );
            }
            println!("Validation complete - no output file written");
        }

        Commands::Report { input, view, json } => {
            let request = view_request(&settings, &view);
            let context = load_context(settings, &input, "Preparing views...")?;

            let views = context.views(&request)?;
            println!("\n{}", views.summary());

            if let Some(path) = json {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let file = std::fs::File::create(&path)?;
                serde_json::to_writer_pretty(file, &views)?;
                info!(path = %path.display(), "Exported views as JSON");
                println!("Views exported to {}", path.display());
            }
        }

        Commands::Map {
            input,
            gazetteer,
            output_file,
            refresh,
            view,
        } => {
            let request = view_request(&settings, &view);
            let cache = MapCache::new(
                output_file.unwrap_or_else(|| settings.map_cache_path.clone()),
            );

            if refresh && cache.invalidate().await? {
                println!("Removed cached map {}", cache.path().display());
            }

            let context = load_context(settings, &input, "Preparing map...")?;
            let geocoder = GazetteerGeocoder::from_file(&gazetteer)?;
            if geocoder.is_empty() {
                warn!(path = %gazetteer.display(), "Gazetteer has no entries");
            }

            let geo = match context.geo_view(&request, &geocoder)? {
                Selection::Available(geo) => geo,
                Selection::Empty(range) => {
                    println!("{}", Selection::<()>::no_data_message(range));
                    return Ok(());
                }
            };

            println!("{}", geo.heading);
            match cache.get_or_render(&geo, &MapWriter::new()).await? {
                MapOutcome::Cached(_) => {
                    println!("Using cached map {}", cache.path().display());
                }
                MapOutcome::Rendered(_) => {
                    println!(
                        "Wrote map with {} stations to {}",
                        geo.points.len(),
                        cache.path().display()
                    );
                }
                MapOutcome::NoData => {
                    println!("{}", Selection::<()>::no_data_message(request.range));
                }
            }
        }
    }

    Ok(())
}

fn load_context(settings: Settings, input: &Path, message: &str) -> Result<DashboardContext> {
    let progress = ProgressReporter::new_spinner(message, false);
    let context = DashboardContext::load(settings, input, Some(&progress))?;
    progress.finish_with_message(&format!("Processed {} records", context.dataset.len()));
    Ok(context)
}

/// Fill unset view arguments from settings.
/// The rain trend only narrows when a year is given explicitly.
pub fn view_request(settings: &Settings, view: &ViewArgs) -> ViewRequest {
    let start = view.start_year.unwrap_or(settings.default_year);
    let end = view.end_year.unwrap_or(start);
    let range = YearRange::new(start, end);
    let pollutant = view
        .pollutant
        .clone()
        .unwrap_or_else(|| settings.default_pollutant.clone());

    let request = ViewRequest::new(range, pollutant);
    if view.start_year.is_some() || view.end_year.is_some() {
        request.with_trend_range(range)
    } else {
        request
    }
}
