use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "airquality-processor")]
#[command(about = "Air-quality station data cleaning, aggregation and dashboard views")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        help = "Settings file [default: airquality.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

/// Year range and pollutant shared by the view commands
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    #[arg(long, help = "First year of the range [default: settings default_year]")]
    pub start_year: Option<i32>,

    #[arg(long, help = "Last year of the range [default: start year]")]
    pub end_year: Option<i32>,

    #[arg(short, long, help = "Pollutant column [default: settings default_pollutant]")]
    pub pollutant: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest, clean and write the dataset
    Clean {
        #[arg(short, long, help = "Input CSV file, directory of CSV files, or zip archive")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output .csv or .parquet file [default: output/cleaned-air-quality-{YYMMDD}.csv]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy", help = "Parquet compression")]
        compression: String,
    },

    /// Report missing values before and after cleaning without writing output
    Validate {
        #[arg(short, long, help = "Input CSV file, directory of CSV files, or zip archive")]
        input: PathBuf,
    },

    /// Print every dashboard view
    Report {
        #[arg(short, long, help = "Input CSV file, directory of CSV files, or zip archive")]
        input: PathBuf,

        #[command(flatten)]
        view: ViewArgs,

        #[arg(long, help = "Also export the views as JSON")]
        json: Option<PathBuf>,
    },

    /// Produce the cached pollution map document
    Map {
        #[arg(short, long, help = "Input CSV file, directory of CSV files, or zip archive")]
        input: PathBuf,

        #[arg(short, long, help = "Gazetteer CSV: station,latitude,longitude")]
        gazetteer: PathBuf,

        #[arg(short, long, help = "Map file [default: settings map_cache_path]")]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Discard the cached map and render again")]
        refresh: bool,

        #[command(flatten)]
        view: ViewArgs,
    },
}
