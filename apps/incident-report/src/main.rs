//! # incident-report
//!
//! Turns Remedy incident extracts into a cleaned workbook, a snapshot of the
//! derived tables and the QPPO2 trend chart.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use incident_report::cli::{cmd_chart, cmd_extract, cmd_status, load_config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "incident-report")]
#[command(about = "Remedy incident extract report and QPPO2 chart generator")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Results root; each run writes into <out-dir>/<as-of>/
    #[arg(short, long, global = true, default_value = "results")]
    out_dir: PathBuf,

    /// Report date (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clean Remedy extracts and write the workbook and snapshot
    Extract {
        /// Remedy CSV extracts, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Also render the QPPO2 chart
        #[arg(long)]
        chart: bool,
    },

    /// Render the QPPO2 trend chart from the day's snapshot
    Chart,

    /// Show counts from the day's snapshot
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let as_of = cli
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Extract { files, chart } => {
            cmd_extract(&files, &cli.out_dir, as_of, &config)?;
            if chart {
                cmd_chart(&cli.out_dir, as_of, &config)?;
            }
            Ok(())
        }
        Commands::Chart => cmd_chart(&cli.out_dir, as_of, &config).map(|_| ()),
        Commands::Status { json } => cmd_status(&cli.out_dir, as_of, json).map(|_| ()),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
