use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use hotel_insights::{AppState, Config, FilterParams, ReportKind};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Hotel booking dashboards: filter the booking table and print report JSON.
#[derive(Debug, Parser)]
#[command(name = "hotel-insights", version, about)]
pub struct Cli {
    /// Booking dataset (.csv, .json or .parquet). Overrides HOTEL_INSIGHTS_DATA.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute one report by endpoint name (see `reports`).
    Report {
        name: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// The booking trends overview page.
    Overview {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// The revenue and guest behavior page.
    GuestBehavior {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write the filtered bookings as CSV.
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file; stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Selector choices for hotel, year and month.
    Options,
    /// List the report names.
    Reports,
}

/// Filters, passed through exactly as a query string would carry them.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Hotel name, or "All Hotels".
    #[arg(long)]
    pub hotel: Option<String>,
    /// Arrival year, or "All Years".
    #[arg(long)]
    pub year: Option<String>,
    /// Arrival month name, or "All Months".
    #[arg(long)]
    pub month: Option<String>,
}

impl From<FilterArgs> for FilterParams {
    fn from(args: FilterArgs) -> Self {
        FilterParams {
            hotel: args.hotel,
            year: args.year,
            month: args.month,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(cli: Cli) -> Result<()> {
    if let Command::Reports = cli.command {
        let names: Vec<&str> = ReportKind::ALL.iter().map(|k| k.name()).collect();
        return print_json(&names, cli.pretty);
    }

    let mut config = Config::from_env().context("reading configuration")?;
    if let Some(path) = cli.data {
        config.data_path = path;
    }
    let state = AppState::load(&config).context("loading booking table")?;

    match cli.command {
        Command::Report { name, filters } => {
            let report = state.report_by_name(&name, &filters.into())?;
            print_json(&report, cli.pretty)
        }
        Command::Overview { filters } => print_json(&state.overview(&filters.into()), cli.pretty),
        Command::GuestBehavior { filters } => {
            print_json(&state.guest_behavior(&filters.into()), cli.pretty)
        }
        Command::Export { filters, output } => {
            let params = filters.into();
            let written = match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    state.export_csv(&params, BufWriter::new(file))?
                }
                None => state.export_csv(&params, io::stdout().lock())?,
            };
            log::info!("Exported {written} bookings");
            Ok(())
        }
        Command::Options => print_json(&state.filter_options(), cli.pretty),
        Command::Reports => Ok(()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
