mod commands;
mod config;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::lease::{CalendarArgs, RentArgs};
use commands::projection::ProjectionArgs;
use commands::roi::RoiArgs;

/// Kiosk lease profit-and-loss projections
#[derive(Parser)]
#[command(
    name = "kiosk-pnl",
    version,
    about = "Kiosk lease P&L, cost breakdown and ROI projections",
    long_about = "Projects the monthly profit and loss of a retail kiosk for a selected \
                  lease year: sales, rent, salaries, utilities, franchise fees, the Year 1 \
                  renovation benefit, cost breakdown, payback period and annual ROI."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// JSON or YAML location catalog replacing the built-in one
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full monthly projection (P&L, breakdown, ROI, timeline)
    #[command(alias = "pnl")]
    Project(ProjectionArgs),
    /// Cost breakdown by category as a share of total monthly costs
    Breakdown(ProjectionArgs),
    /// Formatted summary table of inputs and results
    Summary(ProjectionArgs),
    /// Rent and rate for a lease year
    Rent(RentArgs),
    /// Payback period and annual ROI from a monthly net profit
    Roi(RoiArgs),
    /// Renovation window and lease-year dates from the signing month
    Calendar(CalendarArgs),
    /// List catalog locations
    Locations,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Version = cli.command {
        println!("kiosk-pnl {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> =
        config::load_catalog(cli.catalog.as_deref()).and_then(|catalog| match cli.command {
            Commands::Project(args) => commands::projection::run_project(args, &catalog),
            Commands::Breakdown(args) => commands::projection::run_breakdown(args, &catalog),
            Commands::Summary(args) => commands::projection::run_summary(args, &catalog),
            Commands::Rent(args) => commands::lease::run_rent(args, &catalog),
            Commands::Roi(args) => commands::roi::run_roi(args),
            Commands::Calendar(args) => commands::lease::run_calendar(args, &catalog),
            Commands::Locations => commands::lease::run_locations(&catalog),
            Commands::Version => unreachable!("handled before the catalog is loaded"),
        });

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
