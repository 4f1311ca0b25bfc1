//! CLI application for TempoVale: see what a purchase costs in hours of work.

mod commands;
mod ocr_space;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, convert, history, profile, scan, summary};

/// TempoVale - Express purchases as the work time needed to pay for them
#[derive(Parser)]
#[command(name = "tempovale")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the purchase storage file
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a value into work time
    Convert(convert::ConvertArgs),

    /// Read a receipt (image or OCR text) and find its total
    Scan(scan::ScanArgs),

    /// List, export or delete recorded purchases
    History(history::HistoryArgs),

    /// Show totals across all purchases
    Summary(summary::SummaryArgs),

    /// Show or update salary and weekly hours
    Profile(profile::ProfileArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    let data_path = cli.data.as_deref();

    // Execute command
    match cli.command {
        Commands::Convert(args) => convert::run(args, config_path, data_path).await,
        Commands::Scan(args) => scan::run(args, config_path, data_path).await,
        Commands::History(args) => history::run(args, config_path, data_path).await,
        Commands::Summary(args) => summary::run(args, config_path, data_path).await,
        Commands::Profile(args) => profile::run(args, config_path, data_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
