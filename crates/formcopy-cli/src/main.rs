//! CLI application for copying fillable PDF form fields between documents.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, extract, transfer};

/// Copy selected form field values from one PDF into another
#[derive(Parser)]
#[command(name = "formcopy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the allowed fields from the source PDF into the destination PDF
    Transfer(transfer::TransferArgs),

    /// Dump the form fields of a PDF as JSON
    Extract(extract::ExtractArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
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

    let config_path = cli.config.unwrap_or_else(config::default_config_path);

    match cli.command {
        Commands::Transfer(args) => transfer::run(args, &config_path),
        Commands::Extract(args) => extract::run(args),
        Commands::Config(args) => config::run(args, &config_path),
    }
}
