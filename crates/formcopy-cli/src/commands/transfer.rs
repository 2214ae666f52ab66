//! Transfer command - copy the allowed fields into the destination form.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::debug;

use formcopy_core::{Pipeline, TransferConfig, TransferReport};

use super::{ExtractionArg, ModeArg, SelectionArg};

/// Arguments for the transfer command.
#[derive(Args)]
pub struct TransferArgs {
    /// Run in memory or through the JSON checkpoints
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// How fields are read from the source document
    #[arg(short, long, value_enum)]
    extraction: Option<ExtractionArg>,

    /// How allowed fields are picked in single-stage runs
    #[arg(short, long, value_enum)]
    selection: Option<SelectionArg>,
}

pub fn run(args: TransferArgs, config_path: &Path) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = TransferConfig::from_file(config_path).with_context(|| {
        format!(
            "Run 'formcopy config init' to create {}",
            config_path.display()
        )
    })?;

    if let Some(mode) = args.mode {
        config.transfer.mode = mode.into();
    }
    if let Some(extraction) = args.extraction {
        config.transfer.extraction = extraction.into();
    }
    if let Some(selection) = args.selection {
        config.transfer.selection = selection.into();
    }
    debug!("Transfer options: {:?}", config.transfer);

    let report = Pipeline::new(config).run()?;
    print_report(&report)?;

    debug!("Total transfer time: {:?}", start.elapsed());

    Ok(())
}

fn print_report(report: &TransferReport) -> anyhow::Result<()> {
    for field in &report.write.written {
        println!(
            "{} Filled '{}' with '{}'",
            style("✓").green(),
            field.name,
            field.value
        );
    }
    for name in &report.write.skipped {
        println!(
            "{} No field named '{}' in {}",
            style("⚠").yellow(),
            name,
            report.destination.display()
        );
    }

    println!();
    println!("{}", style("Filtered values:").bold());
    println!("{}", serde_json::to_string_pretty(&report.filtered)?);

    if !report.missing.is_empty() {
        println!(
            "{} {} allowed field(s) not found in {}",
            style("ℹ").blue(),
            report.missing.len(),
            report.source.display()
        );
    }

    println!(
        "{} Output written to {}",
        style("✓").green(),
        report.output.display()
    );

    Ok(())
}
