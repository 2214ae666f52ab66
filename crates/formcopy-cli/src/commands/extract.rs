//! Extract command - dump the form fields of one document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use formcopy_core::pdf::source_for;

use super::ExtractionArg;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// PDF to read
    #[arg(required = true)]
    input: PathBuf,

    /// How fields are read from the document
    #[arg(short, long, value_enum, default_value = "acroform")]
    extraction: ExtractionArg,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ExtractArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let fields = source_for(args.extraction.into()).extract(&args.input)?;
    info!("Extracted {} fields from {}", fields.len(), args.input.display());

    let output = serde_json::to_string_pretty(&fields)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
