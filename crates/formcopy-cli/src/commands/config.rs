//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use formcopy_core::TransferConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(config_path),
        ConfigCommand::Init(init_args) => init_config(init_args, config_path),
        ConfigCommand::Path => show_path(config_path),
    }
}

/// Relative to the working directory, like every path inside the file.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Config").join("config.toml")
}

fn show_config(config_path: &Path) -> anyhow::Result<()> {
    let (config, from_file) = if config_path.exists() {
        let raw: toml::Table = toml::from_str(&fs::read_to_string(config_path)?)?;
        (TransferConfig::from_file(config_path)?, raw)
    } else {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
        (TransferConfig::default(), toml::Table::new())
    };

    let effective = toml::Value::try_from(&config)?;
    let Some(sections) = effective.as_table() else {
        anyhow::bail!("Configuration did not serialize to a table");
    };

    for (section, entries) in sections {
        let Some(entries) = entries.as_table() else {
            continue;
        };
        let file_section = from_file.get(section).and_then(toml::Value::as_table);

        println!("[{}]", section);
        for (key, value) in entries {
            let origin = if file_section.is_some_and(|t| t.contains_key(key)) {
                style("file").green()
            } else {
                style("default").dim()
            };
            println!("{} = {}  # {}", key, value, origin);
        }
        println!();
    }

    Ok(())
}

fn init_config(args: InitArgs, config_path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| config_path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    // Create parent directory if needed
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let config = TransferConfig::default();
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn show_path(config_path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'formcopy config init' to create a configuration file.");
    }

    Ok(())
}
