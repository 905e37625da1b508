use anyhow::{Context, Result};
use clap::Parser;
use exchange_config::{ConfigLoader, ExchangeConfig, LogFormat, LoggingConfig};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, ConfigCommands};

/// Load configuration from file or environment
fn load_config(config_path: Option<&PathBuf>) -> Result<ExchangeConfig> {
    let loader = ConfigLoader::new();
    match config_path {
        Some(path) => loader
            .from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => loader
            .from_env()
            .context("Failed to load configuration from environment"),
    }
}

/// Initialize tracing on stderr so stdout stays machine-readable
fn init_tracing(config: &LoggingConfig, log_level: Option<&String>) -> Result<()> {
    let level = log_level
        .cloned()
        .unwrap_or_else(|| config.level.to_string());

    let env_filter = EnvFilter::try_new(&level).unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', falling back to 'warn'", level);
        EnvFilter::new("warn")
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let initialized = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if initialized.is_err() {
        debug!("Global tracing subscriber already initialized, skipping");
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let formatted = serde_json::to_string_pretty(value).context("Failed to format JSON")?;
    println!("{}", formatted);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(dir) = &cli.dir {
        config.files.working_dir = dir.clone();
    }

    init_tracing(&config.logging, cli.log_level.as_ref())?;
    debug!("Using exchange directory {}", config.files.working_dir.display());

    match &cli.command {
        Some(Commands::Inspect) => print_json(&commands::handle_inspect(&config.files)?),
        Some(Commands::Stage { request }) => {
            println!("{}", commands::handle_stage(&config.files, request)?);
            Ok(())
        }
        Some(Commands::Collect) => print_json(&commands::handle_collect(&config.files)?),
        Some(Commands::Config { config_cmd }) => {
            let message = match config_cmd {
                ConfigCommands::Validate { config_file } => {
                    commands::handle_config_validate(config_file)?
                }
                ConfigCommands::Generate { output, force } => {
                    commands::handle_config_generate(output, *force)?
                }
            };
            println!("{}", message);
            Ok(())
        }
        None => {
            // If no subcommand is provided, print help
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            cmd.print_help().context("Failed to print help")?;
            println!();
            Ok(())
        }
    }
}
