//! Command handlers
//!
//! Each handler returns what should be printed on stdout so that logging can
//! stay on stderr.

use anyhow::{bail, Context, Result};
use exchange_config::{ConfigLoader, ExchangeConfig, FileLayout};
use exchange_ipc::{ChannelExchange, DirectoryStore, ExchangeOutcome, ExchangeRequest};
use serde_json::{json, Value as JsonValue};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Summary of what a worker would load from the exchange directory
pub fn handle_inspect(layout: &FileLayout) -> Result<JsonValue> {
    let store = DirectoryStore::new(layout.clone());
    let exchange = ChannelExchange::load(&store);

    for resource in exchange.defaulted_resources() {
        warn!(
            "{} unavailable at {}, worker would use its default",
            resource,
            layout.resolve(*resource).display()
        );
    }

    Ok(json!({
        "working_dir": layout.working_dir,
        "inputs": exchange.input_values(),
        "required_if_connected": exchange.required_if_connected(),
        "output_names": exchange.get_output_names(),
        "state": exchange.get_state_dict(),
        "run_number": exchange.get_execution_count(),
        "defaulted": exchange.defaulted_resources(),
    }))
}

pub fn handle_stage(layout: &FileLayout, request_path: &Path) -> Result<String> {
    let body = fs::read_to_string(request_path)
        .with_context(|| format!("Failed to read request {}", request_path.display()))?;
    let request: ExchangeRequest = serde_json::from_str(&body)
        .with_context(|| format!("Invalid request document {}", request_path.display()))?;

    let mut store = DirectoryStore::new(layout.clone());
    request
        .stage(&mut store)
        .context("Failed to stage exchange files")?;

    info!("Staged run {} in {}", request.run_number, layout.working_dir.display());
    Ok(format!(
        "Staged {} input(s) and {} output(s) in {}",
        request.inputs.len(),
        request.output_names.len(),
        layout.working_dir.display()
    ))
}

pub fn handle_collect(layout: &FileLayout) -> Result<JsonValue> {
    let store = DirectoryStore::new(layout.clone());
    let outcome = ExchangeOutcome::collect(&store).with_context(|| {
        format!(
            "Failed to collect results from {}",
            layout.working_dir.display()
        )
    })?;

    debug!("Collected {} output channel(s)", outcome.outputs.len());
    serde_json::to_value(&outcome).context("Failed to render outcome")
}

pub fn handle_config_validate(config_file: &Path) -> Result<String> {
    let config = ConfigLoader::new()
        .from_file(config_file)
        .with_context(|| format!("Configuration {} is invalid", config_file.display()))?;

    Ok(format!(
        "Configuration is valid (working directory: {})",
        config.files.working_dir.display()
    ))
}

pub fn handle_config_generate(output: &Path, force: bool) -> Result<String> {
    if output.exists() && !force {
        bail!(
            "{} already exists, use --force to overwrite",
            output.display()
        );
    }

    let sample = ExchangeConfig::generate_sample().context("Failed to render sample")?;
    fs::write(output, sample)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(format!("Sample configuration written to {}", output.display()))
}
