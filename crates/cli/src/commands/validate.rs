//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{CaptureBlueprint, StoreType};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    format: String,
    listen: String,
    track: String,
    sample_period: u64,
    store: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    format: blueprint.capture.format.clone(),
                    listen: format!(
                        "{}:{}",
                        blueprint.capture.bind_address, blueprint.capture.port
                    ),
                    track: blueprint.session.track.clone(),
                    sample_period: blueprint.telemetry.sample_period,
                    store: format!("{} ({:?})", blueprint.store.name, blueprint.store.store_type),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &CaptureBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.store.store_type == StoreType::Memory {
        warnings.push("Memory store configured - captured data is discarded on exit".to_string());
    }

    if blueprint.telemetry.sample_period == 1 {
        warnings.push("telemetry.sample_period is 1 - every telemetry frame will be persisted".to_string());
    }

    if blueprint.session.date.is_none() {
        warnings.push("session.date not set - the local date at session start is used".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Format: {}", summary.format);
            println!("  Listen: {}", summary.listen);
            println!("  Track: {}", summary.track);
            println!("  Sample period: {}", summary.sample_period);
            println!("  Store: {}", summary.store);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
