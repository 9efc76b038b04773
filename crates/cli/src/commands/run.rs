//! `run` command implementation.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{CaptureBlueprint, StoreConfig, StoreType, WireFormat};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Capture, CaptureSettings};

/// Execute the `run` command
pub async fn run_capture(args: &RunArgs) -> Result<()> {
    let blueprint = resolve_blueprint(args)?;

    info!(
        format = %blueprint.capture.format,
        bind = %blueprint.capture.bind_address,
        port = blueprint.capture.port,
        track = %blueprint.session.track,
        sample_period = blueprint.telemetry.sample_period,
        store = %blueprint.store.name,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let settings = CaptureSettings {
        blueprint,
        max_datagrams: (args.max_datagrams > 0).then_some(args.max_datagrams),
        timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
        metrics_port: (args.metrics_port > 0).then_some(args.metrics_port),
    };

    info!("Starting capture...");

    let stats = Capture::new(settings)
        .run(shutdown_signal())
        .await
        .context("Capture failed")?;

    info!(
        datagrams = stats.datagrams,
        laps = stats.laps,
        decode_errors = stats.decode_errors,
        duration_secs = stats.duration.as_secs_f64(),
        "Capture completed"
    );
    stats.print_summary();

    Ok(())
}

/// Load the configuration file (or defaults), apply CLI overrides, validate
fn resolve_blueprint(args: &RunArgs) -> Result<CaptureBlueprint> {
    let mut blueprint = match &args.config {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => {
            let format = match &args.format {
                Some(text) => text
                    .parse::<WireFormat>()
                    .with_context(|| "Invalid --format value")?,
                None => {
                    warn!("No --config or --format given, assuming the newer wire format");
                    WireFormat::Newer
                }
            };
            CaptureBlueprint::with_format(format)
        }
    };

    apply_overrides(&mut blueprint, args);
    ConfigLoader::validate(&blueprint).context("Configuration validation failed")?;
    Ok(blueprint)
}

/// Apply CLI overrides on top of the loaded configuration
fn apply_overrides(blueprint: &mut CaptureBlueprint, args: &RunArgs) {
    if let Some(ref format) = args.format {
        info!(format = %format, "Overriding wire format from CLI");
        blueprint.capture.format = format.clone();
    }
    if let Some(ref bind) = args.bind {
        info!(bind = %bind, "Overriding bind address from CLI");
        blueprint.capture.bind_address = bind.clone();
    }
    if let Some(port) = args.port {
        info!(port, "Overriding port from CLI");
        blueprint.capture.port = port;
    }
    if let Some(period) = args.sample_period {
        info!(sample_period = period, "Overriding sample period from CLI");
        blueprint.telemetry.sample_period = period;
    }
    if let Some(ref track) = args.track {
        info!(track = %track, "Overriding track from CLI");
        blueprint.session.track = track.clone();
    }
    if let Some(ref output) = args.output {
        info!(output = %output.display(), "Writing JSON lines from CLI");
        blueprint.store = StoreConfig {
            name: "jsonl".to_string(),
            store_type: StoreType::File,
            params: HashMap::from([(
                "base_path".to_string(),
                output.to_string_lossy().into_owned(),
            )]),
        };
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &CaptureBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Capture:");
    println!("  Format: {}", blueprint.capture.format);
    println!(
        "  Listen: {}:{}",
        blueprint.capture.bind_address, blueprint.capture.port
    );
    println!("\nSession:");
    println!("  Track: {}", blueprint.session.track);
    println!("  Type: {}", blueprint.session.session_type);
    println!("  Weather: {}", blueprint.session.weather);
    match blueprint.session.date {
        Some(date) => println!("  Date: {date}"),
        None => println!("  Date: (local date at session start)"),
    }
    println!(
        "  Starting tyres: {} / fuel {:.1}",
        blueprint.session.starting_compound, blueprint.session.starting_fuel
    );
    println!("\nLaps:");
    println!(
        "  Valid range: {} ms ..= {} ms",
        blueprint.laps.min_lap_ms, blueprint.laps.max_lap_ms
    );
    println!("  Telemetry sample period: {}", blueprint.telemetry.sample_period);
    println!(
        "\nStore: {} ({:?})",
        blueprint.store.name, blueprint.store.store_type
    );
    for (key, value) in &blueprint.store.params {
        println!("  {key} = {value}");
    }
    println!();
}
