//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut settings = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref transform) = args.transform {
        info!(transform = %transform.display(), "Overriding transform definition from CLI");
        settings.transform_path = transform.clone();
    }
    if let Some(buffer_size) = args.buffer_size {
        info!(buffer_size, "Overriding buffer size from CLI");
        settings.buffer_size = buffer_size;
    }

    info!(
        transform = %settings.transform_path.display(),
        buffer_size = settings.buffer_size,
        "Configuration loaded"
    );

    // Dry run - validate config and transform definition, then exit
    if args.dry_run {
        let rules = provider_factory::ProviderFactory::load_rules(&settings.transform_path)
            .context("Failed to load transform definition")?;
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&settings, &rules);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        settings,
        input: args.input.clone(),
        output: args.output.clone(),
        max_messages: if args.max_messages == 0 {
            None
        } else {
            Some(args.max_messages)
        },
        timeout: if args.timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(args.timeout))
        },
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Create and run pipeline
    let pipeline = Pipeline::new(pipeline_config);

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    info!("Starting pipeline...");

    // Run pipeline with shutdown signal
    tokio::select! {
        result = pipeline.run() => {
            match result {
                Ok(stats) => {
                    info!(
                        messages_read = stats.messages_read,
                        messages_emitted = stats.messages_emitted,
                        duration_secs = stats.duration.as_secs_f64(),
                        throughput = format!("{:.2}", stats.throughput()),
                        "Pipeline completed successfully"
                    );

                    // Print detailed statistics
                    stats.print_summary();
                }
                Err(e) => {
                    return Err(e).context("Pipeline execution failed");
                }
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping pipeline...");
        }
    }

    info!("Stream Mapper finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(
    settings: &contracts::MapperSettings,
    rules: &provider_factory::OverrideRules,
) {
    println!("\n=== Configuration Summary ===\n");
    println!("Settings:");
    println!("  Transform: {}", settings.transform_path.display());
    println!("  Buffer size: {}", settings.buffer_size);

    let sections: Vec<_> = rules.sections().collect();
    if sections.is_empty() {
        println!("\nOverrides: none (all messages pass through unchanged)");
    } else {
        println!("\nOverrides ({}):", sections.len());
        for (message_type, rule_set) in sections {
            println!(
                "  - {} ({} operations)",
                message_type,
                rule_set.operations.len()
            );
        }
    }

    println!();
}
