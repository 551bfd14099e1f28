//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    settings: SettingsInfo,
    transform: TransformInfo,
}

#[derive(Serialize)]
struct SettingsInfo {
    transform_path: String,
    buffer_size: usize,
}

#[derive(Serialize)]
struct TransformInfo {
    overrides: Vec<OverrideInfo>,
}

#[derive(Serialize)]
struct OverrideInfo {
    message_type: String,
    operation_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    operations: Vec<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let settings = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let rules = provider_factory::ProviderFactory::load_rules(&settings.transform_path)
        .with_context(|| {
            format!(
                "Failed to load transform definition from {}",
                settings.transform_path.display()
            )
        })?;

    if args.json {
        let config_info = build_config_info(&settings, &rules, args);
        let json = serde_json::to_string_pretty(&config_info)
            .context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&settings, &rules, args);
    }

    Ok(())
}

fn describe_operation(operation: &provider_factory::Operation) -> String {
    use provider_factory::Operation;

    match operation {
        Operation::Set { path, value } => format!("set {} = {}", path, value),
        Operation::Remove { path } => format!("remove {}", path),
        Operation::Rename { from, to } => format!("rename {} -> {}", from, to),
        Operation::Copy { from, to } => format!("copy {} -> {}", from, to),
    }
}

fn build_config_info(
    settings: &contracts::MapperSettings,
    rules: &provider_factory::OverrideRules,
    args: &InfoArgs,
) -> ConfigInfo {
    let overrides = rules
        .sections()
        .map(|(message_type, rule_set)| OverrideInfo {
            message_type: message_type.to_string(),
            operation_count: rule_set.operations.len(),
            operations: if args.operations {
                rule_set.operations.iter().map(describe_operation).collect()
            } else {
                Vec::new()
            },
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", settings.version),
        settings: SettingsInfo {
            transform_path: settings.transform_path.display().to_string(),
            buffer_size: settings.buffer_size,
        },
        transform: TransformInfo { overrides },
    }
}

fn print_config_info(
    settings: &contracts::MapperSettings,
    rules: &provider_factory::OverrideRules,
    args: &InfoArgs,
) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                Stream Mapper Configuration                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Settings
    println!("📍 Settings");
    println!("   ├─ Version: {:?}", settings.version);
    println!("   ├─ Transform: {}", settings.transform_path.display());
    println!("   └─ Buffer size: {}", settings.buffer_size);

    // Overrides
    let sections: Vec<_> = rules.sections().collect();
    println!("\n🔁 Overrides ({})", sections.len());
    if sections.is_empty() {
        println!("   └─ (none - all messages pass through unchanged)");
    }
    for (i, (message_type, rule_set)) in sections.iter().enumerate() {
        let is_last = i == sections.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!(
            "   {} {} ({} operations)",
            prefix,
            message_type,
            rule_set.operations.len()
        );

        if args.operations && !rule_set.operations.is_empty() {
            for (j, operation) in rule_set.operations.iter().enumerate() {
                let op_is_last = j == rule_set.operations.len() - 1;
                let op_prefix = if op_is_last { "└─" } else { "├─" };
                println!(
                    "   {}  {} {}",
                    child_prefix,
                    op_prefix,
                    describe_operation(operation)
                );
            }
        }
    }

    // Passthrough variants
    let passthrough: Vec<&str> = contracts::MessageType::ALL
        .into_iter()
        .filter(|t| rules.rule_set(*t).is_none())
        .map(|t| t.capability_name())
        .collect();
    if !passthrough.is_empty() {
        println!("\n➡️  Passthrough");
        for (i, name) in passthrough.iter().enumerate() {
            let prefix = if i == passthrough.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!("   {} {}", prefix, name);
        }
    }

    println!();
}
