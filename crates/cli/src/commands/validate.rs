//! `validate` command implementation.

use anyhow::{Context, Result};
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
    transform_path: String,
    buffer_size: usize,
    override_count: usize,
    overrides: Vec<String>,
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

    // Try to load and validate the config itself
    let settings = match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(settings) => settings,
        Err(e) => {
            return ValidationResult {
                valid: false,
                config_path,
                error: Some(e.to_string()),
                warnings: None,
                summary: None,
            };
        }
    };

    // The transform definition must load too
    let rules = match provider_factory::ProviderFactory::load_rules(&settings.transform_path) {
        Ok(rules) => rules,
        Err(e) => {
            return ValidationResult {
                valid: false,
                config_path,
                error: Some(e.to_string()),
                warnings: None,
                summary: None,
            };
        }
    };

    let warnings = collect_warnings(&rules);
    let overrides: Vec<String> = rules
        .sections()
        .map(|(message_type, _)| message_type.to_string())
        .collect();

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
            version: format!("{:?}", settings.version),
            transform_path: settings.transform_path.display().to_string(),
            buffer_size: settings.buffer_size,
            override_count: overrides.len(),
            overrides,
        }),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(rules: &provider_factory::OverrideRules) -> Vec<String> {
    let mut warnings = Vec::new();

    // An empty definition is valid but a likely operator mistake
    if rules.is_empty() {
        warnings
            .push("Transform definition declares no overrides - all messages pass through".into());
    }

    // Declared sections with no operations behave as identity
    for (message_type, rule_set) in rules.sections() {
        if rule_set.operations.is_empty() {
            warnings.push(format!(
                "Override for '{}' declares no operations - it is an identity transform",
                message_type
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Transform: {}", summary.transform_path);
            println!("  Buffer size: {}", summary.buffer_size);
            println!("  Overrides: {}", summary.override_count);
            for name in &summary.overrides {
                println!("    - {}", name);
            }
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
