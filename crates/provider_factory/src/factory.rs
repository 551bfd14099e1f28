//! ProviderFactory core implementation
//!
//! Locates and parses the operator's transform definition, producing the
//! provider that is injected into the dispatcher.

use std::path::Path;

use contracts::OverrideProvider;
use tracing::{info, instrument};

use crate::error::{ProviderFactoryError, Result};
use crate::provider::RuleProvider;
use crate::rules::OverrideRules;

/// Transform definition file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefinitionFormat {
    Toml,
    Json,
}

impl DefinitionFormat {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Provider Factory
///
/// Builds `RuleProvider`s from transform definition files.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Load a transform definition and compile it into a provider
    ///
    /// The provider is named after the definition file stem.
    #[instrument(name = "provider_factory_load", skip(path), fields(path = %path.display()))]
    pub fn load_from_path(path: &Path) -> Result<RuleProvider> {
        let rules = Self::load_rules(path)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("transform")
            .to_string();
        let provider = RuleProvider::new(name, &rules);

        info!(
            provider = %provider.name(),
            sections = rules.sections().count(),
            "transform definition loaded"
        );

        Ok(provider)
    }

    /// Parse a transform definition file without compiling it
    ///
    /// Used by `validate`/`info` to inspect declared capabilities.
    pub fn load_rules(path: &Path) -> Result<OverrideRules> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderFactoryError::definition_read(path.display().to_string(), e.to_string())
        })?;
        Self::parse_rules(&content, format)
            .map_err(|e| ProviderFactoryError::definition_parse(path.display().to_string(), e))
    }

    fn detect_format(path: &Path) -> Result<DefinitionFormat> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(DefinitionFormat::from_extension)
            .ok_or_else(|| ProviderFactoryError::UnsupportedFormat {
                path: path.display().to_string(),
            })
    }

    fn parse_rules(content: &str, format: DefinitionFormat) -> std::result::Result<OverrideRules, String> {
        match format {
            DefinitionFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            DefinitionFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{has_capability, MessageType};
    use std::io::Write;

    fn write_definition(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_toml_definition() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_definition(
            &dir,
            "users.toml",
            r#"
[record]
operations = [{ op = "set", path = "record.processed", value = true }]
"#,
        );

        let provider = ProviderFactory::load_from_path(&path).unwrap();
        assert_eq!(provider.name(), "users");
        assert!(has_capability(&provider, MessageType::Record));
        assert!(!has_capability(&provider, MessageType::Schema));
    }

    #[test]
    fn test_load_json_definition() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_definition(
            &dir,
            "stamp.json",
            r#"{ "state": { "operations": [{ "op": "set", "path": "processed", "value": true }] } }"#,
        );

        let provider = ProviderFactory::load_from_path(&path).unwrap();
        assert!(has_capability(&provider, MessageType::State));
    }

    #[test]
    fn test_empty_definition_has_no_capabilities() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_definition(&dir, "empty.toml", "");

        let provider = ProviderFactory::load_from_path(&path).unwrap();
        for message_type in MessageType::ALL {
            assert!(!has_capability(&provider, message_type));
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_definition(&dir, "rules.yaml", "");
        let result = ProviderFactory::load_from_path(&path);
        assert!(matches!(
            result,
            Err(ProviderFactoryError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = ProviderFactory::load_from_path(Path::new("/no/such/definition.toml"));
        assert!(matches!(
            result,
            Err(ProviderFactoryError::DefinitionRead { .. })
        ));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_definition(&dir, "broken.toml", "invalid toml [[[");
        let result = ProviderFactory::load_from_path(&path);
        assert!(matches!(
            result,
            Err(ProviderFactoryError::DefinitionParse { .. })
        ));
    }
}
