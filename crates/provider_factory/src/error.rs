//! Provider Factory error types

use contracts::ContractError;
use thiserror::Error;

/// Provider Factory specific error
#[derive(Debug, Error)]
pub enum ProviderFactoryError {
    /// Transform definition file could not be read
    #[error("failed to read transform definition '{path}': {message}")]
    DefinitionRead { path: String, message: String },

    /// Transform definition file could not be parsed
    #[error("failed to parse transform definition '{path}': {message}")]
    DefinitionParse { path: String, message: String },

    /// Transform definition file has an unsupported extension
    #[error("unsupported transform definition format: '{path}'")]
    UnsupportedFormat { path: String },

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl ProviderFactoryError {
    /// Create definition read error
    pub fn definition_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DefinitionRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create definition parse error
    pub fn definition_parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DefinitionParse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, ProviderFactoryError>;
