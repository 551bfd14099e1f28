//! Layered error definitions
//!
//! Categorized by source: config / codec / message shape / io

use thiserror::Error;

use crate::MessageType;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Codec Errors =====
    /// Wire line could not be decoded or encoded
    #[error("codec error: {message}")]
    Codec { message: String },

    // ===== Message Shape Errors =====
    /// A payload lacked the fields required to reinterpret it as a variant
    #[error("malformed {expected} message: {message}")]
    MalformedMessage {
        expected: MessageType,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create codec error
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Create malformed message error
    pub fn malformed_message(expected: MessageType, message: impl Into<String>) -> Self {
        Self::MalformedMessage {
            expected,
            message: message.into(),
        }
    }
}
