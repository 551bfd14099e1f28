//! Dispatcher error types

use contracts::{ContractError, MessageType, OverrideError};
use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Schema override altered the stream identifier.
    ///
    /// Fatal and non-retryable: downstream stream bookkeeping would
    /// desynchronize if processing continued.
    #[error("schema override changed stream '{expected}' to '{altered}': altering stream identity is unsafe")]
    StreamIdentity { expected: String, altered: String },

    /// A user-supplied override failed; propagated, never retried
    #[error("{message_type} override failed: {source}")]
    Override {
        message_type: MessageType,
        #[source]
        source: OverrideError,
    },

    /// Override result could not be reinterpreted as its variant (from contract)
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl DispatcherError {
    /// Create an override execution error
    pub fn override_failed(message_type: MessageType, source: OverrideError) -> Self {
        Self::Override {
            message_type,
            source,
        }
    }
}
