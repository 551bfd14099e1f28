//! OverrideProvider trait - the capability bag consumed by the dispatcher
//!
//! Defines the abstract interface for operator-supplied transformations.

use crate::{MessageType, Payload};

/// Error surfaced by a user-supplied override function.
///
/// Override failures are configuration-time defects; the dispatcher
/// propagates them without retrying.
pub type OverrideError = Box<dyn std::error::Error + Send + Sync>;

/// A single override: full message object in, full message object out.
pub type TransformFn = Box<dyn Fn(Payload) -> Result<Payload, OverrideError> + Send + Sync>;

/// Operator-supplied transformation capabilities, at most one per variant.
///
/// Absence of a capability is a first-class state: the dispatcher passes
/// that variant through unchanged. A provider is constructed once per run
/// and is never mutated by the dispatcher.
pub trait OverrideProvider: Send + Sync {
    /// Provider name (used for logging/info)
    fn name(&self) -> &str;

    /// The override for a variant, if the provider defines one
    fn override_for(&self, message_type: MessageType) -> Option<&TransformFn>;
}

/// Probe whether a provider defines an override for a variant.
///
/// Pure lookup: absence is a normal outcome, never an error. Safe to call
/// once per message, since a provider's capability set is fixed for its
/// lifetime.
pub fn has_capability(provider: &dyn OverrideProvider, message_type: MessageType) -> bool {
    provider.override_for(message_type).is_some()
}
