//! MockProvider - injectable overrides, no definition file required
//!
//! Used by tests and demos in place of a compiled `RuleProvider`.

use std::collections::HashMap;

use contracts::{MessageType, OverrideError, OverrideProvider, Payload, TransformFn};

/// Override provider with capabilities injected as closures
pub struct MockProvider {
    name: String,
    overrides: HashMap<MessageType, TransformFn>,
}

impl MockProvider {
    /// Create a provider with no capabilities
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            overrides: HashMap::new(),
        }
    }

    /// Attach an override for a variant
    pub fn with_override<F>(mut self, message_type: MessageType, transform: F) -> Self
    where
        F: Fn(Payload) -> Result<Payload, OverrideError> + Send + Sync + 'static,
    {
        self.overrides.insert(message_type, Box::new(transform));
        self
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("mock")
    }
}

impl OverrideProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn override_for(&self, message_type: MessageType) -> Option<&TransformFn> {
        self.overrides.get(&message_type)
    }
}
