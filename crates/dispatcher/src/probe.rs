//! Capability probing - which override slots a provider populates
//!
//! Probing is a pure lookup. The result may be cached for the life of the
//! run because providers are immutable after construction.

use std::fmt;

use contracts::{has_capability, MessageType, OverrideProvider};

/// The subset of variants a provider defines overrides for.
///
/// A fixed-size set computed by probing each slot once; per-message
/// routing never reflects over the provider again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    /// Probe all four capability slots of a provider
    pub fn probe(provider: &dyn OverrideProvider) -> Self {
        let mut set = Self::default();
        for message_type in MessageType::ALL {
            if has_capability(provider, message_type) {
                set.insert(message_type);
            }
        }
        set
    }

    fn bit(message_type: MessageType) -> u8 {
        match message_type {
            MessageType::Schema => 1 << 0,
            MessageType::Record => 1 << 1,
            MessageType::State => 1 << 2,
            MessageType::ActivateVersion => 1 << 3,
        }
    }

    /// Mark a variant as overridden
    pub fn insert(&mut self, message_type: MessageType) {
        self.0 |= Self::bit(message_type);
    }

    /// Whether a variant has an override
    pub fn contains(&self, message_type: MessageType) -> bool {
        self.0 & Self::bit(message_type) != 0
    }

    /// Number of overridden variants
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// True when the provider defines no overrides at all
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Overridden variants in declaration order
    pub fn iter(&self) -> impl Iterator<Item = MessageType> + '_ {
        MessageType::ALL
            .into_iter()
            .filter(|message_type| self.contains(*message_type))
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        let names: Vec<&str> = self.iter().map(|t| t.capability_name()).collect();
        f.write_str(&names.join(", "))
    }
}
