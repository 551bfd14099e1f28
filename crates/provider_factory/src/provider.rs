//! RuleProvider - OverrideProvider backed by declarative rules

use contracts::{MessageType, OverrideProvider, TransformFn};

use crate::rules::{OverrideRules, RuleSet};

/// Override provider compiled from a transform definition.
///
/// A capability slot is populated iff the definition declares a section
/// for that variant; a declared section with zero operations is a valid
/// identity override.
pub struct RuleProvider {
    name: String,
    schema: Option<TransformFn>,
    record: Option<TransformFn>,
    state: Option<TransformFn>,
    activate_version: Option<TransformFn>,
}

impl RuleProvider {
    /// Compile a transform definition into a provider
    pub fn new(name: impl Into<String>, rules: &OverrideRules) -> Self {
        Self {
            name: name.into(),
            schema: rules.schema.clone().map(compile),
            record: rules.record.clone().map(compile),
            state: rules.state.clone().map(compile),
            activate_version: rules.activate_version.clone().map(compile),
        }
    }
}

fn compile(rule_set: RuleSet) -> TransformFn {
    Box::new(move |payload| rule_set.apply(payload).map_err(Into::into))
}

impl OverrideProvider for RuleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn override_for(&self, message_type: MessageType) -> Option<&TransformFn> {
        match message_type {
            MessageType::Schema => self.schema.as_ref(),
            MessageType::Record => self.record.as_ref(),
            MessageType::State => self.state.as_ref(),
            MessageType::ActivateVersion => self.activate_version.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Operation;
    use contracts::has_capability;
    use serde_json::json;

    #[test]
    fn test_capability_slots_mirror_sections() {
        let rules = OverrideRules {
            record: Some(RuleSet::default()),
            ..Default::default()
        };
        let provider = RuleProvider::new("only_records", &rules);

        assert!(has_capability(&provider, MessageType::Record));
        assert!(!has_capability(&provider, MessageType::Schema));
        assert!(!has_capability(&provider, MessageType::State));
        assert!(!has_capability(&provider, MessageType::ActivateVersion));
    }

    #[test]
    fn test_compiled_override_applies_operations() {
        let rules = OverrideRules {
            state: Some(RuleSet {
                operations: vec![Operation::Set {
                    path: "processed".into(),
                    value: json!(true),
                }],
            }),
            ..Default::default()
        };
        let provider = RuleProvider::new("stamp_state", &rules);

        let transform = provider.override_for(MessageType::State).unwrap();
        let input = match json!({"type": "STATE", "value": {}}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let output = transform(input).unwrap();
        assert_eq!(output.get("processed"), Some(&json!(true)));
    }

    #[test]
    fn test_empty_section_is_identity_capability() {
        let rules = OverrideRules {
            record: Some(RuleSet::default()),
            ..Default::default()
        };
        let provider = RuleProvider::new("noop", &rules);
        let transform = provider.override_for(MessageType::Record).unwrap();

        let input = match json!({"type": "RECORD", "stream": "users", "record": {"id": 1}}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let output = transform(input.clone()).unwrap();
        assert_eq!(output, input);
    }
}
