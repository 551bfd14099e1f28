//! Declarative transform rules
//!
//! A transform definition declares at most one rule set per message
//! variant; each rule set is an ordered list of operations applied to the
//! full message object. Dotted paths address nested fields
//! (`record.amount`, `value.bookmarks.users`).

use contracts::{MessageType, Payload};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Rule application error
#[derive(Debug, Error)]
pub enum RuleError {
    /// A path segment landed on a non-object value
    #[error("path '{path}' traverses a non-object value")]
    NonObjectPath { path: String },
}

/// Transform definition: one optional rule set per message variant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverrideRules {
    /// Rules applied to SCHEMA messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<RuleSet>,

    /// Rules applied to RECORD messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<RuleSet>,

    /// Rules applied to STATE messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RuleSet>,

    /// Rules applied to ACTIVATE_VERSION messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activate_version: Option<RuleSet>,
}

impl OverrideRules {
    /// The rule set declared for a variant, if any
    pub fn rule_set(&self, message_type: MessageType) -> Option<&RuleSet> {
        match message_type {
            MessageType::Schema => self.schema.as_ref(),
            MessageType::Record => self.record.as_ref(),
            MessageType::State => self.state.as_ref(),
            MessageType::ActivateVersion => self.activate_version.as_ref(),
        }
    }

    /// Declared sections in variant order
    pub fn sections(&self) -> impl Iterator<Item = (MessageType, &RuleSet)> {
        MessageType::ALL
            .into_iter()
            .filter_map(|message_type| self.rule_set(message_type).map(|rs| (message_type, rs)))
    }

    /// True when no variant declares a rule set
    pub fn is_empty(&self) -> bool {
        self.sections().next().is_none()
    }
}

/// Ordered operations for one message variant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    /// Operations, applied in declaration order
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl RuleSet {
    /// Apply all operations to a message object, in order
    pub fn apply(&self, mut payload: Payload) -> Result<Payload, RuleError> {
        for operation in &self.operations {
            payload = operation.apply(payload)?;
        }
        Ok(payload)
    }
}

/// A single payload operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Set the field at `path` to `value`, creating intermediate objects
    Set { path: String, value: Value },

    /// Remove the field at `path`; missing paths are a no-op
    Remove { path: String },

    /// Move the field at `from` to `to`; missing source is a no-op
    Rename { from: String, to: String },

    /// Copy the field at `from` to `to`; missing source is a no-op
    Copy { from: String, to: String },
}

impl Operation {
    fn apply(&self, mut payload: Payload) -> Result<Payload, RuleError> {
        match self {
            Operation::Set { path, value } => {
                set_path(&mut payload, path, value.clone())?;
            }
            Operation::Remove { path } => {
                remove_path(&mut payload, path);
            }
            Operation::Rename { from, to } => {
                if let Some(value) = remove_path(&mut payload, from) {
                    set_path(&mut payload, to, value)?;
                }
            }
            Operation::Copy { from, to } => {
                if let Some(value) = get_path(&payload, from).cloned() {
                    set_path(&mut payload, to, value)?;
                }
            }
        }
        Ok(payload)
    }
}

fn split(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

/// Look up a dotted path
fn get_path<'a>(root: &'a Payload, path: &str) -> Option<&'a Value> {
    let segments = split(path);
    let (first, rest) = segments.split_first()?;
    let mut current = root.get(*first)?;
    for segment in rest {
        current = current.as_object()?.get(*segment)?;
    }
    Some(current)
}

/// Set a dotted path, creating intermediate objects as needed
fn set_path(root: &mut Payload, path: &str, value: Value) -> Result<(), RuleError> {
    let segments = split(path);
    let Some((last, parents)) = segments.split_last() else {
        return Err(RuleError::NonObjectPath { path: path.into() });
    };

    let mut current = root;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Payload::new()));
        current = match entry.as_object_mut() {
            Some(map) => map,
            None => return Err(RuleError::NonObjectPath { path: path.into() }),
        };
    }
    current.insert(last.to_string(), value);
    Ok(())
}

/// Remove a dotted path, returning the removed value
fn remove_path(root: &mut Payload, path: &str) -> Option<Value> {
    let segments = split(path);
    let (last, parents) = segments.split_last()?;

    let mut current = root;
    for segment in parents {
        current = current.get_mut(*segment)?.as_object_mut()?;
    }
    current.remove(*last)
}
