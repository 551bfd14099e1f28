//! Protocol message types and line codec
//!
//! Messages are flat JSON objects; typed fields are kept as struct members
//! and anything else survives round-trips through the flattened `extra` map,
//! so overrides may add fields the protocol does not name.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ContractError;

/// Raw message object as handed to overrides: the full JSON mapping,
/// including the `type` discriminator.
pub type Payload = Map<String, Value>;

/// Message variant tag.
///
/// The variant set doubles as the capability vocabulary: an override
/// provider defines at most one transformation per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Schema,
    Record,
    State,
    ActivateVersion,
}

impl MessageType {
    /// All variants, in wire declaration order.
    pub const ALL: [MessageType; 4] = [
        MessageType::Schema,
        MessageType::Record,
        MessageType::State,
        MessageType::ActivateVersion,
    ];

    /// Wire discriminator (the `type` field value).
    pub fn wire_tag(&self) -> &'static str {
        match self {
            MessageType::Schema => "SCHEMA",
            MessageType::Record => "RECORD",
            MessageType::State => "STATE",
            MessageType::ActivateVersion => "ACTIVATE_VERSION",
        }
    }

    /// Capability name used in transform definitions, metrics and logs.
    pub fn capability_name(&self) -> &'static str {
        match self {
            MessageType::Schema => "schema",
            MessageType::Record => "record",
            MessageType::State => "state",
            MessageType::ActivateVersion => "activate_version",
        }
    }

    /// Parse a wire discriminator.
    pub fn from_wire_tag(tag: &str) -> Option<Self> {
        match tag {
            "SCHEMA" => Some(MessageType::Schema),
            "RECORD" => Some(MessageType::Record),
            "STATE" => Some(MessageType::State),
            "ACTIVATE_VERSION" => Some(MessageType::ActivateVersion),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.capability_name())
    }
}

/// Schema declaration for one stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMessage {
    /// Stream the schema belongs to; must never be altered by an override
    pub stream: String,

    /// JSON schema describing the stream's records
    pub schema: Value,

    /// Primary-key field names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_properties: Vec<String>,

    /// Incremental bookmark field names (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_properties: Option<Vec<String>>,

    /// Fields the protocol does not name, preserved verbatim
    #[serde(flatten)]
    pub extra: Payload,
}

/// One data row scoped to a stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMessage {
    /// Stream the row belongs to
    pub stream: String,

    /// Row data keyed by field name
    pub record: Value,

    /// Stream version the row was extracted under (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    /// Extraction timestamp, RFC 3339 (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_extracted: Option<String>,

    /// Fields the protocol does not name, preserved verbatim
    #[serde(flatten)]
    pub extra: Payload,
}

/// Checkpoint marker carrying opaque upstream bookkeeping state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMessage {
    /// Opaque state blob; downstream echoes it back on commit
    pub value: Value,

    /// Fields the protocol does not name, preserved verbatim
    #[serde(flatten)]
    pub extra: Payload,
}

/// Version-activation marker for a stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivateVersionMessage {
    /// Stream whose version becomes active
    pub stream: String,

    /// Version being activated
    pub version: i64,

    /// Fields the protocol does not name, preserved verbatim
    #[serde(flatten)]
    pub extra: Payload,
}

/// Reinterpret a payload as a specific variant, validating shape.
///
/// A `type` discriminator is optional (an override may return a bare
/// mapping) but must match the expected variant when present. Missing
/// required fields surface as `MalformedMessage`.
fn reinterpret<T: DeserializeOwned>(
    expected: MessageType,
    mut payload: Payload,
) -> Result<T, ContractError> {
    match payload.remove("type") {
        None => {}
        Some(Value::String(ref tag)) if tag == expected.wire_tag() => {}
        Some(tag) => {
            return Err(ContractError::malformed_message(
                expected,
                format!("variant discriminator changed to {tag}"),
            ));
        }
    }
    serde_json::from_value(Value::Object(payload))
        .map_err(|e| ContractError::malformed_message(expected, e.to_string()))
}

/// Serialize a variant back into a full payload with its discriminator.
fn to_payload<T: Serialize>(message_type: MessageType, message: &T) -> Payload {
    let mut payload = match serde_json::to_value(message) {
        // Message structs always serialize as JSON objects
        Ok(Value::Object(map)) => map,
        _ => Payload::new(),
    };
    payload.insert(
        "type".to_string(),
        Value::String(message_type.wire_tag().to_string()),
    );
    payload
}

impl SchemaMessage {
    /// Reinterpret an override's payload as a schema message
    pub fn from_payload(payload: Payload) -> Result<Self, ContractError> {
        reinterpret(MessageType::Schema, payload)
    }

    /// Full message object including the `type` discriminator
    pub fn into_payload(self) -> Payload {
        to_payload(MessageType::Schema, &self)
    }
}

impl RecordMessage {
    /// Reinterpret an override's payload as a record message
    pub fn from_payload(payload: Payload) -> Result<Self, ContractError> {
        reinterpret(MessageType::Record, payload)
    }

    /// Full message object including the `type` discriminator
    pub fn into_payload(self) -> Payload {
        to_payload(MessageType::Record, &self)
    }
}

impl StateMessage {
    /// Reinterpret an override's payload as a state message
    pub fn from_payload(payload: Payload) -> Result<Self, ContractError> {
        reinterpret(MessageType::State, payload)
    }

    /// Full message object including the `type` discriminator
    pub fn into_payload(self) -> Payload {
        to_payload(MessageType::State, &self)
    }
}

impl ActivateVersionMessage {
    /// Reinterpret an override's payload as a version-activation message
    pub fn from_payload(payload: Payload) -> Result<Self, ContractError> {
        reinterpret(MessageType::ActivateVersion, payload)
    }

    /// Full message object including the `type` discriminator
    pub fn into_payload(self) -> Payload {
        to_payload(MessageType::ActivateVersion, &self)
    }
}

/// Decoded protocol message
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Schema(SchemaMessage),
    Record(RecordMessage),
    State(StateMessage),
    ActivateVersion(ActivateVersionMessage),
}

impl Message {
    /// Variant tag of this message
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Schema(_) => MessageType::Schema,
            Message::Record(_) => MessageType::Record,
            Message::State(_) => MessageType::State,
            Message::ActivateVersion(_) => MessageType::ActivateVersion,
        }
    }

    /// Stream the message is scoped to, where the variant carries one
    pub fn stream(&self) -> Option<&str> {
        match self {
            Message::Schema(m) => Some(&m.stream),
            Message::Record(m) => Some(&m.stream),
            Message::ActivateVersion(m) => Some(&m.stream),
            Message::State(_) => None,
        }
    }

    /// Decode one wire line
    ///
    /// # Errors
    /// - Not valid JSON, or not a JSON object
    /// - Missing or unsupported `type` discriminator
    /// - Missing required variant fields
    pub fn decode(line: &str) -> Result<Self, ContractError> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| ContractError::codec(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Decode an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, ContractError> {
        match value {
            Value::Object(payload) => Self::from_payload(payload),
            other => Err(ContractError::codec(format!(
                "message must be a JSON object, got {other}"
            ))),
        }
    }

    /// Decode a full message object, dispatching on its discriminator
    pub fn from_payload(payload: Payload) -> Result<Self, ContractError> {
        let tag = match payload.get("type") {
            Some(Value::String(tag)) => tag.as_str(),
            Some(_) => {
                return Err(ContractError::codec("'type' discriminator must be a string"));
            }
            None => return Err(ContractError::codec("missing 'type' discriminator")),
        };
        let message_type = MessageType::from_wire_tag(tag)
            .ok_or_else(|| ContractError::codec(format!("unsupported message type '{tag}'")))?;
        match message_type {
            MessageType::Schema => SchemaMessage::from_payload(payload).map(Message::Schema),
            MessageType::Record => RecordMessage::from_payload(payload).map(Message::Record),
            MessageType::State => StateMessage::from_payload(payload).map(Message::State),
            MessageType::ActivateVersion => {
                ActivateVersionMessage::from_payload(payload).map(Message::ActivateVersion)
            }
        }
    }

    /// Full message object including the `type` discriminator
    pub fn into_payload(self) -> Payload {
        match self {
            Message::Schema(m) => m.into_payload(),
            Message::Record(m) => m.into_payload(),
            Message::State(m) => m.into_payload(),
            Message::ActivateVersion(m) => m.into_payload(),
        }
    }

    /// Encode as one wire line
    pub fn encode(&self) -> Result<String, ContractError> {
        serde_json::to_string(&Value::Object(self.clone().into_payload()))
            .map_err(|e| ContractError::codec(format!("encode failed: {e}")))
    }
}
