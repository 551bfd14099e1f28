//! Message Dispatcher - override resolution per message variant
//!
//! One entry point per variant, so the stream-identity invariant is a
//! structural fact of the schema path rather than a tag check every
//! routine must remember. Each entry point returns the emitted messages
//! in order; the sequence signature reserves fan-out, today every input
//! yields exactly one output.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use contracts::{
    ActivateVersionMessage, Message, MessageType, OverrideProvider, RecordMessage, SchemaMessage,
    StateMessage,
};

use crate::error::DispatcherError;
use crate::probe::CapabilitySet;

/// Routes decoded messages through the provider's overrides.
///
/// Stateless across messages: holds only the injected provider (shared,
/// read-only) and the capability set probed at construction.
pub struct MessageDispatcher {
    provider: Arc<dyn OverrideProvider>,
    capabilities: CapabilitySet,
}

impl MessageDispatcher {
    /// Create a dispatcher, probing the provider's capability slots once
    pub fn new(provider: Arc<dyn OverrideProvider>) -> Self {
        let capabilities = CapabilitySet::probe(provider.as_ref());
        info!(
            provider = %provider.name(),
            capabilities = %capabilities,
            "Dispatcher created"
        );
        Self {
            provider,
            capabilities,
        }
    }

    /// Capability set probed at construction
    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    /// Route one decoded message to its variant entry point
    pub fn dispatch(&self, message: Message) -> Result<Vec<Message>, DispatcherError> {
        match message {
            Message::Schema(msg) => self.map_schema(msg),
            Message::Record(msg) => self.map_record(msg),
            Message::State(msg) => self.map_state(msg),
            Message::ActivateVersion(msg) => self.map_activate_version(msg),
        }
    }

    /// Map a schema message to zero or more schema messages.
    ///
    /// The stream identifier must survive any override; records that
    /// follow are filed under the original stream name, so a changed
    /// identifier aborts the run instead of being forwarded.
    #[instrument(name = "dispatch_schema", skip(self, msg), fields(stream = %msg.stream))]
    pub fn map_schema(&self, msg: SchemaMessage) -> Result<Vec<Message>, DispatcherError> {
        let Some(transform) = self.provider.override_for(MessageType::Schema) else {
            return Ok(vec![Message::Schema(msg)]);
        };

        let expected = msg.stream.clone();
        let result = transform(msg.into_payload())
            .map_err(|source| DispatcherError::override_failed(MessageType::Schema, source))?;
        let transformed = SchemaMessage::from_payload(result)?;

        if transformed.stream != expected {
            return Err(DispatcherError::StreamIdentity {
                expected,
                altered: transformed.stream,
            });
        }

        debug!(stream = %transformed.stream, "schema message overridden");
        Ok(vec![Message::Schema(transformed)])
    }

    /// Map a record message to zero or more record messages
    #[instrument(name = "dispatch_record", skip(self, msg), fields(stream = %msg.stream))]
    pub fn map_record(&self, msg: RecordMessage) -> Result<Vec<Message>, DispatcherError> {
        let Some(transform) = self.provider.override_for(MessageType::Record) else {
            return Ok(vec![Message::Record(msg)]);
        };

        let result = transform(msg.into_payload())
            .map_err(|source| DispatcherError::override_failed(MessageType::Record, source))?;
        let transformed = RecordMessage::from_payload(result)?;
        Ok(vec![Message::Record(transformed)])
    }

    /// Map a state message to zero or more state messages
    #[instrument(name = "dispatch_state", skip(self, msg))]
    pub fn map_state(&self, msg: StateMessage) -> Result<Vec<Message>, DispatcherError> {
        let Some(transform) = self.provider.override_for(MessageType::State) else {
            return Ok(vec![Message::State(msg)]);
        };

        let result = transform(msg.into_payload())
            .map_err(|source| DispatcherError::override_failed(MessageType::State, source))?;
        let transformed = StateMessage::from_payload(result)?;
        Ok(vec![Message::State(transformed)])
    }

    /// Map a version-activation message to zero or more of the same
    #[instrument(
        name = "dispatch_activate_version",
        skip(self, msg),
        fields(stream = %msg.stream)
    )]
    pub fn map_activate_version(
        &self,
        msg: ActivateVersionMessage,
    ) -> Result<Vec<Message>, DispatcherError> {
        let Some(transform) = self.provider.override_for(MessageType::ActivateVersion) else {
            return Ok(vec![Message::ActivateVersion(msg)]);
        };

        let result = transform(msg.into_payload()).map_err(|source| {
            DispatcherError::override_failed(MessageType::ActivateVersion, source)
        })?;
        let transformed = ActivateVersionMessage::from_payload(result)?;
        Ok(vec![Message::ActivateVersion(transformed)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ContractError, Payload};
    use provider_factory::MockProvider;
    use serde_json::{json, Value};

    fn schema_msg(stream: &str) -> SchemaMessage {
        SchemaMessage {
            stream: stream.to_string(),
            schema: json!({"properties": {"id": {"type": "integer"}}}),
            key_properties: vec!["id".to_string()],
            bookmark_properties: None,
            extra: Payload::new(),
        }
    }

    fn record_msg(stream: &str, record: Value) -> RecordMessage {
        RecordMessage {
            stream: stream.to_string(),
            record,
            version: None,
            time_extracted: None,
            extra: Payload::new(),
        }
    }

    fn state_msg(value: Value) -> StateMessage {
        StateMessage {
            value,
            extra: Payload::new(),
        }
    }

    fn activate_msg(stream: &str, version: i64) -> ActivateVersionMessage {
        ActivateVersionMessage {
            stream: stream.to_string(),
            version,
            extra: Payload::new(),
        }
    }

    fn dispatcher(provider: MockProvider) -> MessageDispatcher {
        MessageDispatcher::new(Arc::new(provider))
    }

    #[test]
    fn test_identity_default_for_all_variants() {
        let dispatcher = dispatcher(MockProvider::default());
        assert!(dispatcher.capabilities().is_empty());

        let inputs = vec![
            Message::Schema(schema_msg("users")),
            Message::Record(record_msg("users", json!({"id": 1}))),
            Message::State(state_msg(json!({"bookmark": 1}))),
            Message::ActivateVersion(activate_msg("users", 3)),
        ];

        for input in inputs {
            let outputs = dispatcher.dispatch(input.clone()).unwrap();
            assert_eq!(outputs, vec![input]);
        }
    }

    #[test]
    fn test_schema_override_same_stream_is_emitted() {
        let provider =
            MockProvider::new("add_property").with_override(MessageType::Schema, |mut payload| {
                payload["schema"]["properties"]["added"] = json!({"type": "string"});
                Ok(payload)
            });
        let dispatcher = dispatcher(provider);

        let outputs = dispatcher.map_schema(schema_msg("users")).unwrap();
        assert_eq!(outputs.len(), 1);
        match &outputs[0] {
            Message::Schema(schema) => {
                assert_eq!(schema.stream, "users");
                assert_eq!(
                    schema.schema["properties"]["added"],
                    json!({"type": "string"})
                );
            }
            other => panic!("expected schema, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_override_changing_stream_is_fatal() {
        let provider =
            MockProvider::new("rename_stream").with_override(MessageType::Schema, |mut payload| {
                payload.insert("stream".into(), json!("accounts"));
                Ok(payload)
            });
        let dispatcher = dispatcher(provider);

        let result = dispatcher.map_schema(schema_msg("users"));
        match result {
            Err(DispatcherError::StreamIdentity { expected, altered }) => {
                assert_eq!(expected, "users");
                assert_eq!(altered, "accounts");
            }
            other => panic!("expected stream identity error, got {other:?}"),
        }
    }

    #[test]
    fn test_record_override_applies() {
        let provider =
            MockProvider::new("stamp_records").with_override(MessageType::Record, |mut payload| {
                payload["record"]["stamped"] = json!(true);
                Ok(payload)
            });
        let dispatcher = dispatcher(provider);

        let outputs = dispatcher
            .map_record(record_msg("users", json!({"id": 1})))
            .unwrap();
        match &outputs[0] {
            Message::Record(record) => {
                assert_eq!(record.record, json!({"id": 1, "stamped": true}));
                assert_eq!(record.stream, "users");
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn test_capability_independence() {
        // A state-only override must not affect any other variant.
        let provider =
            MockProvider::new("state_only").with_override(MessageType::State, |mut payload| {
                payload.insert("processed".into(), json!(true));
                Ok(payload)
            });
        let dispatcher = dispatcher(provider);

        let schema_in = Message::Schema(schema_msg("users"));
        assert_eq!(
            dispatcher.dispatch(schema_in.clone()).unwrap(),
            vec![schema_in]
        );

        let record_in = Message::Record(record_msg("users", json!({"id": 1})));
        assert_eq!(
            dispatcher.dispatch(record_in.clone()).unwrap(),
            vec![record_in]
        );

        let activate_in = Message::ActivateVersion(activate_msg("users", 1));
        assert_eq!(
            dispatcher.dispatch(activate_in.clone()).unwrap(),
            vec![activate_in]
        );

        let outputs = dispatcher.map_state(state_msg(json!({"b": 1}))).unwrap();
        match &outputs[0] {
            Message::State(state) => {
                assert_eq!(state.extra.get("processed"), Some(&json!(true)));
                assert_eq!(state.value, json!({"b": 1}));
            }
            other => panic!("expected state, got {other:?}"),
        }
    }

    #[test]
    fn test_override_failure_propagates() {
        let provider = MockProvider::new("broken")
            .with_override(MessageType::Record, |_| Err("user code exploded".into()));
        let dispatcher = dispatcher(provider);

        let result = dispatcher.map_record(record_msg("users", json!({"id": 1})));
        match result {
            Err(DispatcherError::Override { message_type, source }) => {
                assert_eq!(message_type, MessageType::Record);
                assert_eq!(source.to_string(), "user code exploded");
            }
            other => panic!("expected override error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_override_result() {
        // Dropping the required `record` field makes the result
        // uninterpretable as a record message.
        let provider =
            MockProvider::new("drops_record").with_override(MessageType::Record, |mut payload| {
                payload.remove("record");
                Ok(payload)
            });
        let dispatcher = dispatcher(provider);

        let result = dispatcher.map_record(record_msg("users", json!({"id": 1})));
        assert!(matches!(
            result,
            Err(DispatcherError::Contract(
                ContractError::MalformedMessage { .. }
            ))
        ));
    }

    #[test]
    fn test_dispatch_preserves_order_and_variants() {
        let provider =
            MockProvider::new("stamp_records").with_override(MessageType::Record, |mut payload| {
                payload["record"]["stamped"] = json!(true);
                Ok(payload)
            });
        let dispatcher = dispatcher(provider);

        let inputs = vec![
            Message::Schema(schema_msg("users")),
            Message::Record(record_msg("users", json!({"id": 1}))),
            Message::Record(record_msg("users", json!({"id": 2}))),
            Message::State(state_msg(json!({"bookmark": 2}))),
            Message::ActivateVersion(activate_msg("users", 1)),
        ];

        let mut outputs = Vec::new();
        for input in &inputs {
            outputs.extend(dispatcher.dispatch(input.clone()).unwrap());
        }

        assert_eq!(outputs.len(), inputs.len());
        let in_types: Vec<MessageType> = inputs.iter().map(Message::message_type).collect();
        let out_types: Vec<MessageType> = outputs.iter().map(Message::message_type).collect();
        assert_eq!(in_types, out_types);

        match &outputs[2] {
            Message::Record(record) => {
                assert_eq!(record.record, json!({"id": 2, "stamped": true}));
            }
            other => panic!("expected record, got {other:?}"),
        }
    }
}
