//! Minimal pipeline demo: no overrides, every message passes through.
//!
//! Run with: cargo run --bin passthrough_pipeline

use std::sync::Arc;

use anyhow::Result;
use contracts::Message;
use dispatcher::MessageDispatcher;
use provider_factory::MockProvider;

const INPUT_LINES: &[&str] = &[
    r#"{"type": "SCHEMA", "stream": "users", "schema": {"properties": {"id": {"type": "integer"}}}, "key_properties": ["id"]}"#,
    r#"{"type": "RECORD", "stream": "users", "record": {"id": 1, "name": "ada"}}"#,
    r#"{"type": "RECORD", "stream": "users", "record": {"id": 2, "name": "grace"}}"#,
    r#"{"type": "STATE", "value": {"bookmarks": {"users": 2}}}"#,
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    // A provider with no capabilities: identity for every variant
    let dispatcher = MessageDispatcher::new(Arc::new(MockProvider::default()));
    tracing::info!(capabilities = %dispatcher.capabilities(), "passthrough demo starting");

    for line in INPUT_LINES {
        let message = Message::decode(line)?;
        for output in dispatcher.dispatch(message)? {
            println!("{}", output.encode()?);
        }
    }

    Ok(())
}
