//! Pipeline demo with a declarative transform definition.
//!
//! Scrubs a field from records and stamps state messages; schema and
//! activate-version messages pass through.
//!
//! Run with: cargo run --bin rule_mapper_pipeline

use std::sync::Arc;

use anyhow::Result;
use contracts::Message;
use dispatcher::MessageDispatcher;
use provider_factory::{OverrideRules, RuleProvider};

const TRANSFORM_DEFINITION: &str = r#"
[record]
operations = [
    { op = "remove", path = "record.password" },
    { op = "set", path = "record.scrubbed", value = true },
]

[state]
operations = [{ op = "set", path = "processed", value = true }]
"#;

const INPUT_LINES: &[&str] = &[
    r#"{"type": "SCHEMA", "stream": "users", "schema": {"properties": {"id": {"type": "integer"}}}, "key_properties": ["id"]}"#,
    r#"{"type": "RECORD", "stream": "users", "record": {"id": 1, "password": "hunter2"}}"#,
    r#"{"type": "STATE", "value": {"bookmarks": {"users": 1}}}"#,
    r#"{"type": "ACTIVATE_VERSION", "stream": "users", "version": 1}"#,
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let rules: OverrideRules = toml::from_str(TRANSFORM_DEFINITION)?;
    let provider = RuleProvider::new("demo", &rules);
    let dispatcher = MessageDispatcher::new(Arc::new(provider));
    tracing::info!(capabilities = %dispatcher.capabilities(), "rule mapper demo starting");

    for line in INPUT_LINES {
        let message = Message::decode(line)?;
        for output in dispatcher.dispatch(message)? {
            println!("{}", output.encode()?);
        }
    }

    Ok(())
}
