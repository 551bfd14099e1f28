//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 模拟 e2e 测试（无需外部进程）
//! - 配置与变换定义联动测试

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::Arc;

    use contracts::{Message, MessageType};
    use dispatcher::MessageDispatcher;
    use provider_factory::{MockProvider, ProviderFactory};
    use serde_json::json;
    use tokio::sync::mpsc;

    const INPUT_LINES: &[&str] = &[
        r#"{"type": "SCHEMA", "stream": "users", "schema": {"properties": {"id": {"type": "integer"}}}, "key_properties": ["id"]}"#,
        r#"{"type": "RECORD", "stream": "users", "record": {"id": 1}}"#,
        r#"{"type": "RECORD", "stream": "users", "record": {"id": 2}}"#,
        r#"{"type": "STATE", "value": {"bookmarks": {"users": 2}}}"#,
        r#"{"type": "ACTIVATE_VERSION", "stream": "users", "version": 1}"#,
    ];

    fn decode_all(lines: &[&str]) -> Vec<Message> {
        lines.iter().map(|line| Message::decode(line).unwrap()).collect()
    }

    /// End-to-end test: reader task -> channel -> dispatcher -> collected output
    ///
    /// 验证完整的数据流：
    /// 1. 读取任务按到达顺序解码消息
    /// 2. Dispatcher 逐条映射
    /// 3. 输出顺序与变体逐一对应输入
    #[tokio::test]
    async fn test_e2e_passthrough_pipeline() {
        let dispatcher = MessageDispatcher::new(Arc::new(MockProvider::default()));

        let (tx, mut rx) = mpsc::channel::<Message>(8);

        // Reader task: decode and feed in arrival order
        let reader = tokio::spawn(async move {
            for line in INPUT_LINES {
                let message = Message::decode(line).unwrap();
                if tx.send(message).await.is_err() {
                    break;
                }
            }
        });

        // Driver loop: map each message, emit before pulling the next
        let mut outputs = Vec::new();
        while let Some(message) = rx.recv().await {
            outputs.extend(dispatcher.dispatch(message).unwrap());
        }
        reader.await.unwrap();

        let inputs = decode_all(INPUT_LINES);
        assert_eq!(outputs, inputs);

        // Encoded lines decode back to the same messages
        for (output, input) in outputs.iter().zip(&inputs) {
            let line = output.encode().unwrap();
            assert_eq!(Message::decode(&line).unwrap(), *input);
        }
    }

    #[tokio::test]
    async fn test_e2e_rule_provider_state_only() {
        // Transform definition declaring a single state override
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stamp_state.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"
[state]
operations = [{ op = "set", path = "processed", value = true }]
"#,
        )
        .unwrap();

        let provider = ProviderFactory::load_from_path(&path).unwrap();
        let dispatcher = MessageDispatcher::new(Arc::new(provider));

        assert_eq!(dispatcher.capabilities().len(), 1);
        assert!(dispatcher.capabilities().contains(MessageType::State));

        let inputs = decode_all(INPUT_LINES);
        let mut outputs = Vec::new();
        for input in &inputs {
            outputs.extend(dispatcher.dispatch(input.clone()).unwrap());
        }

        assert_eq!(outputs.len(), inputs.len());

        for (input, output) in inputs.iter().zip(&outputs) {
            match output {
                // State messages gain the stamped field
                Message::State(state) => {
                    assert_eq!(state.extra.get("processed"), Some(&json!(true)));
                }
                // Every other variant passes through untouched
                other => assert_eq!(other, input),
            }
        }
    }

    #[test]
    fn test_e2e_schema_stream_rename_aborts() {
        let provider =
            MockProvider::new("rename_stream").with_override(MessageType::Schema, |mut payload| {
                payload.insert("stream".into(), json!("accounts"));
                Ok(payload)
            });
        let dispatcher = MessageDispatcher::new(Arc::new(provider));

        let inputs = decode_all(INPUT_LINES);
        let result = dispatcher.dispatch(inputs[0].clone());
        assert!(matches!(
            result,
            Err(dispatcher::DispatcherError::StreamIdentity { .. })
        ));

        // Records are unaffected by the schema capability
        let outputs = dispatcher.dispatch(inputs[1].clone()).unwrap();
        assert_eq!(outputs, vec![inputs[1].clone()]);
    }

    #[test]
    fn test_e2e_config_to_dispatch() {
        // Full plumbing: config file -> settings -> transform definition
        // -> provider -> dispatcher.
        let dir = tempfile::tempdir().unwrap();

        let transform_path = dir.path().join("transforms.toml");
        std::fs::write(
            &transform_path,
            r#"
[record]
operations = [
    { op = "remove", path = "record.password" },
    { op = "set", path = "record.scrubbed", value = true },
]
"#,
        )
        .unwrap();

        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            format!(
                "transform_path = \"{}\"\nbuffer_size = 16\n",
                transform_path.display()
            ),
        )
        .unwrap();

        let settings = config_loader::ConfigLoader::load_from_path(&config_path).unwrap();
        assert_eq!(settings.buffer_size, 16);

        let provider = ProviderFactory::load_from_path(&settings.transform_path).unwrap();
        let dispatcher = MessageDispatcher::new(Arc::new(provider));

        let input = Message::decode(
            r#"{"type": "RECORD", "stream": "users", "record": {"id": 1, "password": "hunter2"}}"#,
        )
        .unwrap();
        let outputs = dispatcher.dispatch(input).unwrap();

        match &outputs[0] {
            Message::Record(record) => {
                assert_eq!(record.record, json!({"id": 1, "scrubbed": true}));
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn test_e2e_metrics_aggregation() {
        let provider =
            MockProvider::new("stamp_records").with_override(MessageType::Record, Ok);
        let dispatcher = MessageDispatcher::new(Arc::new(provider));
        let capabilities = dispatcher.capabilities();

        let mut aggregator = observability::MessageMetricsAggregator::new();
        for input in decode_all(INPUT_LINES) {
            let overridden = capabilities.contains(input.message_type());
            for output in dispatcher.dispatch(input).unwrap() {
                aggregator.update(output.message_type(), overridden);
            }
        }

        let summary = aggregator.summary();
        assert_eq!(summary.total_messages, 5);
        assert_eq!(summary.total_overridden, 2);
        assert_eq!(summary.total_passthrough, 3);
    }
}
