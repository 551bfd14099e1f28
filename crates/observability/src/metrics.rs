//! 消息映射指标收集模块
//!
//! 按消息变体统计通过/覆盖数量，供运行摘要与 Prometheus 导出使用。

use std::collections::HashMap;

use contracts::MessageType;
use metrics::{counter, gauge};

/// 记录一条完成映射的消息
///
/// 每条消息经过 Dispatcher 后调用；`overridden` 表示该变体存在覆盖。
///
/// # Example
///
/// ```ignore
/// use observability::record_message_mapped;
///
/// for output in dispatcher.dispatch(message)? {
///     record_message_mapped(output.message_type(), overridden);
/// }
/// ```
pub fn record_message_mapped(message_type: MessageType, overridden: bool) {
    let mode = if overridden { "overridden" } else { "passthrough" };

    // 总计数器
    counter!("stream_mapper_messages_total").increment(1);

    // 按变体与模式
    counter!(
        "stream_mapper_messages_mapped_total",
        "message_type" => message_type.capability_name(),
        "mode" => mode
    )
    .increment(1);
}

/// 记录输入行解码失败
pub fn record_decode_failure() {
    counter!("stream_mapper_decode_failures_total").increment(1);
}

/// 记录分发失败 (覆盖执行失败 / 结果形状非法 / stream 身份违规)
pub fn record_dispatch_failure(message_type: MessageType) {
    counter!(
        "stream_mapper_dispatch_failures_total",
        "message_type" => message_type.capability_name()
    )
    .increment(1);
}

/// 记录当前读入的消息序号 (用于检测中断位置)
pub fn record_message_index(index: u64) {
    gauge!("stream_mapper_last_message_index").set(index as f64);
}

/// 消息指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct MessageMetricsAggregator {
    /// 总消息数
    pub total_messages: u64,

    /// 被覆盖的消息数
    pub total_overridden: u64,

    /// 原样通过的消息数
    pub total_passthrough: u64,

    /// 各变体消息数
    pub type_counts: HashMap<MessageType, u64>,
}

impl MessageMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, message_type: MessageType, overridden: bool) {
        self.total_messages += 1;
        if overridden {
            self.total_overridden += 1;
        } else {
            self.total_passthrough += 1;
        }
        *self.type_counts.entry(message_type).or_insert(0) += 1;
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_messages: self.total_messages,
            total_overridden: self.total_overridden,
            total_passthrough: self.total_passthrough,
            override_rate: if self.total_messages > 0 {
                self.total_overridden as f64 / self.total_messages as f64 * 100.0
            } else {
                0.0
            },
            type_counts: MessageType::ALL
                .into_iter()
                .map(|t| (t, self.type_counts.get(&t).copied().unwrap_or(0)))
                .collect(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_messages: u64,
    pub total_overridden: u64,
    pub total_passthrough: u64,
    pub override_rate: f64,
    pub type_counts: Vec<(MessageType, u64)>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Mapping Metrics Summary ===")?;
        writeln!(f, "Total messages: {}", self.total_messages)?;
        writeln!(
            f,
            "Overridden: {} ({:.2}%)",
            self.total_overridden, self.override_rate
        )?;
        writeln!(f, "Passthrough: {}", self.total_passthrough)?;

        writeln!(f, "Per variant:")?;
        for (message_type, count) in &self.type_counts {
            writeln!(f, "  {}: {}", message_type, count)?;
        }

        Ok(())
    }
}
