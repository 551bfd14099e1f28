//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::MessageMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total messages read from the input
    pub messages_read: u64,

    /// Total messages written to the output
    pub messages_emitted: u64,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Number of capabilities the provider defines
    pub capabilities: usize,

    /// Mapping metrics aggregator
    pub mapping_metrics: MessageMetricsAggregator,
}

impl PipelineStats {
    /// Calculate messages per second throughput
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.messages_emitted as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
        eprintln!("║                    Pipeline Statistics                       ║");
        eprintln!("╚══════════════════════════════════════════════════════════════╝\n");

        eprintln!("📊 Overview");
        eprintln!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        eprintln!("   ├─ Messages read: {}", self.messages_read);
        eprintln!("   ├─ Messages emitted: {}", self.messages_emitted);
        eprintln!("   ├─ Throughput: {:.2} msg/s", self.throughput());
        eprintln!("   └─ Capabilities: {}", self.capabilities);

        let summary = self.mapping_metrics.summary();

        eprintln!("\n📈 Mapping Metrics");
        eprintln!("   ├─ Overridden: {}", summary.total_overridden);
        eprintln!("   ├─ Passthrough: {}", summary.total_passthrough);
        eprintln!("   └─ Override rate: {:.2}%", summary.override_rate);

        eprintln!("\n📬 Per Variant");
        for (i, (message_type, count)) in summary.type_counts.iter().enumerate() {
            let prefix = if i == summary.type_counts.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            eprintln!("   {} {}: {}", prefix, message_type, count);
        }

        eprintln!();
    }
}
