//! Pipeline orchestrator - coordinates reader, dispatcher and writer.
//!
//! The reader task decodes wire lines into messages; the driver loop maps
//! each message and writes every emitted message before pulling the next,
//! so arrival order is emission order.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::Message;
use dispatcher::MessageDispatcher;
use observability::{
    record_decode_failure, record_dispatch_failure, record_message_index, record_message_mapped,
};
use provider_factory::ProviderFactory;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The mapper settings
    pub settings: contracts::MapperSettings,

    /// Input file (None = stdin)
    pub input: Option<PathBuf>,

    /// Output file (None = stdout)
    pub output: Option<PathBuf>,

    /// Maximum number of messages to map (None = unlimited)
    pub max_messages: Option<u64>,

    /// Pipeline timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Load the override provider
        info!(
            transform = %self.config.settings.transform_path.display(),
            "Loading transform definition..."
        );
        let provider = ProviderFactory::load_from_path(&self.config.settings.transform_path)
            .context("Failed to load transform definition")?;
        let dispatcher = MessageDispatcher::new(Arc::new(provider));
        let capabilities = dispatcher.capabilities();

        info!(capabilities = %capabilities, "Dispatcher ready");

        // Reader -> driver channel
        let (message_tx, mut message_rx) =
            mpsc::channel::<Message>(self.config.settings.buffer_size);
        let reader_handle = spawn_reader(self.config.input.clone(), message_tx);

        // Output sink
        let mut writer = open_writer(self.config.output.as_ref()).await?;

        let max_messages = self.config.max_messages;

        info!(max_messages = ?max_messages, "Pipeline running");

        // Driver loop: each message is fully mapped and emitted before the
        // next one is pulled.
        let driver_task = async move {
            let mut stats = PipelineStats {
                capabilities: capabilities.len(),
                ..Default::default()
            };

            while let Some(message) = message_rx.recv().await {
                stats.messages_read += 1;
                let message_type = message.message_type();
                let overridden = capabilities.contains(message_type);

                let outputs = match dispatcher.dispatch(message) {
                    Ok(outputs) => outputs,
                    Err(e) => {
                        record_dispatch_failure(message_type);
                        return Err(anyhow::Error::new(e).context("Message dispatch failed"));
                    }
                };

                for output in outputs {
                    record_message_mapped(output.message_type(), overridden);
                    stats
                        .mapping_metrics
                        .update(output.message_type(), overridden);
                    stats.messages_emitted += 1;

                    let line = output.encode().context("Failed to encode output message")?;
                    writer.write_all(line.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                }

                if let Some(max) = max_messages {
                    if stats.messages_read >= max {
                        info!(messages = stats.messages_read, "Reached max messages limit");
                        break;
                    }
                }
            }

            writer.flush().await.context("Failed to flush output")?;
            Ok::<PipelineStats, anyhow::Error>(stats)
        };

        // Run with optional timeout
        let stats = if let Some(timeout) = self.config.timeout {
            match tokio::time::timeout(timeout, driver_task).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!(timeout_secs = timeout.as_secs(), "Pipeline timed out");
                    reader_handle.abort();
                    PipelineStats::default()
                }
            }
        } else {
            driver_task.await?
        };

        // Shutdown: collect the reader's outcome; a decode failure surfaces here
        info!("Shutting down pipeline...");
        match tokio::time::timeout(Duration::from_secs(5), reader_handle).await {
            Ok(Ok(read_result)) => {
                read_result.context("Input reader failed")?;
            }
            Ok(Err(e)) if e.is_cancelled() => {}
            Ok(Err(e)) => return Err(anyhow::anyhow!("Reader task panicked: {e}")),
            Err(_) => {
                warn!("Timed out waiting for reader shutdown");
            }
        }

        let mut final_stats = stats;
        final_stats.duration = start_time.elapsed();

        info!(
            duration_secs = final_stats.duration.as_secs_f64(),
            throughput = format!("{:.2}", final_stats.throughput()),
            "Pipeline shutdown complete"
        );

        Ok(final_stats)
    }
}

/// Spawn the input reader task
fn spawn_reader(input: Option<PathBuf>, tx: mpsc::Sender<Message>) -> JoinHandle<Result<u64>> {
    tokio::spawn(async move {
        match input {
            Some(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .with_context(|| format!("Failed to open input {}", path.display()))?;
                read_messages(BufReader::new(file), tx).await
            }
            None => read_messages(BufReader::new(tokio::io::stdin()), tx).await,
        }
    })
}

/// Decode wire lines into messages, preserving arrival order.
///
/// Blank lines are skipped; an undecodable line aborts the run.
async fn read_messages<R>(reader: BufReader<R>, tx: mpsc::Sender<Message>) -> Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_number: u64 = 0;
    let mut read: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let message = match Message::decode(&line) {
            Ok(message) => message,
            Err(e) => {
                record_decode_failure();
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to decode input line {line_number}")));
            }
        };

        read += 1;
        record_message_index(read);

        if tx.send(message).await.is_err() {
            // Driver stopped (max messages); remaining input is left unread
            debug!("Driver closed the channel, reader stopping");
            break;
        }
    }

    Ok(read)
}

/// Open the output sink (file or stdout)
async fn open_writer(
    output: Option<&PathBuf>,
) -> Result<BufWriter<Box<dyn AsyncWrite + Send + Unpin>>> {
    let sink: Box<dyn AsyncWrite + Send + Unpin> = match output {
        Some(path) => Box::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("Failed to create output {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdout()),
    };
    Ok(BufWriter::new(sink))
}
