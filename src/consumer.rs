// Stream consumer: the only writer of MonitorState.
// Reads lines in order, classifies, applies, publishes; ends on a transport error.
// A finished recording leaves the last snapshot published until shutdown.

use crate::classifier::Classifier;
use crate::models::{Record, Unrecognized};
use crate::publisher::StatePublisher;
use crate::source::{LineSource, SourceError};
use crate::state::{Applied, MonitorState};
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Source, state and shutdown for the consumer task.
pub struct ConsumerDeps {
    pub source: LineSource,
    pub classifier: Classifier,
    pub state: MonitorState,
    pub publisher: StatePublisher,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct ConsumerConfig {
    /// Log every line and the state it produced.
    pub debug: bool,
    /// How often to log monitor stats at INFO level (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Classifies one line and applies it. Per-line failures never escape.
pub fn ingest_line(
    line: &str,
    classifier: &Classifier,
    state: &mut MonitorState,
    debug: bool,
) -> Applied {
    let record = classifier.classify(line);
    if let Record::Unrecognized { raw, reason } = &record {
        match reason {
            // Firmware boot banners and printf debugging land here.
            Unrecognized::TooShort | Unrecognized::UnknownTag(_) => {
                tracing::debug!(line = %raw, reason = %reason, "ignoring line");
            }
            _ => {
                tracing::warn!(line = %raw, reason = %reason, "malformed record");
            }
        }
    }
    let applied = state.apply(&record);
    if debug {
        tracing::debug!(line, ?applied, "line processed");
        tracing::debug!(
            mode = %state.mode(),
            history = ?state.history().to_vec(),
            status = state.status().status,
            action = state.status().action,
            action_color = state.status().action_color,
            badge_color = state.status().badge_color,
            "monitor state"
        );
    }
    applied
}

/// Spawns the consumer. The task returns the final state on shutdown, or the
/// transport error that ended the stream.
pub fn spawn(
    deps: ConsumerDeps,
    config: ConsumerConfig,
) -> tokio::task::JoinHandle<Result<MonitorState, SourceError>> {
    let ConsumerDeps {
        mut source,
        classifier,
        mut state,
        publisher,
        mut shutdown_rx,
    } = deps;
    let ConsumerConfig {
        debug,
        stats_log_interval_secs,
    } = config;

    let consumer_span = tracing::span!(
        tracing::Level::DEBUG,
        "consumer",
        source = source.description()
    );

    let task = async move {
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut feeding = true;

        loop {
            tokio::select! {
                result = source.next_line(), if feeding => {
                    let line = match result {
                        Ok(Some(line)) => line,
                        Ok(None) => {
                            tracing::info!(
                                records_applied = state.records_applied(),
                                "recording finished, serving last state"
                            );
                            feeding = false;
                            continue;
                        }
                        Err(e) => {
                            tracing::error!(
                                error = %e,
                                operation = "next_line",
                                "line source failed"
                            );
                            return Err(e);
                        }
                    };
                    ingest_line(&line, &classifier, &mut state, debug);
                    publisher.publish(&state);
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Consumer shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        records_applied = state.records_applied(),
                        unrecognized_lines = state.unrecognized_lines(),
                        samples_held = state.history().len(),
                        readers = publisher.reader_count(),
                        "monitor stats"
                    );
                }
            }
        }
        Ok(state)
    };

    tokio::spawn(task.instrument(consumer_span))
}
