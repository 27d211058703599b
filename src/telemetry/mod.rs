//! Cache telemetry events and sinks.
//!
//! The cache reports fetches, optimistic writes and revalidation decisions
//! through a [`TelemetrySink`]. Nothing is transmitted anywhere; the stderr
//! sink exists for local debugging of the synchronisation layer.

use std::io;

use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// A structured telemetry event emitted by the discussion cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A page fetch succeeded.
    PageFetched {
        /// Key of the fetched page.
        key: String,
        /// Zero-based index of the page in the sequence.
        page_index: usize,
        /// Number of top-level comments on the page.
        comment_count: usize,
    },
    /// A mutator wrote a new snapshot ahead of server confirmation.
    OptimisticWrite {
        /// Name of the mutator that wrote.
        operation: String,
        /// Version of the snapshot that was written.
        version: u64,
    },
    /// An automatic revalidation was skipped because of the stored status.
    RevalidationSuppressed {
        /// What asked for the revalidation (`mount`, `focus`, `reconnect`).
        trigger: String,
        /// Stored error status at the time of the decision.
        status: u16,
    },
    /// A failed fetch will be retried after a delay.
    ErrorRetryScheduled {
        /// Zero-based retry number.
        attempt: u32,
        /// Backoff before the retry in milliseconds.
        delay_ms: u64,
        /// Stored error status at the time of the decision.
        status: u16,
    },
    /// A revalidation finished after a newer write and was dropped.
    StaleRevalidationDiscarded {
        /// Snapshot version the revalidation started from.
        started_version: u64,
        /// Snapshot version current when it finished.
        current_version: u64,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Writes telemetry events to stderr, one JSON object per line.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let mut stderr = io::stderr().lock();
        if let Err(error) = write_jsonl(&mut stderr, &event) {
            tracing::trace!(%error, "dropping telemetry event");
        }
    }
}

/// Writes `event` to `writer` as a single JSON line.
///
/// # Errors
///
/// Returns the underlying I/O error, or serialisation failures converted
/// into one.
pub fn write_jsonl<W: io::Write>(writer: &mut W, event: &TelemetryEvent) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, event)?;
    writer.write_all(b"\n")
}
