//! Test sinks — `ProgressSink` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use chambers_core::sink::{ProgressRecord, ProgressSink, SinkError};

/// A sink that records every dispatched progress record.
#[derive(Debug, Default)]
pub struct RecordingProgressSink {
    records: Mutex<Vec<ProgressRecord>>,
}

impl RecordingProgressSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every record received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn records(&self) -> Vec<ProgressRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressSink for RecordingProgressSink {
    async fn record(&self, record: &ProgressRecord) -> Result<(), SinkError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// A sink that rejects every record. Useful for verifying that sink
/// failures never fail the transition.
#[derive(Debug, Default)]
pub struct FailingProgressSink;

#[async_trait]
impl ProgressSink for FailingProgressSink {
    async fn record(&self, _record: &ProgressRecord) -> Result<(), SinkError> {
        Err(SinkError("telemetry endpoint unavailable".into()))
    }
}
