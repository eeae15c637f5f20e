// Source traits for per-subscription telemetry producers
use crate::domain::telemetry::TelemetryRecord;
use async_trait::async_trait;

#[async_trait]
pub trait RecordSource: Send {
    /// Wait for the next record. `None` means the source has ended.
    async fn next_record(&mut self) -> Option<TelemetryRecord>;
}

#[async_trait]
pub trait RecordSourceFactory: Send + Sync {
    /// Open a fresh source owned by exactly one stream
    async fn open(&self) -> anyhow::Result<Box<dyn RecordSource>>;
}
