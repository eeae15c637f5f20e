// Streaming telemetry service - Relays records from a source as field frames
use crate::application::record_source::RecordSourceFactory;
use crate::domain::frame::{FieldSelection, TelemetryFrame};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct StreamingTelemetryService {
    sources: Arc<dyn RecordSourceFactory>,
    channel_capacity: usize,
}

impl StreamingTelemetryService {
    pub fn new(sources: Arc<dyn RecordSourceFactory>, channel_capacity: usize) -> Self {
        Self {
            sources,
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Open a dedicated source and forward each of its records as a frame.
    ///
    /// The forwarding task stops when the receiver is dropped or the source ends.
    pub async fn stream(
        &self,
        selection: FieldSelection,
    ) -> anyhow::Result<mpsc::Receiver<TelemetryFrame>> {
        let mut source = self.sources.open().await?;
        let (tx, rx) = mpsc::channel(self.channel_capacity);

        tracing::info!("Starting stream, fields: {:?}", selection);

        tokio::spawn(async move {
            let mut sent: u64 = 0;
            loop {
                let record = tokio::select! {
                    _ = tx.closed() => {
                        tracing::info!("Subscriber went away after {} frames", sent);
                        break;
                    }
                    record = source.next_record() => record,
                };

                let Some(record) = record else {
                    tracing::info!("Source ended after {} frames", sent);
                    break;
                };

                let frame = TelemetryFrame::from_record(&record, &selection);
                if tx.send(frame).await.is_err() {
                    tracing::info!("Subscriber went away after {} frames", sent);
                    break;
                }
                sent += 1;
            }
        });

        Ok(rx)
    }
}
