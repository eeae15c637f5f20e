// Radio record source - Decodes newline-delimited packets from the receiver
use crate::application::record_source::{RecordSource, RecordSourceFactory};
use crate::domain::packet_decoder;
use crate::domain::telemetry::TelemetryRecord;
use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::SplitStream;

pub struct RadioLineSource<R> {
    lines: SplitStream<R>,
}

impl<R: AsyncBufRead + Unpin + Send> RadioLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: SplitStream::new(reader.split(b'\n')),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> RecordSource for RadioLineSource<R> {
    async fn next_record(&mut self) -> Option<TelemetryRecord> {
        while let Some(line) = self.lines.next().await {
            let bytes = match line {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Radio link read failed: {}", e);
                    return None;
                }
            };
            // Link noise is not valid UTF-8; let the decoder reject it
            let line = String::from_utf8_lossy(&bytes);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match packet_decoder::decode(line) {
                Ok(record) => return Some(record),
                Err(e) => tracing::warn!("Dropping radio packet {:?}: {}", line, e),
            }
        }
        None
    }
}

pub struct RadioSourceFactory {
    address: String,
}

impl RadioSourceFactory {
    pub fn new(address: String) -> Self {
        Self { address }
    }
}

#[async_trait]
impl RecordSourceFactory for RadioSourceFactory {
    async fn open(&self) -> anyhow::Result<Box<dyn RecordSource>> {
        let stream = TcpStream::connect(&self.address)
            .await
            .with_context(|| format!("Failed to connect to radio bridge at {}", self.address))?;
        tracing::info!("Connected to radio bridge at {}", self.address);

        Ok(Box::new(RadioLineSource::new(BufReader::new(stream))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::FlightPhase;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    const LINES: &str = "RSSI: -89, Message: 1000,90,0,0,1.0,10,37.7,-122.4,LAUNCHING,10\n\
        \n\
        garbage line\n\
        2000,90,0,0,1.0,N/A,37.7,-122.4,apex,10\n";

    #[tokio::test]
    async fn test_skips_blank_and_undecodable_lines() {
        let mut source = RadioLineSource::new(LINES.as_bytes());

        let first = source.next_record().await.unwrap();
        assert_eq!(first.signal, -89);
        assert_eq!(first.timestamp, 1000);
        assert_eq!(first.altitude, 10.0);
        assert_eq!(first.phase, FlightPhase::Launching);

        let second = source.next_record().await.unwrap();
        assert_eq!(second.timestamp, 2000);
        assert_eq!(second.altitude, 0.0);
        assert_eq!(second.phase, FlightPhase::Apex);

        assert!(source.next_record().await.is_none());
    }

    #[tokio::test]
    async fn test_noisy_bytes_do_not_end_the_source() {
        let mut input = b"RSSI: -89, \xff\xfe noise\n".to_vec();
        input.extend_from_slice(b"\xc3\x28 1,2,3\r\n");
        input.extend_from_slice(b"RSSI: -70, Message: 3000,90,0,0,1.0,5,37.7,-122.4,DESCENDING,10\r\n");
        let mut source = RadioLineSource::new(input.as_slice());

        let record = source.next_record().await.unwrap();
        assert_eq!(record.signal, -70);
        assert_eq!(record.timestamp, 3000);
        assert_eq!(record.sample_rate, 10.0);
        assert_eq!(record.phase, FlightPhase::Descending);

        assert!(source.next_record().await.is_none());
    }

    #[tokio::test]
    async fn test_factory_reads_from_tcp_bridge() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(LINES.as_bytes()).await.unwrap();
        });

        let factory = RadioSourceFactory::new(address);
        let mut source = factory.open().await.unwrap();

        assert_eq!(source.next_record().await.unwrap().timestamp, 1000);
        assert_eq!(source.next_record().await.unwrap().timestamp, 2000);
        assert!(source.next_record().await.is_none());
    }

    #[tokio::test]
    async fn test_factory_reports_connect_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let factory = RadioSourceFactory::new(address);
        let err = factory.open().await.err().unwrap();
        assert!(err.to_string().contains("radio bridge"));
    }
}
