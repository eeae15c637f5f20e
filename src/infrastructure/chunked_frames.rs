// Chunked frame streaming utilities
use crate::domain::frame::TelemetryFrame;
use async_compression::tokio::bufread::BrotliEncoder;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use tokio::io::AsyncReadExt;

/// Create a chunked frame streaming response.
///
/// Uncompressed bodies are newline-delimited JSON. Compressed bodies carry one
/// Brotli-compressed frame per chunk, each prefixed with its length.
pub async fn chunked_frame_stream<S>(
    stream: S,
    compress: bool,
) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = TelemetryFrame> + Send + 'static,
{
    let byte_stream = stream.then(move |frame| async move { serialize_chunk(frame, compress).await });

    let body = Body::from_stream(byte_stream);

    // Content-Encoding stays unset: chunks are compressed individually, not the whole body
    let content_type = if compress {
        "application/octet-stream"
    } else {
        "application/x-ndjson"
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single frame to a chunk
async fn serialize_chunk(frame: TelemetryFrame, compress: bool) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(&frame)?;

    if !compress {
        let mut chunk = BytesMut::with_capacity(json.len() + 1);
        chunk.put_slice(&json);
        chunk.put_u8(b'\n');
        return Ok(chunk.freeze());
    }

    let mut encoder = BrotliEncoder::new(std::io::Cursor::new(json));
    let mut payload = Vec::new();
    encoder.read_to_end(&mut payload).await?;

    // 4-byte big-endian length prefix
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(payload.len() as u32);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Helper to create a streaming response from a receiver
pub async fn stream_from_receiver(
    mut rx: tokio::sync::mpsc::Receiver<TelemetryFrame>,
    compress: bool,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        while let Some(frame) = rx.recv().await {
            yield frame;
        }
    };

    match chunked_frame_stream(stream, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::FieldSelection;
    use crate::domain::telemetry::{FlightPhase, Position, TelemetryRecord};
    use async_compression::tokio::bufread::BrotliDecoder;

    fn frame() -> TelemetryFrame {
        let record = TelemetryRecord {
            signal: -50,
            timestamp: 1_700_000_000_000,
            pitch: 90.0,
            roll: 0.0,
            yaw: 0.0,
            gforce: 1.0,
            altitude: 42.0,
            position: Position::new(37.7749, -122.4194),
            phase: FlightPhase::Apex,
            sample_rate: 10.0,
        };
        TelemetryFrame::from_record(&record, &FieldSelection::parse("altitude"))
    }

    #[tokio::test]
    async fn test_uncompressed_chunk_is_json_line() {
        let chunk = serialize_chunk(frame(), false).await.unwrap();

        assert_eq!(chunk.last(), Some(&b'\n'));
        let json: serde_json::Value = serde_json::from_slice(&chunk[..chunk.len() - 1]).unwrap();
        assert_eq!(json["fields"][1]["name"], "altitude");
        assert_eq!(json["fields"][1]["value"], 42.0);
    }

    #[tokio::test]
    async fn test_compressed_chunk_is_length_prefixed_brotli() {
        let chunk = serialize_chunk(frame(), true).await.unwrap();

        let length = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
        assert_eq!(length, chunk.len() - 4);

        let mut decoder = BrotliDecoder::new(&chunk[4..]);
        let mut json = Vec::new();
        decoder.read_to_end(&mut json).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(json["name"], "response");
    }
}
