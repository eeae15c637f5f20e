// HTTP request handlers
use crate::domain::frame::FieldSelection;
use crate::domain::packet_decoder::FieldWarning;
use crate::domain::telemetry::TelemetryRecord;
use crate::infrastructure::chunked_frames::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct StreamQuery {
    /// Comma-separated field allow-list; empty or missing means all fields.
    pub fields: Option<String>,
}

#[derive(Serialize)]
pub struct DecodedPacketBody {
    pub record: TelemetryRecord,
    pub warnings: Vec<WarningBody>,
}

#[derive(Serialize)]
pub struct WarningBody {
    pub field: &'static str,
    pub raw: String,
}

impl From<FieldWarning> for WarningBody {
    fn from(warning: FieldWarning) -> Self {
        Self {
            field: warning.field.name(),
            raw: warning.raw,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Stream telemetry frames from a dedicated source
pub async fn stream_telemetry(
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let selection = query
        .fields
        .as_deref()
        .map(FieldSelection::parse)
        .unwrap_or_default();

    match state.streaming_service.stream(selection).await {
        Ok(rx) => stream_from_receiver(rx, accepts_brotli(&headers))
            .await
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to open telemetry source: {:#}", e);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// Decode a single raw radio packet
pub async fn decode_packet(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: String,
) -> Response {
    let compress = accepts_brotli(&headers);

    let result = match state.packet_service.decode(&body) {
        Ok(packet) => {
            let body = DecodedPacketBody {
                record: packet.record,
                warnings: packet.warnings.into_iter().map(WarningBody::from).collect(),
            };
            json_response(StatusCode::OK, &body, compress).await
        }
        Err(e) => {
            let body = ErrorBody {
                error: e.to_string(),
            };
            json_response(StatusCode::UNPROCESSABLE_ENTITY, &body, compress).await
        }
    };

    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
