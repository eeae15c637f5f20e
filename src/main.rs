// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::packet_service::PacketService;
use crate::application::record_source::RecordSourceFactory;
use crate::application::streaming_service::StreamingTelemetryService;
use crate::infrastructure::config::{load_app_config, SourceKind};
use crate::infrastructure::radio_source::RadioSourceFactory;
use crate::infrastructure::simulated_source::SimulatedSourceFactory;
use crate::infrastructure::system_clock::SystemClock;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{decode_packet, health_check, stream_telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create record sources (infrastructure layer)
    let sources: Arc<dyn RecordSourceFactory> = match config.source.kind {
        SourceKind::Simulator => Arc::new(SimulatedSourceFactory::new(
            Arc::new(SystemClock),
            Duration::from_millis(config.stream.interval_ms),
        )),
        SourceKind::Radio => {
            let address = config
                .source
                .radio_address
                .clone()
                .context("source.radio_address is not set")?;
            Arc::new(RadioSourceFactory::new(address))
        }
    };
    tracing::info!("Using {:?} telemetry source", config.source.kind);

    // Create services (application layer)
    let packet_service = PacketService::new();
    let streaming_service =
        StreamingTelemetryService::new(sources, config.stream.channel_capacity);

    // Create application state
    let state = Arc::new(AppState {
        packet_service,
        streaming_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/stream", get(stream_telemetry))
        .route("/packets/decode", post(decode_packet))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server_address()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_address()))?;
    tracing::info!("Starting rocket-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
