// Application state for HTTP handlers
use crate::application::packet_service::PacketService;
use crate::application::streaming_service::StreamingTelemetryService;

#[derive(Clone)]
pub struct AppState {
    pub packet_service: PacketService,
    pub streaming_service: StreamingTelemetryService,
}
