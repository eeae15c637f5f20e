// Infrastructure layer - External dependencies and adapters
pub mod chunked_frames;
pub mod config;
pub mod http_response;
pub mod radio_source;
pub mod simulated_source;
pub mod system_clock;
