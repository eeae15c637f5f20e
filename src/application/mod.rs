// Application layer - Simulation, sources and streaming use cases
pub mod clock;
pub mod flight_simulator;
pub mod packet_service;
pub mod record_source;
pub mod streaming_service;
