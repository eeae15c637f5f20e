// Domain layer - Record model, phase enumeration and packet decoding
pub mod frame;
pub mod packet_decoder;
pub mod telemetry;
