// Packet service - Decodes raw radio strings and reports lenient fallbacks
use crate::domain::packet_decoder::{self, DecodeError, DecodedPacket};

#[derive(Debug, Clone, Default)]
pub struct PacketService;

impl PacketService {
    pub fn new() -> Self {
        Self
    }

    /// Decode a packet, logging every field that fell back to a default value.
    pub fn decode(&self, raw: &str) -> Result<DecodedPacket, DecodeError> {
        match packet_decoder::decode_with_diagnostics(raw) {
            Ok(packet) => {
                for warning in &packet.warnings {
                    tracing::warn!(
                        "Packet field {} fell back to a default (raw value {:?})",
                        warning.field.name(),
                        warning.raw
                    );
                }
                Ok(packet)
            }
            Err(e) => {
                tracing::debug!("Rejected packet {:?}: {}", raw, e);
                Err(e)
            }
        }
    }
}
