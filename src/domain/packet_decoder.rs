// Packet decoder - Turns radio text into telemetry records
// Framing: `RSSI: -89, Message: <payload>`
// Payload: `timestamp,pitch,roll,yaw,gforce,altitude,lat,lon,phase,sample_rate`

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::telemetry::{DEFAULT_SIGNAL_DBM, FlightPhase, Position, TelemetryRecord};

/// Number of comma-separated fields in a payload.
pub const PAYLOAD_FIELD_COUNT: usize = 10;

/// Errors that make a packet undecodable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Payload did not split into the expected number of fields.
    #[error("malformed field count: expected {expected} fields, got {actual}")]
    MalformedFieldCount { expected: usize, actual: usize },
}

/// Payload fields, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadField {
    Timestamp,
    Pitch,
    Roll,
    Yaw,
    GForce,
    Altitude,
    Latitude,
    Longitude,
    Phase,
    SampleRate,
}

impl PayloadField {
    pub fn name(&self) -> &'static str {
        match self {
            PayloadField::Timestamp => "timestamp",
            PayloadField::Pitch => "pitch",
            PayloadField::Roll => "roll",
            PayloadField::Yaw => "yaw",
            PayloadField::GForce => "gforce",
            PayloadField::Altitude => "altitude",
            PayloadField::Latitude => "latitude",
            PayloadField::Longitude => "longitude",
            PayloadField::Phase => "phase",
            PayloadField::SampleRate => "sampleRate",
        }
    }
}

/// A field that was accepted with a fallback value instead of its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWarning {
    pub field: PayloadField,
    pub raw: String,
}

/// A decoded record plus any lenient-fallback diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPacket {
    pub record: TelemetryRecord,
    pub warnings: Vec<FieldWarning>,
}

/// Matches receiver framing: `RSSI: <int>, Message: <rest>`
/// - Group 1: signed RSSI value
/// - Group 2: remaining payload
fn framing_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"RSSI\s*:\s*(-?\d+)\s*,\s*Message\s*:\s*(.+)").expect("valid framing regex")
    })
}

/// Decode one raw packet into a record.
pub fn decode(raw: &str) -> Result<TelemetryRecord, DecodeError> {
    decode_with_diagnostics(raw).map(|packet| packet.record)
}

/// Decode one raw packet, reporting every field that fell back to a default.
///
/// Unparseable numbers become `0.0` and unknown phase names become
/// `Landed`; both are reported as warnings but never fail the decode.
pub fn decode_with_diagnostics(raw: &str) -> Result<DecodedPacket, DecodeError> {
    let (signal, payload) = unwrap_framing(raw);

    let parts: Vec<&str> = payload.split(',').map(str::trim).collect();
    if parts.len() != PAYLOAD_FIELD_COUNT {
        return Err(DecodeError::MalformedFieldCount {
            expected: PAYLOAD_FIELD_COUNT,
            actual: parts.len(),
        });
    }

    let mut warnings = Vec::new();
    let mut number = |field: PayloadField, text: &str| -> f64 {
        text.parse::<f64>().unwrap_or_else(|_| {
            warnings.push(FieldWarning {
                field,
                raw: text.to_string(),
            });
            0.0
        })
    };

    // Integer text keeps full i64 precision; anything else truncates through f64
    let timestamp = match parts[0].parse::<i64>() {
        Ok(ms) => ms,
        // `as` saturates and maps NaN to 0
        Err(_) => number(PayloadField::Timestamp, parts[0]) as i64,
    };
    let pitch = number(PayloadField::Pitch, parts[1]);
    let roll = number(PayloadField::Roll, parts[2]);
    let yaw = number(PayloadField::Yaw, parts[3]);
    let gforce = number(PayloadField::GForce, parts[4]);
    let altitude = number(PayloadField::Altitude, parts[5]);
    let latitude = number(PayloadField::Latitude, parts[6]);
    let longitude = number(PayloadField::Longitude, parts[7]);
    let sample_rate = number(PayloadField::SampleRate, parts[9]);

    let phase = FlightPhase::from_name(parts[8]);
    if phase.name() != parts[8].to_ascii_uppercase() {
        warnings.push(FieldWarning {
            field: PayloadField::Phase,
            raw: parts[8].to_string(),
        });
    }

    let record = TelemetryRecord {
        signal,
        timestamp,
        pitch,
        roll,
        yaw,
        gforce,
        altitude,
        position: Position::new(latitude, longitude),
        phase,
        sample_rate,
    };

    Ok(DecodedPacket { record, warnings })
}

/// Split off receiver framing, returning the signal and the bare payload.
fn unwrap_framing(raw: &str) -> (i32, &str) {
    match framing_pattern().captures(raw) {
        Some(caps) => {
            let signal = caps[1].parse::<i32>().unwrap_or(DEFAULT_SIGNAL_DBM);
            let payload = caps.get(2).map_or("", |m| m.as_str()).trim();
            (signal, payload)
        }
        None => (DEFAULT_SIGNAL_DBM, raw),
    }
}
