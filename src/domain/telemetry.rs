// Telemetry record domain model
use serde::Serialize;

/// Signal strength reported when the link quality is unknown.
pub const DEFAULT_SIGNAL_DBM: i32 = -50;

/// Discrete flight phase of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightPhase {
    Landed,
    Launching,
    Apex,
    Descending,
    Calibration,
}

impl FlightPhase {
    #[cfg(test)]
    pub const ALL: [FlightPhase; 5] = [
        FlightPhase::Landed,
        FlightPhase::Launching,
        FlightPhase::Apex,
        FlightPhase::Descending,
        FlightPhase::Calibration,
    ];

    /// Resolve a wire phase name, case-insensitively.
    /// Anything unrecognised (including empty text) resolves to `Landed`.
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or(FlightPhase::Landed)
    }

    fn lookup(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "LANDED" => Some(FlightPhase::Landed),
            "LAUNCHING" => Some(FlightPhase::Launching),
            "APEX" => Some(FlightPhase::Apex),
            "DESCENDING" => Some(FlightPhase::Descending),
            "CALIBRATION" => Some(FlightPhase::Calibration),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FlightPhase::Landed => "LANDED",
            FlightPhase::Launching => "LAUNCHING",
            FlightPhase::Apex => "APEX",
            FlightPhase::Descending => "DESCENDING",
            FlightPhase::Calibration => "CALIBRATION",
        }
    }

    /// Integer code relayed to downstream consumers.
    pub fn code(&self) -> i64 {
        match self {
            FlightPhase::Landed => 0,
            FlightPhase::Launching => 1,
            FlightPhase::Apex => 2,
            FlightPhase::Descending => 3,
            FlightPhase::Calibration => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One flight sample, as emitted by the simulator or decoded from the radio link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRecord {
    pub signal: i32,
    pub timestamp: i64,
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
    pub gforce: f64,
    pub altitude: f64,
    pub position: Position,
    pub phase: FlightPhase,
    pub sample_rate: f64,
}

impl TelemetryRecord {
    /// Encode the ten payload fields in wire order, without framing.
    pub fn to_payload(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{}",
            self.timestamp,
            self.pitch,
            self.roll,
            self.yaw,
            self.gforce,
            self.altitude,
            self.position.latitude,
            self.position.longitude,
            self.phase.name(),
            self.sample_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_from_name() {
        assert_eq!(FlightPhase::from_name("apex"), FlightPhase::Apex);
        assert_eq!(FlightPhase::from_name(" Descending "), FlightPhase::Descending);
        assert_eq!(FlightPhase::from_name("CALIBRATION"), FlightPhase::Calibration);
        assert_eq!(FlightPhase::from_name("FOO"), FlightPhase::Landed);
        assert_eq!(FlightPhase::from_name(""), FlightPhase::Landed);
    }

    #[test]
    fn test_phase_codes_and_names() {
        let codes: Vec<i64> = FlightPhase::ALL.iter().map(|p| p.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4]);

        for phase in FlightPhase::ALL {
            assert_eq!(FlightPhase::lookup(phase.name()), Some(phase));
        }
    }

    #[test]
    fn test_to_payload() {
        let record = TelemetryRecord {
            signal: -70,
            timestamp: 1_700_000_000_000,
            pitch: 90.0,
            roll: 0.0,
            yaw: 1.5,
            gforce: 1.2,
            altitude: 350.25,
            position: Position::new(37.7749, -122.4194),
            phase: FlightPhase::Launching,
            sample_rate: 10.0,
        };

        assert_eq!(
            record.to_payload(),
            "1700000000000,90,0,1.5,1.2,350.25,37.7749,-122.4194,LAUNCHING,10"
        );
    }

    #[test]
    fn test_record_serializes_phase_by_name() {
        let record = TelemetryRecord {
            signal: DEFAULT_SIGNAL_DBM,
            timestamp: 0,
            pitch: 0.0,
            roll: 0.0,
            yaw: 0.0,
            gforce: 1.0,
            altitude: 0.0,
            position: Position::new(0.0, 0.0),
            phase: FlightPhase::Descending,
            sample_rate: 10.0,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["phase"], "DESCENDING");
        assert_eq!(json["sampleRate"], 10.0);
        assert_eq!(json["position"]["latitude"], 0.0);
    }
}
