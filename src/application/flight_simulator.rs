// Flight simulator - Synthesizes telemetry for one looping flight cycle
use crate::application::clock::Clock;
use crate::domain::telemetry::{DEFAULT_SIGNAL_DBM, FlightPhase, Position, TelemetryRecord};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Simulated seconds per `advance()`, independent of real call spacing.
pub const TIME_STEP_S: f64 = 0.5;

/// Gravitational acceleration in m/s².
pub const GRAVITY: f64 = 9.8;

/// Vertical velocity given at launch, in m/s.
pub const LAUNCH_VELOCITY: f64 = 150.0;

/// Slowest descent under parachute, in m/s (negative is downwards).
pub const TERMINAL_VELOCITY: f64 = -10.0;

/// Wall-clock dwell on the pad before each launch.
pub const LANDED_DWELL: Duration = Duration::seconds(5);

/// Launch site every flight starts from and returns to.
pub const ORIGIN: Position = Position::new(37.7749, -122.4194);

/// Degrees of latitude and longitude drifted per simulated second in flight.
pub const DRIFT_DEG_PER_S: f64 = 0.0001;

const PITCH_DEG: f64 = 90.0;
const SAMPLE_RATE: f64 = 10.0;

/// Single-owner state machine advancing LANDED → LAUNCHING → APEX → DESCENDING → LANDED.
pub struct FlightSimulator {
    clock: Arc<dyn Clock>,
    phase: FlightPhase,
    altitude: f64,
    velocity: f64,
    position: Position,
    phase_started: DateTime<Utc>,
}

impl FlightSimulator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let phase_started = clock.now();
        Self {
            clock,
            phase: FlightPhase::Landed,
            altitude: 0.0,
            velocity: 0.0,
            position: ORIGIN,
            phase_started,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    #[cfg(test)]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Step the simulation by `TIME_STEP_S` and emit the resulting sample.
    pub fn advance(&mut self) -> TelemetryRecord {
        let dt = TIME_STEP_S;
        let now = self.clock.now();

        match self.phase {
            FlightPhase::Landed => {
                if now - self.phase_started > LANDED_DWELL {
                    self.phase = FlightPhase::Launching;
                    self.velocity = LAUNCH_VELOCITY;
                    tracing::debug!("Simulated launch at {}", now);
                }
            }
            FlightPhase::Launching => {
                self.altitude += self.velocity * dt;
                self.velocity -= GRAVITY * dt;
                if self.velocity <= 0.0 {
                    self.phase = FlightPhase::Apex;
                    tracing::debug!("Simulated apex at {:.1} m", self.altitude);
                }
            }
            FlightPhase::Apex => {
                self.phase = FlightPhase::Descending;
            }
            FlightPhase::Descending => {
                self.velocity = (self.velocity - GRAVITY * dt).max(TERMINAL_VELOCITY);
                self.altitude += self.velocity * dt;
                if self.altitude <= 0.0 {
                    self.altitude = 0.0;
                    self.velocity = 0.0;
                    self.phase = FlightPhase::Landed;
                    self.phase_started = now;
                    self.position = ORIGIN;
                    tracing::debug!("Simulated landing at {}", now);
                }
            }
            // Only reachable through decoded packets
            FlightPhase::Calibration => {}
        }

        if matches!(
            self.phase,
            FlightPhase::Launching | FlightPhase::Apex | FlightPhase::Descending
        ) {
            self.position.latitude += DRIFT_DEG_PER_S * dt;
            self.position.longitude += DRIFT_DEG_PER_S * dt;
        }

        TelemetryRecord {
            signal: DEFAULT_SIGNAL_DBM,
            timestamp: now.timestamp_millis(),
            pitch: PITCH_DEG,
            roll: 0.0,
            yaw: 0.0,
            gforce: 1.0 + (self.velocity / GRAVITY) / 10.0,
            altitude: self.altitude,
            position: self.position,
            phase: self.phase,
            sample_rate: SAMPLE_RATE,
        }
    }
}
