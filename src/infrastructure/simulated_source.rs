// Simulated record source - One flight simulator ticked on a fixed interval
use crate::application::clock::Clock;
use crate::application::flight_simulator::FlightSimulator;
use crate::application::record_source::{RecordSource, RecordSourceFactory};
use crate::domain::telemetry::TelemetryRecord;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

pub struct SimulatedSource {
    simulator: FlightSimulator,
    ticker: Interval,
}

impl SimulatedSource {
    pub fn new(simulator: FlightSimulator, period: Duration) -> Self {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { simulator, ticker }
    }
}

#[async_trait]
impl RecordSource for SimulatedSource {
    async fn next_record(&mut self) -> Option<TelemetryRecord> {
        self.ticker.tick().await;
        let record = self.simulator.advance();
        tracing::trace!(payload = %record.to_payload(), "Simulated sample");
        Some(record)
    }
}

pub struct SimulatedSourceFactory {
    clock: Arc<dyn Clock>,
    period: Duration,
}

impl SimulatedSourceFactory {
    pub fn new(clock: Arc<dyn Clock>, period: Duration) -> Self {
        Self { clock, period }
    }
}

#[async_trait]
impl RecordSourceFactory for SimulatedSourceFactory {
    async fn open(&self) -> anyhow::Result<Box<dyn RecordSource>> {
        let simulator = FlightSimulator::new(self.clock.clone());
        Ok(Box::new(SimulatedSource::new(simulator, self.period)))
    }
}
