#[cfg(feature = "log")]
use log::LevelFilter;
use nalgebra::Vector3;

use crate::{
    RecoveryActuator, STANDARD_SEA_LEVEL_PRESSURE, SensorSample, Telemetry,
};

pub fn init_logger() {
    #[cfg(feature = "log")]
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .filter(Some("flight_state_core"), LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// sample with only a vertical acceleration, altitude relative to standard sea level
pub fn sample(vertical_acceleration: f32, pressure: f32) -> SensorSample {
    SensorSample::new(
        Vector3::new(0.0, 0.0, vertical_acceleration),
        pressure,
        Some(20.0),
        STANDARD_SEA_LEVEL_PRESSURE,
    )
    .unwrap()
}

#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    pub max_altitude_reports: Vec<f32>,
}

impl Telemetry for RecordingTelemetry {
    fn report_max_altitude(&mut self, altitude: f32) {
        self.max_altitude_reports.push(altitude);
    }
}

#[derive(Debug, Default)]
pub struct RecordingActuator {
    pub deployments: u32,
}

impl RecoveryActuator for RecordingActuator {
    fn deploy_recovery(&mut self) {
        self.deployments += 1;
    }
}
