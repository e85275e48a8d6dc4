// only use std when feature = "std" is enabled or during testing
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod fmt;

mod altitude;
mod calibration;
mod collaborators;
mod config;
mod debounce;
mod driver;
mod estimator;
mod sample;
mod state_machine;
mod window;

pub use altitude::{STANDARD_SEA_LEVEL_PRESSURE, pressure_to_altitude};
pub use calibration::GroundCalibrator;
pub use collaborators::{RecoveryActuator, SensorSource, Telemetry};
pub use config::{
    APOGEE_DESCENT_CYCLES, ConfigError, DEBOUNCE_WINDOW_LEN, FlightConfig, GRAVITY,
    RecoveryPolicy,
};
pub use debounce::{AccelerationWindow, Threshold};
pub use driver::FlightLoop;
pub use estimator::{
    AltitudeGate, GateOutcome, adaptive_bound, coasting_limit, coasting_physical_bound,
    powered_bound,
};
pub use sample::{SampleError, SensorSample};
pub use state_machine::{FlightComputer, FlightEffect, FlightPhase, FlightStatus};
pub use window::RollingWindow;

#[cfg(test)]
mod tests;
