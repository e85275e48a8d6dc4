use core::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::altitude::STANDARD_SEA_LEVEL_PRESSURE;

pub const GRAVITY: f32 = 9.80665;

/// Number of consecutive acceleration samples that must agree before
/// liftoff or burnout is confirmed.
pub const DEBOUNCE_WINDOW_LEN: usize = 3;

/// Number of consecutive descending coast cycles before apogee is declared.
pub const APOGEE_DESCENT_CYCLES: u32 = 2;

/// What to do with the recovery actuator once the vehicle is in recovery.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// command the actuator on every recovery cycle (held command)
    #[default]
    Continuous,
    /// command the actuator on the first recovery cycle only
    OneShot,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FlightConfig {
    /// cycle period (s)
    pub dt: f32,
    /// reference pressure for the altitude conversion (Pa)
    pub sea_level_pressure: f32,
    /// vertical specific acceleration above which liftoff is detected (m/s^2)
    pub liftoff_acceleration: f32,
    /// vertical specific acceleration below which burnout is detected (m/s^2)
    pub burnout_acceleration: f32,
    /// floor of the powered flight kinematic bound (m)
    pub min_powered_delta: f32,
    /// floor of the coasting drag decay bound (m)
    pub min_coast_delta: f32,
    /// aerodynamic velocity decay time constant (s)
    pub drag_time_constant: f32,
    /// weight of the last accepted delta in the adaptive bound
    pub adaptive_weight: f32,
    /// bias of the adaptive bound (m)
    pub adaptive_bias: f32,
    /// m/s^2
    pub gravity: f32,
    pub recovery_policy: RecoveryPolicy,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,
            sea_level_pressure: STANDARD_SEA_LEVEL_PRESSURE,
            liftoff_acceleration: 2.0 * GRAVITY,
            burnout_acceleration: 0.0,
            min_powered_delta: 0.5,
            min_coast_delta: 0.05,
            drag_time_constant: 8.0,
            adaptive_weight: 1.5,
            adaptive_bias: 0.2,
            gravity: GRAVITY,
            recovery_policy: RecoveryPolicy::Continuous,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    NonFinite(&'static str),
    NonPositive(&'static str),
    Negative(&'static str),
    /// liftoff threshold at or below the burnout threshold
    InvertedThresholds,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::NonFinite(field) => write!(f, "{field} must be finite"),
            ConfigError::NonPositive(field) => write!(f, "{field} must be greater than zero"),
            ConfigError::Negative(field) => write!(f, "{field} must not be negative"),
            ConfigError::InvertedThresholds => write!(
                f,
                "liftoff_acceleration must be greater than burnout_acceleration"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

impl FlightConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("dt", self.dt),
            ("sea_level_pressure", self.sea_level_pressure),
            ("liftoff_acceleration", self.liftoff_acceleration),
            ("burnout_acceleration", self.burnout_acceleration),
            ("min_powered_delta", self.min_powered_delta),
            ("min_coast_delta", self.min_coast_delta),
            ("drag_time_constant", self.drag_time_constant),
            ("adaptive_weight", self.adaptive_weight),
            ("adaptive_bias", self.adaptive_bias),
            ("gravity", self.gravity),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }

        for (name, value) in [
            ("dt", self.dt),
            ("sea_level_pressure", self.sea_level_pressure),
            ("drag_time_constant", self.drag_time_constant),
            // bound floors, the coasting limit is never below min(min_coast_delta, adaptive_bias)
            ("min_powered_delta", self.min_powered_delta),
            ("min_coast_delta", self.min_coast_delta),
            ("adaptive_bias", self.adaptive_bias),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive(name));
            }
        }

        for (name, value) in [
            ("adaptive_weight", self.adaptive_weight),
            ("gravity", self.gravity),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative(name));
            }
        }

        if self.liftoff_acceleration <= self.burnout_acceleration {
            return Err(ConfigError::InvertedThresholds);
        }

        Ok(())
    }
}
