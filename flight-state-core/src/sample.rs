use core::fmt::Display;

use nalgebra::Vector3;

use crate::altitude::pressure_to_altitude;

/// One cycle of sensor readings. The altitude is derived from the pressure
/// when the sample is built and can't be set separately.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSample {
    /// specific acceleration in body frame, m/s^2, z points to the nose
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))]
    acceleration: Vector3<f32>,
    /// Pa
    pressure: f32,
    /// m
    altitude: f32,
    /// C
    temperature: Option<f32>,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleError {
    InvalidPressure(f32),
    InvalidAcceleration,
}

impl Display for SampleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SampleError::InvalidPressure(pressure) => {
                write!(f, "pressure reading {pressure} Pa is not a valid pressure")
            }
            SampleError::InvalidAcceleration => write!(f, "acceleration reading is not finite"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SampleError {}

impl SensorSample {
    pub fn new(
        acceleration: Vector3<f32>,
        pressure: f32,
        temperature: Option<f32>,
        sea_level_pressure: f32,
    ) -> Result<Self, SampleError> {
        if !pressure.is_finite() || pressure <= 0.0 {
            return Err(SampleError::InvalidPressure(pressure));
        }
        if !acceleration.iter().all(|a| a.is_finite()) {
            return Err(SampleError::InvalidAcceleration);
        }

        Ok(Self {
            acceleration,
            pressure,
            altitude: pressure_to_altitude(pressure, sea_level_pressure),
            temperature,
        })
    }

    pub fn acceleration(&self) -> Vector3<f32> {
        self.acceleration
    }

    /// vertical component used by the liftoff and burnout detectors
    pub fn vertical_acceleration(&self) -> f32 {
        self.acceleration.z
    }

    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    pub fn altitude(&self) -> f32 {
        self.altitude
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}
