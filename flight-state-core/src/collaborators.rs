use core::fmt::Debug;

use crate::sample::SensorSample;

/// Sensor layer. Implementations should hand out either a valid sample or an
/// error, never a made up reading.
pub trait SensorSource {
    type Error: Debug;

    fn acquire_sample(&mut self) -> Result<SensorSample, Self::Error>;
}

/// Telemetry / logging layer.
pub trait Telemetry {
    /// called exactly once per flight, when apogee is evaluated
    fn report_max_altitude(&mut self, altitude: f32);
}

/// Recovery actuation layer (pyro channel or servo release).
pub trait RecoveryActuator {
    fn deploy_recovery(&mut self);
}

impl<T: Telemetry> Telemetry for &mut T {
    fn report_max_altitude(&mut self, altitude: f32) {
        (**self).report_max_altitude(altitude)
    }
}

impl<R: RecoveryActuator> RecoveryActuator for &mut R {
    fn deploy_recovery(&mut self) {
        (**self).deploy_recovery()
    }
}

impl<S: SensorSource> SensorSource for &mut S {
    type Error = S::Error;

    fn acquire_sample(&mut self) -> Result<SensorSample, Self::Error> {
        (**self).acquire_sample()
    }
}
