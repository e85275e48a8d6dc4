use crate::{
    collaborators::{RecoveryActuator, SensorSource, Telemetry},
    fmt::Debug2DefmtWrapper,
    sample::SensorSample,
    state_machine::{FlightComputer, FlightPhase},
};

/// Fixed cadence loop body: acquire a sample, advance the flight computer,
/// forward effects. Pacing is left to the caller.
pub struct FlightLoop<S: SensorSource, T: Telemetry, R: RecoveryActuator> {
    computer: FlightComputer,
    sensors: S,
    telemetry: T,
    actuator: R,
    last_good_sample: Option<SensorSample>,
    substituted_samples: u32,
}

impl<S: SensorSource, T: Telemetry, R: RecoveryActuator> FlightLoop<S, T, R> {
    pub fn new(computer: FlightComputer, sensors: S, telemetry: T, actuator: R) -> Self {
        Self {
            computer,
            sensors,
            telemetry,
            actuator,
            last_good_sample: None,
            substituted_samples: 0,
        }
    }

    /// Returns None when no sample could be acquired and there is no previous
    /// sample to stand in for it. The computer does not advance in that case.
    pub fn run_cycle(&mut self) -> Option<FlightPhase> {
        let sample = match self.sensors.acquire_sample() {
            Ok(sample) => {
                self.last_good_sample = Some(sample.clone());
                sample
            }
            Err(e) => {
                let Some(last_good_sample) = &self.last_good_sample else {
                    log_warn!(
                        "sensor acquisition failed before first sample: {:?}",
                        Debug2DefmtWrapper(&e)
                    );
                    return None;
                };
                log_warn!(
                    "sensor acquisition failed, reusing last sample: {:?}",
                    Debug2DefmtWrapper(&e)
                );
                self.substituted_samples = self.substituted_samples.saturating_add(1);
                last_good_sample.clone()
            }
        };

        Some(
            self.computer
                .advance(&sample, &mut self.telemetry, &mut self.actuator),
        )
    }

    pub fn computer(&self) -> &FlightComputer {
        &self.computer
    }

    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    pub fn actuator(&self) -> &R {
        &self.actuator
    }

    pub fn substituted_samples(&self) -> u32 {
        self.substituted_samples
    }

    pub fn into_parts(self) -> (FlightComputer, S, T, R) {
        (self.computer, self.sensors, self.telemetry, self.actuator)
    }
}
