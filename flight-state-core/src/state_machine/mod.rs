
use crate::{
    collaborators::{RecoveryActuator, Telemetry},
    config::{APOGEE_DESCENT_CYCLES, ConfigError, FlightConfig, RecoveryPolicy},
    debounce::{AccelerationWindow, Threshold},
    estimator::{AltitudeGate, GateOutcome},
    sample::SensorSample,
};

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlightPhase {
    Standby,
    PoweredFlight,
    Coasting,
    Apogee,
    Recovery,
}

impl FlightPhase {
    /// the only phase this one may advance to
    pub fn next(self) -> Option<FlightPhase> {
        match self {
            FlightPhase::Standby => Some(FlightPhase::PoweredFlight),
            FlightPhase::PoweredFlight => Some(FlightPhase::Coasting),
            FlightPhase::Coasting => Some(FlightPhase::Apogee),
            FlightPhase::Apogee => Some(FlightPhase::Recovery),
            FlightPhase::Recovery => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FlightPhase::Standby => "Standby",
            FlightPhase::PoweredFlight => "PoweredFlight",
            FlightPhase::Coasting => "Coasting",
            FlightPhase::Apogee => "Apogee",
            FlightPhase::Recovery => "Recovery",
        }
    }
}

/// Side effect requested by a cycle, carried out by the driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightEffect {
    ReportMaxAltitude(f32),
    DeployRecovery,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone)]
enum FlightState {
    /// on pad, altitude gate follows the raw reading
    Standby,
    PoweredFlight,
    Coasting {
        initial_coast_velocity: f32,
        /// cycles since burnout, starts at 1
        k: u32,
        /// consecutive cycles with a negative altitude delta
        descent_counter: u32,
    },
    Apogee,
    Recovery {
        deployments: u32,
    },
}

impl FlightState {
    fn phase(&self) -> FlightPhase {
        match self {
            FlightState::Standby => FlightPhase::Standby,
            FlightState::PoweredFlight => FlightPhase::PoweredFlight,
            FlightState::Coasting { .. } => FlightPhase::Coasting,
            FlightState::Apogee => FlightPhase::Apogee,
            FlightState::Recovery { .. } => FlightPhase::Recovery,
        }
    }
}

/// Snapshot of the estimator for telemetry.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightStatus {
    pub phase: FlightPhase,
    pub cycle: u32,
    pub raw_altitude: f32,
    pub validated_altitude: f32,
    pub velocity: f32,
    pub max_altitude: f32,
    /// None outside of powered flight and coasting
    pub last_gate: Option<GateOutcome>,
}

/// Flight phase state machine and the estimator state it drives.
#[derive(Debug, Clone)]
pub struct FlightComputer {
    config: FlightConfig,
    liftoff: Threshold,
    burnout: Threshold,
    state: FlightState,
    gate: AltitudeGate,
    acceleration_window: AccelerationWindow,
    last_gate: Option<GateOutcome>,
    cycle: u32,
}

impl FlightComputer {
    pub fn new(config: FlightConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            liftoff: Threshold::Above(config.liftoff_acceleration),
            burnout: Threshold::Below(config.burnout_acceleration),
            config,
            state: FlightState::Standby,
            gate: AltitudeGate::new(0.0),
            acceleration_window: AccelerationWindow::new(),
            last_gate: None,
            cycle: 0,
        })
    }

    /// Run one cycle and hand the requested effect to the collaborators.
    /// Returns the phase after this cycle.
    pub fn advance(
        &mut self,
        sample: &SensorSample,
        telemetry: &mut impl Telemetry,
        actuator: &mut impl RecoveryActuator,
    ) -> FlightPhase {
        match self.update(sample) {
            Some(FlightEffect::ReportMaxAltitude(altitude)) => {
                telemetry.report_max_altitude(altitude)
            }
            Some(FlightEffect::DeployRecovery) => actuator.deploy_recovery(),
            None => {}
        }
        self.phase()
    }

    /// Run one cycle, returning the effect the driver should carry out
    /// instead of performing it.
    pub fn update(&mut self, sample: &SensorSample) -> Option<FlightEffect> {
        self.cycle = self.cycle.wrapping_add(1);
        let acceleration = sample.vertical_acceleration();
        let raw_altitude = sample.altitude();
        self.acceleration_window.push(acceleration);

        let mut effect = None;
        let mut next_state = None;

        match &mut self.state {
            FlightState::Standby => {
                self.gate.reseed(raw_altitude);
                if self.liftoff.is_confirmed(&self.acceleration_window) {
                    next_state = Some(FlightState::PoweredFlight);
                }
            }
            FlightState::PoweredFlight => {
                let outcome = self
                    .gate
                    .powered_step(raw_altitude, acceleration, &self.config);
                self.last_gate = Some(outcome);

                if self.burnout.is_confirmed(&self.acceleration_window) {
                    next_state = Some(FlightState::Coasting {
                        initial_coast_velocity: self.gate.velocity(),
                        k: 1,
                        descent_counter: 0,
                    });
                }
            }
            FlightState::Coasting {
                initial_coast_velocity,
                k,
                descent_counter,
            } => {
                let outcome = self.gate.coasting_step(
                    raw_altitude,
                    *initial_coast_velocity,
                    *k,
                    &self.config,
                );
                self.last_gate = Some(outcome);

                if outcome.signed_delta < 0.0 {
                    *descent_counter += 1;
                } else {
                    *descent_counter = 0;
                }
                if *descent_counter >= APOGEE_DESCENT_CYCLES {
                    next_state = Some(FlightState::Apogee);
                }
                *k += 1;
            }
            FlightState::Apogee => {
                effect = Some(FlightEffect::ReportMaxAltitude(self.gate.max_altitude()));
                self.last_gate = None;
                next_state = Some(FlightState::Recovery { deployments: 0 });
            }
            FlightState::Recovery { deployments } => {
                let deploy = match self.config.recovery_policy {
                    RecoveryPolicy::Continuous => true,
                    RecoveryPolicy::OneShot => *deployments == 0,
                };
                if deploy {
                    *deployments = deployments.saturating_add(1);
                    effect = Some(FlightEffect::DeployRecovery);
                }
            }
        }

        if let Some(next_state) = next_state {
            self.transition_to(next_state);
        }

        effect
    }

    fn transition_to(&mut self, next_state: FlightState) {
        let from = self.state.phase();
        let to = next_state.phase();
        log_assert!(
            from.next() == Some(to),
            "illegal flight phase transition {:?} -> {:?}",
            from,
            to
        );

        match &next_state {
            FlightState::Coasting {
                initial_coast_velocity,
                ..
            } => log_info!(
                "[cycle {}] burnout detected, coasting at {} m/s",
                self.cycle,
                initial_coast_velocity
            ),
            FlightState::Apogee => log_info!(
                "[cycle {}] apogee detected, max altitude {} m",
                self.cycle,
                self.gate.max_altitude()
            ),
            _ => log_info!(
                "[cycle {}] {} -> {}",
                self.cycle,
                from.name(),
                to.name()
            ),
        }

        self.state = next_state;
    }

    pub fn phase(&self) -> FlightPhase {
        self.state.phase()
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    pub fn status(&self) -> FlightStatus {
        FlightStatus {
            phase: self.phase(),
            cycle: self.cycle,
            raw_altitude: self.gate.raw_altitude(),
            validated_altitude: self.gate.validated_altitude(),
            velocity: self.gate.velocity(),
            max_altitude: self.gate.max_altitude(),
            last_gate: match self.state {
                FlightState::PoweredFlight | FlightState::Coasting { .. } => self.last_gate,
                _ => None,
            },
        }
    }
}
