use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;
use flight_state_core::{
    FlightComputer, FlightConfig, FlightLoop, FlightPhase, RecoveryActuator, Telemetry,
};
use serde::Serialize;

use crate::sensor_log::{SensorLogSource, SensorRecord};

#[derive(Debug, Default)]
pub struct LoggedTelemetry {
    pub max_altitude: Option<f32>,
}

impl Telemetry for LoggedTelemetry {
    fn report_max_altitude(&mut self, altitude: f32) {
        log::info!("max altitude: {} m", altitude);
        self.max_altitude = Some(altitude);
    }
}

/// Counts deployment commands, nothing is actuated on the host.
#[derive(Debug, Default)]
pub struct LoggedActuator {
    pub deployments: u32,
}

impl RecoveryActuator for LoggedActuator {
    fn deploy_recovery(&mut self) {
        if self.deployments == 0 {
            log::info!("recovery deployment commanded");
        }
        self.deployments += 1;
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct CycleRecord {
    pub time_s: f32,
    pub phase: &'static str,
    pub raw_altitude: f32,
    pub validated_altitude: f32,
    pub velocity: f32,
    /// empty outside of powered flight and coasting
    pub accepted: Option<bool>,
}

#[derive(Debug)]
pub struct ReplayReport {
    pub cycles: Vec<CycleRecord>,
    /// phase and time of its first cycle
    pub phase_entries: Vec<(FlightPhase, f32)>,
    pub max_altitude: Option<f32>,
    pub deployments: u32,
    pub substituted_samples: u32,
}

impl ReplayReport {
    pub fn entry_time(&self, phase: FlightPhase) -> Option<f32> {
        self.phase_entries
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|(_, t)| *t)
    }
}

pub fn replay(records: Vec<SensorRecord>, config: FlightConfig) -> Result<ReplayReport> {
    let sea_level_pressure = config.sea_level_pressure;
    let computer = FlightComputer::new(config).map_err(|e| anyhow::anyhow!("{e}"))?;
    let mut flight_loop = FlightLoop::new(
        computer,
        SensorLogSource::new(records, sea_level_pressure),
        LoggedTelemetry::default(),
        LoggedActuator::default(),
    );

    let mut cycles = Vec::new();
    let mut phase_entries: Vec<(FlightPhase, f32)> = Vec::new();

    while !flight_loop.sensors().is_exhausted() {
        let Some(phase) = flight_loop.run_cycle() else {
            continue;
        };
        let time_s = flight_loop.sensors().last_time_s().unwrap_or_default();
        let status = flight_loop.computer().status();

        if phase_entries.last().map(|(p, _)| *p) != Some(phase) {
            phase_entries.push((phase, time_s));
        }

        cycles.push(CycleRecord {
            time_s,
            phase: phase.name(),
            raw_altitude: status.raw_altitude,
            validated_altitude: status.validated_altitude,
            velocity: status.velocity,
            accepted: status.last_gate.map(|gate| gate.accepted),
        });
    }

    let substituted_samples = flight_loop.substituted_samples();
    let (_, _, telemetry, actuator) = flight_loop.into_parts();
    Ok(ReplayReport {
        cycles,
        phase_entries,
        max_altitude: telemetry.max_altitude,
        deployments: actuator.deployments,
        substituted_samples,
    })
}

pub fn write_cycles(path: &Path, cycles: &[CycleRecord]) -> Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))?;
    for cycle in cycles {
        writer.serialize(cycle)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use flight_state_core::{GRAVITY, STANDARD_SEA_LEVEL_PRESSURE};

    use super::*;
    use crate::{
        sensor_log::{read_sensor_log, write_sensor_log},
        synth::{SynthFlight, SynthProfile, synthesize},
    };

    fn pad_record(time_s: f32, pressure: f32) -> SensorRecord {
        SensorRecord {
            time_s,
            acc_x: 0.0,
            acc_y: 0.0,
            acc_z: GRAVITY,
            pressure,
            temperature: None,
        }
    }

    #[test]
    fn synthetic_flight_reaches_recovery() {
        let flight = synthesize(&SynthProfile::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flight.csv");
        write_sensor_log(&path, &flight.records).unwrap();
        let records = read_sensor_log(&path).unwrap();
        assert_eq!(records.len(), flight.records.len());

        let report = replay(records, FlightConfig::default()).unwrap();
        let phases: Vec<FlightPhase> = report.phase_entries.iter().map(|(p, _)| *p).collect();
        assert_eq!(
            phases,
            vec![
                FlightPhase::Standby,
                FlightPhase::PoweredFlight,
                FlightPhase::Coasting,
                FlightPhase::Apogee,
                FlightPhase::Recovery,
            ]
        );

        let liftoff = report.entry_time(FlightPhase::PoweredFlight).unwrap();
        assert_relative_eq!(liftoff, 2.04, epsilon = 0.03);
        let burnout = report.entry_time(FlightPhase::Coasting).unwrap();
        assert_relative_eq!(burnout, 5.04, epsilon = 0.03);
        let apogee = report.entry_time(FlightPhase::Apogee).unwrap();
        assert!(
            (apogee - flight.apogee_time_s).abs() < 0.5,
            "apogee detected at {apogee}, real {}",
            flight.apogee_time_s
        );

        let max_altitude = report.max_altitude.unwrap();
        assert!(
            (max_altitude - flight.apogee_altitude).abs() < 1.0,
            "max altitude {max_altitude}, real {}",
            flight.apogee_altitude
        );
        assert!(report.deployments > 0);
        assert_eq!(report.substituted_samples, 0);
    }

    fn noisy_flight(pressure_noise_pa: f32) -> (SynthFlight, ReplayReport) {
        let flight = synthesize(&SynthProfile {
            pressure_noise_pa,
            acc_noise: 0.5,
            seed: 42,
            ..Default::default()
        })
        .unwrap();
        let report = replay(flight.records.clone(), FlightConfig::default()).unwrap();
        (flight, report)
    }

    #[test]
    fn apogee_detected_with_baro_noise() {
        // up to 2 Pa of pressure noise with the default gate constants
        for pressure_noise_pa in [0.5, 2.0] {
            let (flight, report) = noisy_flight(pressure_noise_pa);
            let apogee = report.entry_time(FlightPhase::Apogee).unwrap_or_else(|| {
                panic!(
                    "no apogee at {pressure_noise_pa} Pa, entries {:?}",
                    report.phase_entries
                )
            });
            assert!(
                (apogee - flight.apogee_time_s).abs() < 1.0,
                "{pressure_noise_pa} Pa: apogee detected at {apogee}, real {}",
                flight.apogee_time_s
            );
            assert!(report.entry_time(FlightPhase::Recovery).is_some());

            let max_altitude = report.max_altitude.unwrap();
            assert!(
                (max_altitude - flight.apogee_altitude).abs() < 5.0,
                "{pressure_noise_pa} Pa: max altitude {max_altitude}, real {}",
                flight.apogee_altitude
            );
        }
    }

    #[test]
    fn noisy_liftoff_and_burnout_times() {
        let (_, report) = noisy_flight(2.0);
        let liftoff = report.entry_time(FlightPhase::PoweredFlight).unwrap();
        assert_relative_eq!(liftoff, 2.04, epsilon = 0.03);
        let burnout = report.entry_time(FlightPhase::Coasting).unwrap();
        assert_relative_eq!(burnout, 5.04, epsilon = 0.03);
    }

    #[test]
    fn invalid_rows_are_substituted() {
        let records = vec![
            pad_record(0.00, STANDARD_SEA_LEVEL_PRESSURE),
            pad_record(0.02, -1.0),
            pad_record(0.04, STANDARD_SEA_LEVEL_PRESSURE - 12.0),
        ];
        let report = replay(records, FlightConfig::default()).unwrap();
        assert_eq!(report.cycles.len(), 3);
        assert_eq!(report.substituted_samples, 1);
        assert_eq!(report.cycles[1].raw_altitude, report.cycles[0].raw_altitude);
        assert!(report.cycles[2].raw_altitude > 0.9);
        assert!(report.cycles.iter().all(|c| c.phase == "Standby"));
        assert_eq!(report.max_altitude, None);
    }

    #[test]
    fn leading_invalid_row_is_skipped() {
        let records = vec![
            pad_record(0.00, 0.0),
            pad_record(0.02, STANDARD_SEA_LEVEL_PRESSURE),
        ];
        let report = replay(records, FlightConfig::default()).unwrap();
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].time_s, 0.02);
    }

    #[test]
    fn writes_cycle_csv() {
        let records = (0..5)
            .map(|i| pad_record(i as f32 * 0.02, STANDARD_SEA_LEVEL_PRESSURE))
            .collect();
        let report = replay(records, FlightConfig::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_cycles(&path, &report.cycles).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("time_s,phase,raw_altitude,validated_altitude,velocity,accepted")
        );
        assert_eq!(lines.count(), 5);
    }
}
