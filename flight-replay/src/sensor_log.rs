use std::fmt::Display;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{Reader, Writer};
use flight_state_core::{GroundCalibrator, SampleError, SensorSample, SensorSource};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One row of a recorded or synthetic sensor log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SensorRecord {
    pub time_s: f32,
    /// m/s^2
    pub acc_x: f32,
    pub acc_y: f32,
    pub acc_z: f32,
    /// Pa
    pub pressure: f32,
    /// C
    pub temperature: Option<f32>,
}

pub fn read_sensor_log(path: &Path) -> Result<Vec<SensorRecord>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = Reader::from_reader(file);
    let mut records = Vec::new();
    for (i, row) in reader.deserialize().enumerate() {
        let record: SensorRecord =
            row.with_context(|| format!("bad row {} in {}", i + 1, path.display()))?;
        records.push(record);
    }
    Ok(records)
}

pub fn write_sensor_log(path: &Path, records: &[SensorRecord]) -> Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Mean pressure of the first `n` rows with a usable pressure.
pub fn calibrate_sea_level_pressure(records: &[SensorRecord], n: usize) -> Option<f32> {
    let mut calibrator = GroundCalibrator::new();
    for record in records
        .iter()
        .filter(|record| record.pressure.is_finite() && record.pressure > 0.0)
        .take(n)
    {
        calibrator.update(record.pressure);
    }
    if let Some(variance) = calibrator.variance() {
        log::info!(
            "ground calibration over {} rows, pressure stddev {} Pa",
            calibrator.count(),
            variance.sqrt()
        );
    }
    calibrator.sea_level_pressure()
}

#[derive(Debug)]
pub enum AcquireError {
    Exhausted,
    InvalidRow { row: usize, error: SampleError },
}

impl Display for AcquireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquireError::Exhausted => write!(f, "end of sensor log"),
            AcquireError::InvalidRow { row, error } => write!(f, "row {row}: {error}"),
        }
    }
}

impl std::error::Error for AcquireError {}

/// Plays back a sensor log one row per cycle.
pub struct SensorLogSource {
    records: Vec<SensorRecord>,
    next: usize,
    sea_level_pressure: f32,
}

impl SensorLogSource {
    pub fn new(records: Vec<SensorRecord>, sea_level_pressure: f32) -> Self {
        Self {
            records,
            next: 0,
            sea_level_pressure,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.records.len()
    }

    /// time of the row handed out last
    pub fn last_time_s(&self) -> Option<f32> {
        self.next
            .checked_sub(1)
            .and_then(|i| self.records.get(i))
            .map(|record| record.time_s)
    }
}

impl SensorSource for SensorLogSource {
    type Error = AcquireError;

    fn acquire_sample(&mut self) -> Result<SensorSample, Self::Error> {
        let Some(record) = self.records.get(self.next) else {
            return Err(AcquireError::Exhausted);
        };
        let row = self.next + 1;
        self.next += 1;

        SensorSample::new(
            Vector3::new(record.acc_x, record.acc_y, record.acc_z),
            record.pressure,
            record.temperature,
            self.sea_level_pressure,
        )
        .map_err(|error| AcquireError::InvalidRow { row, error })
    }
}
