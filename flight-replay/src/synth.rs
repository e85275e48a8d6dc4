use anyhow::Result;
use flight_state_core::{GRAVITY, STANDARD_SEA_LEVEL_PRESSURE};
use rand::{SeedableRng as _, rngs::StdRng};
use rand_distr::{Distribution as _, Normal};

use crate::sensor_log::SensorRecord;

/// Point mass vertical flight with quadratic drag.
#[derive(Debug, Clone)]
pub struct SynthProfile {
    pub dt: f32,
    pub pad_s: f32,
    pub burn_s: f32,
    /// specific acceleration from the motor (m/s^2)
    pub thrust_acc: f32,
    /// drag acceleration = k * v^2
    pub drag_k: f32,
    /// drag k once the parachute is out
    pub chute_drag_k: f32,
    pub landed_s: f32,
    pub pressure_noise_pa: f32,
    pub acc_noise: f32,
    pub seed: u64,
}

impl Default for SynthProfile {
    fn default() -> Self {
        Self {
            dt: 0.02,
            pad_s: 2.0,
            burn_s: 3.0,
            thrust_acc: 60.0,
            drag_k: 0.0005,
            // 8 m/s terminal velocity
            chute_drag_k: GRAVITY / 64.0,
            landed_s: 2.0,
            pressure_noise_pa: 0.0,
            acc_noise: 0.0,
            seed: 42,
        }
    }
}

pub struct SynthFlight {
    pub records: Vec<SensorRecord>,
    pub apogee_time_s: f32,
    pub apogee_altitude: f32,
}

/// inverse of the standard atmosphere altitude conversion
fn altitude_to_pressure(altitude: f32) -> f32 {
    STANDARD_SEA_LEVEL_PRESSURE * (1.0 - altitude / 44330.0).powf(5.255)
}

pub fn synthesize(profile: &SynthProfile) -> Result<SynthFlight> {
    let mut rng = StdRng::seed_from_u64(profile.seed);
    let pressure_noise = Normal::new(0.0f32, profile.pressure_noise_pa)?;
    let acc_noise = Normal::new(0.0f32, profile.acc_noise)?;

    let mut records = Vec::new();
    let mut altitude = 0.0f32;
    let mut velocity = 0.0f32;
    let mut apogee: Option<(f32, f32)> = None;
    let mut landed_at: Option<f32> = None;
    let mut i = 0u32;

    loop {
        let t = i as f32 * profile.dt;
        let burning = t >= profile.pad_s && t < profile.pad_s + profile.burn_s;
        let on_ground = t < profile.pad_s || landed_at.is_some();

        let specific_acc = if on_ground {
            GRAVITY
        } else {
            let k = if apogee.is_some() {
                profile.chute_drag_k
            } else {
                profile.drag_k
            };
            let thrust = if burning { profile.thrust_acc } else { 0.0 };
            thrust - k * velocity * velocity.abs()
        };

        records.push(SensorRecord {
            time_s: t,
            acc_x: acc_noise.sample(&mut rng),
            acc_y: acc_noise.sample(&mut rng),
            acc_z: specific_acc + acc_noise.sample(&mut rng),
            pressure: altitude_to_pressure(altitude) + pressure_noise.sample(&mut rng),
            temperature: Some(15.0),
        });

        if let Some(landed_at) = landed_at {
            if t - landed_at >= profile.landed_s {
                break;
            }
        } else if !on_ground {
            velocity += (specific_acc - GRAVITY) * profile.dt;
            altitude += velocity * profile.dt;

            if apogee.is_none() && velocity <= 0.0 {
                apogee = Some((t, altitude));
            }
            if apogee.is_some() && altitude <= 0.0 {
                altitude = 0.0;
                velocity = 0.0;
                landed_at = Some(t);
            }
        }
        i += 1;
    }

    let (apogee_time_s, apogee_altitude) = apogee.unwrap_or((0.0, 0.0));
    log::info!(
        "synthesized {} rows, apogee {} m at {} s",
        records.len(),
        apogee_altitude,
        apogee_time_s
    );
    Ok(SynthFlight {
        records,
        apogee_time_s,
        apogee_altitude,
    })
}
