#[cfg(test)]
mod tests;

use crate::config::FlightConfig;

/// Kinematic bound on the altitude change over one powered cycle (m).
///
/// |v dt + 0.5 a dt^2|, floored at `min_delta` so the bound never collapses
/// to zero when velocity and acceleration cancel out.
pub fn powered_bound(velocity: f32, acceleration: f32, dt: f32, min_delta: f32) -> f32 {
    let delta = (velocity * dt + 0.5 * acceleration * dt * dt).abs();
    delta.max(min_delta)
}

/// Drag decay bound on the altitude change over one coasting cycle (m).
///
/// v0 exp(-k dt / tau) dt, where k counts cycles since burnout starting at 1.
pub fn coasting_physical_bound(
    initial_coast_velocity: f32,
    k: u32,
    dt: f32,
    drag_time_constant: f32,
    min_delta: f32,
) -> f32 {
    let decay = libm::expf(-(k as f32) * dt / drag_time_constant);
    (initial_coast_velocity * decay * dt).max(min_delta)
}

/// First order smoother over the accepted deltas, independent of the drag model.
pub fn adaptive_bound(last_accepted_delta: f32, weight: f32, bias: f32) -> f32 {
    weight * last_accepted_delta + bias
}

/// The tighter of the two coasting bounds.
pub fn coasting_limit(physical_bound: f32, adaptive_bound: f32) -> f32 {
    physical_bound.min(adaptive_bound)
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateOutcome {
    /// raw reading was inside the bound and became the validated altitude
    pub accepted: bool,
    /// change applied to the validated altitude this cycle (m)
    pub signed_delta: f32,
    /// bound the raw reading was checked against (m)
    pub limit: f32,
}

/// Barometric altitude gate with an integrated vertical velocity.
///
/// `validated` is the authoritative altitude. Outside of standby it only
/// moves through [`AltitudeGate::gate`]: either to the raw reading, or by
/// exactly `limit` upwards when the raw reading is implausible.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone)]
pub struct AltitudeGate {
    validated: f32,
    raw: f32,
    /// m/s, positive up
    velocity: f32,
    last_accepted_delta: f32,
    max_altitude: f32,
}

impl AltitudeGate {
    pub fn new(initial_altitude: f32) -> Self {
        Self {
            validated: initial_altitude,
            raw: initial_altitude,
            velocity: 0.0,
            last_accepted_delta: 0.0,
            max_altitude: initial_altitude,
        }
    }

    /// Standby: follow the raw reading with zero velocity so pad drift never
    /// shows up as a jump at liftoff.
    pub fn reseed(&mut self, raw_altitude: f32) {
        self.raw = raw_altitude;
        self.validated = raw_altitude;
        self.velocity = 0.0;
        self.last_accepted_delta = 0.0;
        self.max_altitude = raw_altitude;
    }

    pub fn powered_step(
        &mut self,
        raw_altitude: f32,
        acceleration: f32,
        config: &FlightConfig,
    ) -> GateOutcome {
        self.raw = raw_altitude;
        self.velocity += acceleration * config.dt;

        let limit = powered_bound(
            self.velocity,
            acceleration,
            config.dt,
            config.min_powered_delta,
        );
        self.gate(limit)
    }

    /// Velocity only decays by gravity here, while the altitude bound uses the
    /// drag time constant. The two models are not dynamically consistent; the
    /// coasting velocity is an upper estimate.
    pub fn coasting_step(
        &mut self,
        raw_altitude: f32,
        initial_coast_velocity: f32,
        k: u32,
        config: &FlightConfig,
    ) -> GateOutcome {
        self.raw = raw_altitude;

        let physical = coasting_physical_bound(
            initial_coast_velocity,
            k,
            config.dt,
            config.drag_time_constant,
            config.min_coast_delta,
        );
        let adaptive = adaptive_bound(
            self.last_accepted_delta,
            config.adaptive_weight,
            config.adaptive_bias,
        );
        let limit = coasting_limit(physical, adaptive);
        let outcome = self.gate(limit);

        self.velocity -= config.gravity * config.dt;
        outcome
    }

    fn gate(&mut self, limit: f32) -> GateOutcome {
        let measured_delta = self.raw - self.validated;

        let outcome = if measured_delta.abs() <= limit {
            self.validated = self.raw;
            self.last_accepted_delta = measured_delta.abs();
            GateOutcome {
                accepted: true,
                signed_delta: measured_delta,
                limit,
            }
        } else {
            log_debug!(
                "gate rejected raw altitude {}, delta {} over limit {}",
                self.raw,
                measured_delta,
                limit
            );
            // still ascending, project upwards
            self.validated += limit;
            self.last_accepted_delta = limit;
            GateOutcome {
                accepted: false,
                signed_delta: limit,
                limit,
            }
        };

        if self.validated > self.max_altitude {
            self.max_altitude = self.validated;
        }
        log_trace!(
            "validated {}, raw {}, velocity {}",
            self.validated,
            self.raw,
            self.velocity
        );
        outcome
    }

    pub fn validated_altitude(&self) -> f32 {
        self.validated
    }

    pub fn raw_altitude(&self) -> f32 {
        self.raw
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn last_accepted_delta(&self) -> f32 {
        self.last_accepted_delta
    }

    /// highest validated altitude since the last reseed
    pub fn max_altitude(&self) -> f32 {
        self.max_altitude
    }
}
