/// Online mean / variance of the pad pressure, used as the altitude reference
/// so the flight is tracked above ground level.
///
/// Welford's algorithm, cost per sample is O(1).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Default)]
pub struct GroundCalibrator {
    count: u32,
    mean: f32,
    m2: f32,
}

impl GroundCalibrator {
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    pub fn update(&mut self, pressure: f32) {
        self.count = self.count.saturating_add(1);
        let n = self.count as f32;

        let delta = pressure - self.mean;
        self.mean += delta / n;
        let delta2 = pressure - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// mean pad pressure (Pa), None before the first sample
    pub fn sea_level_pressure(&self) -> Option<f32> {
        if self.count > 0 {
            Some(self.mean)
        } else {
            None
        }
    }

    /// population variance of the pad pressure (Pa^2)
    pub fn variance(&self) -> Option<f32> {
        if self.count > 0 {
            Some(self.m2 / self.count as f32)
        } else {
            None
        }
    }
}
