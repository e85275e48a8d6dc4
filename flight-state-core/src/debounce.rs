use crate::{config::DEBOUNCE_WINDOW_LEN, window::RollingWindow};

pub type AccelerationWindow = RollingWindow<f32, DEBOUNCE_WINDOW_LEN>;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// strictly greater than
    Above(f32),
    /// strictly less than
    Below(f32),
}

impl Threshold {
    pub fn is_crossed_by(&self, value: f32) -> bool {
        match self {
            Threshold::Above(threshold) => value > *threshold,
            Threshold::Below(threshold) => value < *threshold,
        }
    }

    /// Confirmed only when the window is full and every sample in it crosses
    /// the threshold. A window that is still filling never confirms, so the
    /// zero-initialized start of flight can't trigger a `Below(0.0)` detector.
    pub fn is_confirmed<const N: usize>(&self, window: &RollingWindow<f32, N>) -> bool {
        window.is_full() && window.iter().all(|value| self.is_crossed_by(value))
    }
}
