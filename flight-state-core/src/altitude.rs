/// Standard sea level pressure (Pa)
pub const STANDARD_SEA_LEVEL_PRESSURE: f32 = 101_325.0;

/// altitude (m) above the reference pressure level using the standard atmosphere model
///
/// h = 44330 * (1 - (P / P0) ^ (1 / 5.255))
///
/// only defined for `pressure > 0`, see [`crate::SensorSample::new`]
pub fn pressure_to_altitude(pressure: f32, sea_level_pressure: f32) -> f32 {
    44330.0 * (1.0 - libm::powf(pressure / sea_level_pressure, 1.0 / 5.255))
}
