//! Pressure to geopotential height under the 1976 U.S. Standard Atmosphere,
//! limited to the troposphere and the isothermal lower stratosphere.

/// Pressure at the tropopause (11 km), in hPa.
pub const TROPOPAUSE_HPA: f64 = 226.32;

const SEA_LEVEL_HPA: f64 = 1013.25;

/// Geopotential height in meters for a pressure in hPa. `pressure_hpa` must be
/// positive; callers validate levels before getting here.
pub fn pressure_to_height(pressure_hpa: f64) -> f64 {
    if pressure_hpa > TROPOPAUSE_HPA {
        44330.0 * (1.0 - (pressure_hpa / SEA_LEVEL_HPA).powf(1.0 / 5.25588))
    } else {
        11000.0 - (pressure_hpa / TROPOPAUSE_HPA).ln() / 1.5769e-4
    }
}
