//! Wind vector to meteorological direction and speed.

use crate::layers::LayerWind;
use crate::models::LayerReport;

const MS_TO_KPH: f64 = 3.6;

/// Direction the wind blows from (degrees, `[0, 360)`) and speed in km/h,
/// before rounding. `u` is the eastward and `v` the northward component.
pub fn direction_speed(u_ms: f64, v_ms: f64) -> (f64, f64) {
    let speed_kph = u_ms.hypot(v_ms) * MS_TO_KPH;
    let angle_deg = v_ms.atan2(u_ms).to_degrees();
    let direction = (270.0 - angle_deg).rem_euclid(360.0);
    (direction, speed_kph)
}

/// Rounded, display-ready report for one layer.
///
/// Ties round to even. A direction that rounds up to 360 wraps to 0.
pub fn to_layer_report(wind: &LayerWind) -> LayerReport {
    let (direction, speed) = direction_speed(wind.u_ms, wind.v_ms);
    LayerReport {
        layer_top_km: wind.layer_top_km,
        direction_deg: round_direction(direction),
        speed_kph: speed.round_ties_even() as u32,
    }
}

fn round_direction(direction: f64) -> u16 {
    direction.round_ties_even() as u16 % 360
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(u_ms: f64, v_ms: f64) -> LayerReport {
        to_layer_report(&LayerWind {
            layer_top_km: 2,
            u_ms,
            v_ms,
        })
    }

    #[test]
    fn northward_wind_comes_from_the_south() {
        let r = report(0.0, 10.0);
        assert_eq!(r.direction_deg, 180);
        assert_eq!(r.speed_kph, 36);
    }

    #[test]
    fn cardinal_directions() {
        // Eastward flow blows from the west.
        assert_eq!(report(10.0, 0.0).direction_deg, 270);
        // Westward flow blows from the east.
        assert_eq!(report(-10.0, 0.0).direction_deg, 90);
        // Southward flow blows from the north.
        assert_eq!(report(0.0, -10.0).direction_deg, 0);
    }

    #[test]
    fn calm_is_deterministic() {
        let r = report(0.0, 0.0);
        assert_eq!(r.speed_kph, 0);
        assert_eq!(r.direction_deg, 270);
    }

    #[test]
    fn direction_stays_below_360() {
        // Almost due north: raw direction is just under 360.
        let (raw, _) = direction_speed(0.001, -10.0);
        assert!(raw > 359.9 && raw < 360.0);
        assert_eq!(report(0.001, -10.0).direction_deg, 0);
    }

    #[test]
    fn speed_rounds_to_nearest() {
        assert_eq!(report(2.5, 0.0).speed_kph, 9);
        assert_eq!(report(0.625, 0.0).speed_kph, 2);
        assert_eq!(report(0.75, 0.0).speed_kph, 3);
    }

    #[test]
    fn direction_ties_round_to_even() {
        assert_eq!(round_direction(182.5), 182);
        assert_eq!(round_direction(183.5), 184);
        assert_eq!(round_direction(359.5), 0);
        assert_eq!(round_direction(0.4), 0);
    }

    #[test]
    fn southwest_wind() {
        // Flow toward the north-east blows from 225 degrees.
        let r = report(10.0, 10.0);
        assert_eq!(r.direction_deg, 225);
        assert_eq!(r.speed_kph, 51);
    }
}
