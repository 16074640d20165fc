use crate::models::HeightSample;
use crate::profile::Profile;

/// Interpolated wind vector at the middle of one altitude layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerWind {
    pub layer_top_km: u32,
    pub u_ms: f64,
    pub v_ms: f64,
}

/// Height the wind of a layer is sampled at: one kilometer below its top.
pub fn target_height_m(layer_top_km: u32) -> f64 {
    (f64::from(layer_top_km) - 1.0) * 1000.0
}

pub fn interpolate_layers(profile: &Profile, layer_tops_km: &[u32]) -> Vec<LayerWind> {
    layer_tops_km
        .iter()
        .map(|&layer_top_km| {
            let (u_ms, v_ms) = wind_at(profile, target_height_m(layer_top_km));
            LayerWind {
                layer_top_km,
                u_ms,
                v_ms,
            }
        })
        .collect()
}

/// Wind at `target_h`, clamped to the end samples outside the profile.
pub fn wind_at(profile: &Profile, target_h: f64) -> (f64, f64) {
    let lowest = profile.lowest();
    let highest = profile.highest();

    let (p1, p2) = if target_h < lowest.height_m {
        (lowest, lowest)
    } else if target_h > highest.height_m {
        (highest, highest)
    } else {
        bracketing_pair(profile.samples(), target_h).unwrap_or((lowest, lowest))
    };

    (
        lerp(target_h, p1.height_m, p1.u_ms, p2.height_m, p2.u_ms),
        lerp(target_h, p1.height_m, p1.v_ms, p2.height_m, p2.v_ms),
    )
}

// First adjacent pair with p1.height <= target <= p2.height. A single-sample
// profile has no pairs; the clamping branches cover it before we get here
// unless the target lands exactly on that sample.
fn bracketing_pair(samples: &[HeightSample], target_h: f64) -> Option<(&HeightSample, &HeightSample)> {
    if samples.len() == 1 {
        return Some((&samples[0], &samples[0]));
    }
    samples
        .windows(2)
        .find(|pair| pair[0].height_m <= target_h && target_h <= pair[1].height_m)
        .map(|pair| (&pair[0], &pair[1]))
}

fn lerp(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x2 == x1 {
        return y1;
    }
    y1 + (x - x1) * (y2 - y1) / (x2 - x1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(height_m: f64, u_ms: f64, v_ms: f64) -> HeightSample {
        HeightSample { height_m, u_ms, v_ms }
    }

    fn profile(samples: Vec<HeightSample>) -> Profile {
        Profile::from_samples(samples).unwrap()
    }

    fn all_tops() -> Vec<u32> {
        (2..=30).step_by(2).collect()
    }

    #[test]
    fn target_is_layer_midpoint() {
        assert_eq!(target_height_m(2), 1000.0);
        assert_eq!(target_height_m(30), 29000.0);
    }

    #[test]
    fn single_sample_fills_every_layer() {
        let single = profile(vec![at(5000.0, 3.25, -7.5)]);
        let winds = interpolate_layers(&single, &all_tops());
        assert_eq!(winds.len(), 15);
        for wind in winds {
            assert_eq!((wind.u_ms, wind.v_ms), (3.25, -7.5));
        }
    }

    #[test]
    fn single_sample_at_exact_target() {
        let single = profile(vec![at(1000.0, 2.0, 4.0)]);
        assert_eq!(wind_at(&single, 1000.0), (2.0, 4.0));
    }

    #[test]
    fn clamps_outside_the_profile() {
        let p = profile(vec![at(1500.0, 1.0, 2.0), at(3000.0, 5.0, 6.0), at(20000.0, 9.0, -1.0)]);
        assert_eq!(wind_at(&p, 1000.0), (1.0, 2.0));
        assert_eq!(wind_at(&p, 0.0), (1.0, 2.0));
        assert_eq!(wind_at(&p, 29000.0), (9.0, -1.0));
    }

    #[test]
    fn interpolates_linearly_between_neighbours() {
        let p = profile(vec![at(1000.0, 0.0, 10.0), at(3000.0, 10.0, 0.0)]);
        let (u, v) = wind_at(&p, 2000.0);
        assert!((u - 5.0).abs() < 1e-12);
        assert!((v - 5.0).abs() < 1e-12);

        let (u, v) = wind_at(&p, 1500.0);
        assert!((u - 2.5).abs() < 1e-12);
        assert!((v - 7.5).abs() < 1e-12);
    }

    #[test]
    fn exact_sample_height_returns_sample() {
        let p = profile(vec![at(1000.0, 1.0, 1.0), at(2000.0, 2.0, 2.0), at(3000.0, 3.0, 3.0)]);
        assert_eq!(wind_at(&p, 2000.0), (2.0, 2.0));
    }

    #[test]
    fn duplicate_heights_use_first_pair() {
        let p = profile(vec![at(1000.0, 1.0, 0.0), at(2000.0, 2.0, 0.0), at(2000.0, 7.0, 0.0)]);
        // Target on the duplicated height: first pair is (1000, 2000) so the
        // value comes from the first of the two duplicates.
        assert_eq!(wind_at(&p, 2000.0), (2.0, 0.0));

        let flat = profile(vec![at(2000.0, 4.0, 1.0), at(2000.0, 8.0, 3.0)]);
        assert_eq!(wind_at(&flat, 2000.0), (4.0, 1.0));
    }

    #[test]
    fn layers_follow_requested_order() {
        let p = profile(vec![at(0.0, 0.0, 0.0), at(30000.0, 30.0, 0.0)]);
        let winds = interpolate_layers(&p, &[2, 4, 30]);
        let tops: Vec<u32> = winds.iter().map(|w| w.layer_top_km).collect();
        assert_eq!(tops, vec![2, 4, 30]);
        assert!((winds[0].u_ms - 1.0).abs() < 1e-12);
        assert!((winds[1].u_ms - 3.0).abs() < 1e-12);
        assert!((winds[2].u_ms - 29.0).abs() < 1e-12);
    }
}
