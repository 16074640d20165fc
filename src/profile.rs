use std::collections::HashMap;

use crate::atmosphere::pressure_to_height;
use crate::error::ProfileError;
use crate::models::{HeightSample, PressureLevelSample};

/// Wind samples for one area and valid time, sorted by ascending height.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    samples: Vec<HeightSample>,
}

impl Profile {
    pub fn from_samples(mut samples: Vec<HeightSample>) -> Result<Self, ProfileError> {
        if samples.is_empty() {
            return Err(ProfileError::Empty);
        }
        samples.sort_by(|a, b| a.height_m.total_cmp(&b.height_m));
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[HeightSample] {
        &self.samples
    }

    pub fn lowest(&self) -> &HeightSample {
        &self.samples[0]
    }

    pub fn highest(&self) -> &HeightSample {
        &self.samples[self.samples.len() - 1]
    }
}

/// Convert the configured levels of one row into a height-ordered profile.
///
/// Every level in `levels` must have exactly one sample; extra samples for
/// levels outside the configured set are ignored.
pub fn build_profile(levels: &[i32], samples: &[PressureLevelSample]) -> Result<Profile, ProfileError> {
    let mut by_level: HashMap<i32, &PressureLevelSample> = HashMap::with_capacity(samples.len());
    for sample in samples {
        if by_level.insert(sample.level_hpa, sample).is_some() {
            return Err(ProfileError::DuplicateLevel(sample.level_hpa));
        }
    }

    let mut heights = Vec::with_capacity(levels.len());
    for &level in levels {
        if level <= 0 {
            return Err(ProfileError::InvalidPressure(level));
        }
        let sample = by_level
            .get(&level)
            .ok_or(ProfileError::MissingLevelData(level))?;
        heights.push(HeightSample {
            height_m: pressure_to_height(level as f64),
            u_ms: sample.u_ms,
            v_ms: sample.v_ms,
        });
    }

    Profile::from_samples(heights)
}
