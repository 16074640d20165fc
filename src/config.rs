//! Bulletin configuration.
//!
//! Every component receives its configuration explicitly, so tests can swap
//! in alternate level sets without touching process state.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest default forecast window, in hours.
pub const MAX_HORIZON_HOURS: i64 = 384;

/// Layer tops are printed as two digits.
pub const MAX_LAYER_TOP_KM: u32 = 99;

/// Standard isobaric levels carried by the input dataset, in hPa.
pub const STANDARD_LEVELS_HPA: [i32; 13] = [900, 700, 500, 400, 300, 250, 150, 100, 70, 50, 30, 20, 10];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletinConfig {
    pub levels_hpa: Vec<i32>,
    pub layer_tops_km: Vec<u32>,
    pub area_column: String,
    pub horizon_hours: i64,
    pub header: StaticHeader,
}

/// Fixed lines repeated verbatim in every bulletin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticHeader {
    pub msgid: String,
    pub geodatum: String,
    pub units: String,
}

impl Default for BulletinConfig {
    fn default() -> Self {
        Self {
            levels_hpa: STANDARD_LEVELS_HPA.to_vec(),
            layer_tops_km: (2..=30).step_by(2).collect(),
            area_column: "bwr_name".to_string(),
            horizon_hours: 12,
            header: StaticHeader::default(),
        }
    }
}

impl Default for StaticHeader {
    fn default() -> Self {
        Self {
            msgid: "MSGID/CBRN BWR/IMGW-PIB/-/-/-/-/-/-/-/-//".to_string(),
            geodatum: "GEODATUM/WGE//".to_string(),
            units: "UNITM/-/DGG/KPH/-//".to_string(),
        }
    }
}

impl BulletinConfig {
    /// Load overrides from a JSON file. Fields absent from the file keep
    /// their defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels_hpa.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        let mut seen = HashSet::new();
        for &level in &self.levels_hpa {
            if level <= 0 {
                return Err(ConfigError::NonPositiveLevel(level));
            }
            if !seen.insert(level) {
                return Err(ConfigError::DuplicateLevel(level));
            }
        }

        if self.layer_tops_km.is_empty() {
            return Err(ConfigError::NoLayers);
        }
        let mut seen = HashSet::new();
        for &top in &self.layer_tops_km {
            if top < 1 {
                return Err(ConfigError::LayerTooLow(top));
            }
            if top > MAX_LAYER_TOP_KM {
                return Err(ConfigError::LayerTooHigh(top));
            }
            if !seen.insert(top) {
                return Err(ConfigError::DuplicateLayer(top));
            }
        }

        if !(1..=MAX_HORIZON_HOURS).contains(&self.horizon_hours) {
            return Err(ConfigError::InvalidHorizon(self.horizon_hours));
        }

        if self.area_column.trim().is_empty() {
            return Err(ConfigError::EmptyAreaColumn);
        }
        for (name, line) in [
            ("msgid", &self.header.msgid),
            ("geodatum", &self.header.geodatum),
            ("units", &self.header.units),
        ] {
            if line.trim().is_empty() {
                return Err(ConfigError::EmptyHeaderLine(name));
            }
        }

        Ok(())
    }

    /// Layer tops in ascending order, the order they are rendered in.
    pub fn sorted_layer_tops(&self) -> Vec<u32> {
        let mut tops = self.layer_tops_km.clone();
        tops.sort_unstable();
        tops
    }
}
