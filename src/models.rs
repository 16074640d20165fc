use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::SkipReason;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureLevelSample {
    pub level_hpa: i32,
    pub u_ms: f64,
    pub v_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightSample {
    pub height_m: f64,
    pub u_ms: f64,
    pub v_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerReport {
    pub layer_top_km: u32,
    pub direction_deg: u16,
    pub speed_kph: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaBulletin {
    pub area_name: String,
    pub layers: Vec<LayerReport>,
}

/// Invocation parameters shared by every bulletin in one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchHeader {
    pub exercise_tag: String,
    pub created_at: NaiveDateTime,
    pub model_start: NaiveDateTime,
    pub forecast_start: NaiveDateTime,
    pub forecast_end: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBatch {
    pub header: BatchHeader,
    pub bulletins: Vec<AreaBulletin>,
}

/// Result of scanning one data row against the requested valid time.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Matched(AreaBulletin),
    NotMatched,
    Skipped { line: usize, reason: SkipReason },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RowSkip {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub valid_time: String,
    pub rows_scanned: usize,
    pub bulletins: usize,
    pub skipped: usize,
    pub skips: Vec<RowSkip>,
}
