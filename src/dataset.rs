//! Tabular wind dataset and row selection.
//!
//! Layout of the input CSV:
//! - row 0: free-form metadata (model name, cycle), only required to exist
//! - row 1: column names
//! - rows 2..: one row per area and valid time, with `u{level}`/`v{level}`
//!   wind components for every standard pressure level
//!
//! A missing required column fails the whole load. Anything wrong inside a
//! single data row is reported as a [`SkipReason`] for that row only.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use csv::{ByteRecord, Position, StringRecord};

use crate::config::BulletinConfig;
use crate::error::{DatasetError, SkipReason};
use crate::models::PressureLevelSample;

const TIME_COLUMNS: [&str; 4] = ["yyyy", "mm", "dd", "hh"];

#[derive(Debug)]
pub struct Dataset {
    pub metadata: ByteRecord,
    pub header: StringRecord,
    rows: Vec<DataRow>,
}

/// One data row with its 1-based line in the file.
#[derive(Debug)]
pub struct DataRow {
    pub line: usize,
    pub record: Result<StringRecord, String>,
}

impl Dataset {
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let file = File::open(path).map_err(|source| DatasetError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: io::Read>(input: R) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);
        // The metadata row is kept as raw bytes; only its presence matters.
        let mut metadata = ByteRecord::new();
        if !reader
            .read_byte_record(&mut metadata)
            .map_err(DatasetError::MalformedHeader)?
        {
            return Err(DatasetError::MissingMetadataRow);
        }
        let mut header = ByteRecord::new();
        if !reader
            .read_byte_record(&mut header)
            .map_err(DatasetError::MalformedHeader)?
        {
            return Err(DatasetError::MissingHeaderRow);
        }
        let header = StringRecord::from_byte_record(header).map_err(DatasetError::HeaderNotUtf8)?;

        // Blank lines are skipped by the reader, so line numbers come from
        // record positions rather than from counting records.
        let mut last_line = header.position().map_or(2, line_of);
        let mut rows = Vec::new();
        for result in reader.records() {
            let position = match &result {
                Ok(record) => record.position(),
                Err(err) => err.position(),
            };
            let line = position.map_or(last_line + 1, line_of);
            last_line = line;
            rows.push(DataRow {
                line,
                record: result.map_err(|e| e.to_string()),
            });
        }

        Ok(Self { metadata, header, rows })
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }
}

fn line_of(position: &Position) -> usize {
    position.line() as usize
}

/// Column positions resolved once from the header row.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    area: (String, usize),
    time: [(&'static str, usize); 4],
    levels: Vec<LevelColumns>,
}

#[derive(Debug, Clone)]
struct LevelColumns {
    level_hpa: i32,
    u: (String, usize),
    v: (String, usize),
}

impl ColumnMap {
    pub fn resolve(header: &StringRecord, config: &BulletinConfig) -> Result<Self, DatasetError> {
        // First occurrence wins when a column name repeats.
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(header.len());
        for (idx, name) in header.iter().enumerate() {
            index.entry(name).or_insert(idx);
        }
        let find = |name: &str| -> Result<(String, usize), DatasetError> {
            index
                .get(name)
                .map(|&idx| (name.to_string(), idx))
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        let area = find(&config.area_column)?;
        let mut time = [("", 0); 4];
        for (slot, name) in time.iter_mut().zip(TIME_COLUMNS) {
            *slot = (name, find(name)?.1);
        }

        let levels = config
            .levels_hpa
            .iter()
            .map(|&level_hpa| -> Result<LevelColumns, DatasetError> {
                Ok(LevelColumns {
                    level_hpa,
                    u: find(&format!("u{level_hpa}"))?,
                    v: find(&format!("v{level_hpa}"))?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { area, time, levels })
    }
}

/// Hour-granularity valid time used to match rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidHour {
    pub yyyy: i32,
    pub mm: u32,
    pub dd: u32,
    pub hh: u32,
}

impl ValidHour {
    /// Truncates minutes and seconds.
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            yyyy: dt.year(),
            mm: dt.month(),
            dd: dt.day(),
            hh: dt.hour(),
        }
    }
}

impl fmt::Display for ValidHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}T{:02}Z", self.yyyy, self.mm, self.dd, self.hh)
    }
}

/// Wind samples of a row that matched the requested valid time.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRow {
    pub area_name: String,
    pub samples: Vec<PressureLevelSample>,
}

/// Read the valid time of a row.
pub fn row_valid_hour(record: &StringRecord, columns: &ColumnMap) -> Result<ValidHour, SkipReason> {
    let [yyyy, mm, dd, hh] = columns.time;
    let hour = ValidHour {
        yyyy: parse_time_field(record, yyyy)?,
        mm: parse_time_field(record, mm)?,
        dd: parse_time_field(record, dd)?,
        hh: parse_time_field(record, hh)?,
    };

    let valid = NaiveDate::from_ymd_opt(hour.yyyy, hour.mm, hour.dd)
        .and_then(|date| date.and_hms_opt(hour.hh, 0, 0))
        .is_some();
    if !valid {
        return Err(SkipReason::ImpossibleTimestamp {
            yyyy: hour.yyyy,
            mm: hour.mm,
            dd: hour.dd,
            hh: hour.hh,
        });
    }
    Ok(hour)
}

/// Check one row against `target`. Wind columns are only parsed for matching
/// rows; `Ok(None)` means the row is for another valid time.
pub fn select_row(
    record: &StringRecord,
    columns: &ColumnMap,
    target: ValidHour,
) -> Result<Option<SelectedRow>, SkipReason> {
    let valid_hour = row_valid_hour(record, columns)?;
    if valid_hour != target {
        return Ok(None);
    }

    let (area_column, area_idx) = &columns.area;
    let area_name = match record.get(*area_idx) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(SkipReason::MissingField(area_column.clone())),
    };

    let mut samples = Vec::with_capacity(columns.levels.len());
    for level in &columns.levels {
        let u = parse_wind_field(record, &level.u)?;
        let v = parse_wind_field(record, &level.v)?;
        // Levels with a blank component are left out; the profile builder
        // reports them as missing level data.
        if let (Some(u_ms), Some(v_ms)) = (u, v) {
            samples.push(PressureLevelSample {
                level_hpa: level.level_hpa,
                u_ms,
                v_ms,
            });
        }
    }

    Ok(Some(SelectedRow { area_name, samples }))
}

fn parse_time_field<T: std::str::FromStr>(
    record: &StringRecord,
    (column, idx): (&'static str, usize),
) -> Result<T, SkipReason> {
    let value = record.get(idx).unwrap_or_default();
    value.parse().map_err(|_| SkipReason::InvalidTimestamp {
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn parse_wind_field(record: &StringRecord, (column, idx): &(String, usize)) -> Result<Option<f64>, SkipReason> {
    let value = match record.get(*idx) {
        Some(value) if !value.is_empty() => value,
        _ => return Ok(None),
    };
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
        _ => Err(SkipReason::MalformedNumber {
            column: column.clone(),
            value: value.to_string(),
        }),
    }
}
