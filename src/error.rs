//! Error types for bulletin generation.
//!
//! Structural problems (`DatasetError`, `ConfigError`) abort the run before
//! any artifact is written. Row-level problems are `SkipReason`s: the row is
//! dropped, logged, and counted, and the scan carries on.

use thiserror::Error;

use crate::config::MAX_HORIZON_HOURS;

/// Fatal problems with the input dataset as a whole.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset has no metadata row")]
    MissingMetadataRow,

    #[error("dataset has no header row")]
    MissingHeaderRow,

    #[error("failed to parse dataset header: {0}")]
    MalformedHeader(#[source] csv::Error),

    #[error("dataset header is not valid UTF-8: {0}")]
    HeaderNotUtf8(#[source] csv::FromUtf8Error),

    #[error("dataset header is missing required column '{0}'")]
    MissingColumn(String),
}

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("at least one pressure level must be configured")]
    NoLevels,

    #[error("pressure level {0} hPa must be positive")]
    NonPositiveLevel(i32),

    #[error("pressure level {0} hPa is configured more than once")]
    DuplicateLevel(i32),

    #[error("at least one altitude layer must be configured")]
    NoLayers,

    #[error("layer top {0} km must be at least 1 km")]
    LayerTooLow(u32),

    #[error("layer top {0} km does not fit the two-digit layer field")]
    LayerTooHigh(u32),

    #[error("layer top {0} km is configured more than once")]
    DuplicateLayer(u32),

    #[error("static header line '{0}' must not be empty")]
    EmptyHeaderLine(&'static str),

    #[error("area column name must not be empty")]
    EmptyAreaColumn,

    #[error("forecast horizon {0} h must be between 1 and {max} h", max = MAX_HORIZON_HOURS)]
    InvalidHorizon(i64),
}

/// Why a single dataset row was left out of the batch.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SkipReason {
    #[error("unreadable CSV record: {0}")]
    Record(String),

    #[error("row has no value for column '{0}'")]
    MissingField(String),

    #[error("invalid timestamp field '{column}': '{value}'")]
    InvalidTimestamp { column: String, value: String },

    #[error("timestamp {yyyy:04}/{mm:02}/{dd:02}/{hh:02} is not a valid date and hour")]
    ImpossibleTimestamp { yyyy: i32, mm: u32, dd: u32, hh: u32 },

    #[error("malformed number in column '{column}': '{value}'")]
    MalformedNumber { column: String, value: String },

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Problems building a vertical profile.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProfileError {
    #[error("pressure level {0} hPa is outside the standard atmosphere model")]
    InvalidPressure(i32),

    #[error("missing wind data for level {0} hPa")]
    MissingLevelData(i32),

    #[error("pressure level {0} hPa appears more than once in one profile")]
    DuplicateLevel(i32),

    #[error("profile has no samples")]
    Empty,
}
