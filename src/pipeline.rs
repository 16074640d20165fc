//! Dataset in, bulletin artifact out.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::bulletin;
use crate::config::BulletinConfig;
use crate::dataset::{row_valid_hour, select_row, ColumnMap, DataRow, Dataset, SelectedRow, ValidHour};
use crate::error::{DatasetError, SkipReason};
use crate::layers;
use crate::models::{AreaBulletin, BatchHeader, ReportBatch, RowOutcome, RowSkip, RunSummary};
use crate::profile;
use crate::wind;

#[derive(Debug)]
pub struct RunOutput {
    pub batch: ReportBatch,
    pub valid_hour: ValidHour,
    pub rows_scanned: usize,
    pub skipped: Vec<(usize, SkipReason)>,
}

impl RunOutput {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            valid_time: self.valid_hour.to_string(),
            rows_scanned: self.rows_scanned,
            bulletins: self.batch.bulletins.len(),
            skipped: self.skipped.len(),
            skips: self
                .skipped
                .iter()
                .map(|(line, reason)| RowSkip {
                    line: *line,
                    reason: reason.to_string(),
                })
                .collect(),
        }
    }
}

/// Profile, interpolate, and convert one matched row.
pub fn build_bulletin(selected: SelectedRow, config: &BulletinConfig) -> Result<AreaBulletin, SkipReason> {
    let profile = profile::build_profile(&config.levels_hpa, &selected.samples)?;
    let layers = layers::interpolate_layers(&profile, &config.sorted_layer_tops())
        .iter()
        .map(wind::to_layer_report)
        .collect();
    Ok(AreaBulletin {
        area_name: selected.area_name,
        layers,
    })
}

pub fn process_row(row: &DataRow, columns: &ColumnMap, target: ValidHour, config: &BulletinConfig) -> RowOutcome {
    let skipped = |reason| RowOutcome::Skipped { line: row.line, reason };

    let record = match &row.record {
        Ok(record) => record,
        Err(message) => return skipped(SkipReason::Record(message.clone())),
    };

    match select_row(record, columns, target) {
        Ok(Some(selected)) => match build_bulletin(selected, config) {
            Ok(bulletin) => RowOutcome::Matched(bulletin),
            Err(reason) => skipped(reason),
        },
        Ok(None) => RowOutcome::NotMatched,
        Err(reason) => skipped(reason),
    }
}

/// Build every bulletin for `header.forecast_end` from an already loaded
/// dataset. Fails only on structural problems.
pub fn generate_from_dataset(
    dataset: &Dataset,
    config: &BulletinConfig,
    header: BatchHeader,
) -> Result<RunOutput, DatasetError> {
    let columns = ColumnMap::resolve(&dataset.header, config)?;
    let valid_hour = ValidHour::from_datetime(&header.forecast_end);
    debug!(valid_time = %valid_hour, levels = config.levels_hpa.len(), "Selecting rows");

    let mut bulletins = Vec::new();
    let mut skipped = Vec::new();

    for row in dataset.rows() {
        match process_row(row, &columns, valid_hour, config) {
            RowOutcome::Matched(bulletin) => {
                debug!(line = row.line, area = %bulletin.area_name, "Built bulletin");
                bulletins.push(bulletin);
            }
            RowOutcome::NotMatched => {}
            RowOutcome::Skipped { line, reason } => {
                warn!(line, reason = %reason, "Skipping row");
                skipped.push((line, reason));
            }
        }
    }

    if bulletins.is_empty() {
        let available: Vec<String> = available_hours(dataset, &columns)
            .iter()
            .map(ToString::to_string)
            .collect();
        warn!(valid_time = %valid_hour, ?available, "No rows match the requested valid time");
    }

    Ok(RunOutput {
        batch: ReportBatch { header, bulletins },
        valid_hour,
        rows_scanned: dataset.rows().len(),
        skipped,
    })
}

fn available_hours(dataset: &Dataset, columns: &ColumnMap) -> BTreeSet<ValidHour> {
    dataset
        .rows()
        .iter()
        .filter_map(|row| row.record.as_ref().ok())
        .filter_map(|record| row_valid_hour(record, columns).ok())
        .collect()
}

pub fn generate(config: &BulletinConfig, input: &Path, header: BatchHeader) -> Result<RunOutput, DatasetError> {
    let dataset = Dataset::from_path(input)?;
    let metadata: Vec<_> = dataset.metadata.iter().map(String::from_utf8_lossy).collect();
    info!(
        path = %input.display(),
        metadata = %metadata.join(","),
        rows = dataset.rows().len(),
        "Loaded dataset"
    );
    generate_from_dataset(&dataset, config, header)
}

/// Overwrite `path` with `text`, creating the parent directory if needed.
pub fn write_artifact(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Full run: validate, load, build, and only then write the artifact.
pub fn run(config: &BulletinConfig, input: &Path, out: &Path, header: BatchHeader) -> anyhow::Result<RunSummary> {
    config.validate().context("invalid bulletin configuration")?;
    let output = generate(config, input, header)?;
    let text = bulletin::render_batch(&output.batch, &config.header);
    write_artifact(out, &text)?;

    let summary = output.summary();
    info!(
        path = %out.display(),
        valid_time = %summary.valid_time,
        rows_scanned = summary.rows_scanned,
        bulletins = summary.bulletins,
        skipped = summary.skipped,
        "Wrote bulletins"
    );
    Ok(summary)
}
