//! Drop statistics over the persisted record log.
//!
//! This module provides:
//! - CSV reading for the drop log
//! - Per-item drop rate and average amount aggregation
//! - The text report shown by the `stats` command
//! - JSON export and a drop rate chart

pub mod charts;
pub mod config;
pub mod csv_reader;
pub mod export;
pub mod report;
pub mod statistics;

pub use csv_reader::{read_records, DropRecord};
pub use statistics::{compute_stats, DropStats, ItemStats};

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::NoData;

/// Loads the log and aggregates it; `Err(NoData)` inside `Ok` when there is nothing to show.
pub fn load_stats(log_path: &Path, song_filter: Option<&str>) -> Result<Result<DropStats, NoData>> {
    let records = read_records(log_path)?;
    info!("Loaded {} records from {}", records.len(), log_path.display());
    Ok(compute_stats(&records, song_filter))
}

/// Formatted report, or the no-data message.
pub fn stats_report(log_path: &Path, song_filter: Option<&str>) -> Result<String> {
    Ok(match load_stats(log_path, song_filter)? {
        Ok(stats) => report::format_report(&stats),
        Err(no_data) => no_data.to_string(),
    })
}

/// Files written by [`export_stats`].
#[derive(Debug, Default)]
pub struct ExportOutput {
    pub json: Option<PathBuf>,
    pub chart: Option<PathBuf>,
}

/// Writes the statistics as JSON and/or a chart.
pub fn export_stats(
    stats: &DropStats,
    json_path: Option<&Path>,
    chart_path: Option<&Path>,
    chart_config: &config::ChartConfig,
) -> Result<ExportOutput> {
    let mut output = ExportOutput::default();

    if let Some(path) = json_path {
        export::export_to_json(stats, path)?;
        info!("Statistics JSON saved: {}", path.display());
        output.json = Some(path.to_path_buf());
    }

    if let Some(path) = chart_path {
        charts::generate_drop_rate_chart(stats, path, chart_config)?;
        info!("Drop rate chart saved: {}", path.display());
        output.chart = Some(path.to_path_buf());
    }

    Ok(output)
}
