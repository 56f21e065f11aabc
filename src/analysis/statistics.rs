//! Drop rate aggregation over the record log.
//!
//! A run is the set of records sharing one timestamp. Rates and averages are
//! taken over all runs of the (optionally filtered) log, so a run in which an
//! item did not drop counts against that item.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::csv_reader::DropRecord;
use crate::error::NoData;

/// Aggregate for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStats {
    pub item: String,
    /// Runs in which the item dropped at least once
    pub drop_runs: usize,
    pub total_amount: f64,
    /// Always within [0, 100]
    pub drop_rate_percent: f64,
    pub avg_amount_per_run: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropStats {
    pub song_filter: Option<String>,
    pub total_runs: usize,
    /// Sorted by drop rate, highest first; equal rates keep item name order
    pub items: Vec<ItemStats>,
}

/// Aggregates `records`, keeping only songs whose name contains `song_filter`.
///
/// The filter is a literal, case-sensitive substring; an empty filter means no
/// filter.
pub fn compute_stats(records: &[DropRecord], song_filter: Option<&str>) -> Result<DropStats, NoData> {
    if records.is_empty() {
        return Err(NoData::EmptyLog);
    }

    let song_filter = song_filter.filter(|f| !f.is_empty());
    let selected: Vec<&DropRecord> = records
        .iter()
        .filter(|r| song_filter.is_none_or(|f| r.song_name.contains(f)))
        .collect();

    let total_runs = selected.iter().map(|r| r.recorded_at).collect::<HashSet<_>>().len();
    if total_runs == 0 {
        return Err(match song_filter {
            Some(filter) => NoData::NoMatchingRecords {
                filter: filter.to_string(),
            },
            None => NoData::EmptyLog,
        });
    }

    let mut per_item: BTreeMap<&str, (HashSet<_>, f64)> = BTreeMap::new();
    for record in &selected {
        let entry = per_item.entry(record.item.as_str()).or_default();
        entry.0.insert(record.recorded_at);
        entry.1 += record.normalized_amount;
    }

    let mut items: Vec<ItemStats> = per_item
        .into_iter()
        .map(|(item, (runs, total_amount))| ItemStats {
            item: item.to_string(),
            drop_runs: runs.len(),
            total_amount,
            drop_rate_percent: 100.0 * runs.len() as f64 / total_runs as f64,
            avg_amount_per_run: total_amount / total_runs as f64,
        })
        .collect();

    // Stable: ties stay in item name order.
    items.sort_by(|a, b| b.drop_rate_percent.total_cmp(&a.drop_rate_percent));

    Ok(DropStats {
        song_filter: song_filter.map(str::to_string),
        total_runs,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(minute: u32, song: &str, item: &str, amount: f64) -> DropRecord {
        DropRecord {
            recorded_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(12, minute, 0)
                .unwrap(),
            song_name: song.to_string(),
            multiplier: 1.0,
            item: item.to_string(),
            normalized_amount: amount,
        }
    }

    fn three_runs() -> Vec<DropRecord> {
        vec![
            record(0, "Night Drive", "gem", 5.0),
            record(0, "Night Drive", "coin", 1.0),
            record(1, "Morning Star", "coin", 2.0),
            record(2, "Night Drive", "gem", 3.0),
        ]
    }

    #[test]
    fn test_rates_over_all_runs() {
        let stats = compute_stats(&three_runs(), None).unwrap();

        assert_eq!(stats.total_runs, 3);
        assert_eq!(stats.items.len(), 2);

        let gem = stats.items.iter().find(|s| s.item == "gem").unwrap();
        assert_eq!(gem.drop_runs, 2);
        assert_eq!(gem.total_amount, 8.0);
        assert!((gem.drop_rate_percent - 66.666_666).abs() < 1e-4);
        assert!((gem.avg_amount_per_run - 2.666_666).abs() < 1e-4);
    }

    #[test]
    fn test_equal_rates_keep_name_order() {
        let stats = compute_stats(&three_runs(), None).unwrap();
        let order: Vec<&str> = stats.items.iter().map(|s| s.item.as_str()).collect();
        assert_eq!(order, vec!["coin", "gem"]);
    }

    #[test]
    fn test_sorted_by_rate_descending() {
        let mut records = three_runs();
        records.push(record(1, "Morning Star", "gem", 1.0));
        records.push(record(2, "Night Drive", "ticket", 1.0));

        let stats = compute_stats(&records, None).unwrap();
        let order: Vec<&str> = stats.items.iter().map(|s| s.item.as_str()).collect();
        assert_eq!(order, vec!["gem", "coin", "ticket"]);
        assert!(stats.items.iter().all(|s| s.drop_rate_percent <= 100.0));
    }

    #[test]
    fn test_song_filter() {
        let stats = compute_stats(&three_runs(), Some("Night")).unwrap();

        assert_eq!(stats.song_filter.as_deref(), Some("Night"));
        assert_eq!(stats.total_runs, 2);
        let gem = stats.items.iter().find(|s| s.item == "gem").unwrap();
        assert_eq!(gem.drop_rate_percent, 100.0);
        assert_eq!(gem.avg_amount_per_run, 4.0);
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let err = compute_stats(&three_runs(), Some("night")).unwrap_err();
        assert_eq!(err, NoData::NoMatchingRecords { filter: "night".to_string() });
    }

    #[test]
    fn test_filter_matching_nothing() {
        let err = compute_stats(&three_runs(), Some("Unplayed Song")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No data found for songs containing \"Unplayed Song\"."
        );
    }

    #[test]
    fn test_empty_filter_means_all_songs() {
        let stats = compute_stats(&three_runs(), Some("")).unwrap();
        assert_eq!(stats.total_runs, 3);
        assert_eq!(stats.song_filter, None);
    }

    #[test]
    fn test_empty_log() {
        assert_eq!(compute_stats(&[], None).unwrap_err(), NoData::EmptyLog);
        assert_eq!(compute_stats(&[], Some("x")).unwrap_err(), NoData::EmptyLog);
    }

    #[test]
    fn test_rate_never_exceeds_hundred() {
        // Several rows of the same item within one run count as one drop run.
        let records = vec![
            record(0, "A", "gem", 1.0),
            record(0, "A", "gem", 2.0),
            record(1, "A", "gem", 1.0),
        ];
        let stats = compute_stats(&records, None).unwrap();
        assert_eq!(stats.items[0].drop_runs, 2);
        assert_eq!(stats.items[0].drop_rate_percent, 100.0);
        assert_eq!(stats.items[0].avg_amount_per_run, 2.0);
    }
}
