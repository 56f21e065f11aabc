//! Text report for the `stats` command.

use super::statistics::DropStats;

/// Renders the statistics as a titled, fixed-width table in a code block.
pub fn format_report(stats: &DropStats) -> String {
    let title = match &stats.song_filter {
        Some(filter) => format!("**📊 {} drop rates**", filter),
        None => "**📊 Overall drop rates**".to_string(),
    };

    let mut out = format!("{} (total runs: {})\n", title, stats.total_runs);
    out.push_str("```\n");
    out.push_str(&format!("{:<20} {:<12} {:<15}\n", "Item", "Drop rate", "Avg per run"));
    out.push_str(&format!("{}\n", "-".repeat(50)));
    for item in &stats.items {
        out.push_str(&format!(
            "{:<20} {:>10.2}% {:>12.2}\n",
            item.item, item.drop_rate_percent, item.avg_amount_per_run
        ));
    }
    out.push_str("```");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::statistics::ItemStats;

    fn stats(filter: Option<&str>) -> DropStats {
        DropStats {
            song_filter: filter.map(str::to_string),
            total_runs: 3,
            items: vec![ItemStats {
                item: "gem".to_string(),
                drop_runs: 2,
                total_amount: 8.0,
                drop_rate_percent: 200.0 / 3.0,
                avg_amount_per_run: 8.0 / 3.0,
            }],
        }
    }

    #[test]
    fn test_report_rows() {
        let report = format_report(&stats(None));
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "**📊 Overall drop rates** (total runs: 3)");
        assert_eq!(lines[1], "```");
        assert_eq!(lines[4], format!("{:<20} {:>10}% {:>12}", "gem", "66.67", "2.67"));
        assert_eq!(*lines.last().unwrap(), "```");
    }

    #[test]
    fn test_header_and_rule() {
        let report = format_report(&stats(None));
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[2], format!("{:<20} {:<12} {:<15}", "Item", "Drop rate", "Avg per run"));
        assert_eq!(lines[3], "-".repeat(50));
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_filtered_title() {
        let report = format_report(&stats(Some("Night")));
        assert!(report.starts_with("**📊 Night drop rates** (total runs: 3)"));
    }
}
