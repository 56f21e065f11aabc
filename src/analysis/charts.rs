//! Drop rate bar chart using plotters.
//!
//! One bar per item, height = drop rate, average amount per run printed above.
//! Styling is configurable via chart_config.json.

use super::config::{rgb, ChartConfig};
use super::statistics::DropStats;
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

/// Upper bound of the rate axis: the highest rate rounded up to a multiple of 10.
fn rate_axis_max(stats: &DropStats) -> f64 {
    let highest = stats
        .items
        .iter()
        .map(|s| s.drop_rate_percent)
        .fold(0.0f64, f64::max);
    ((highest / 10.0).ceil() * 10.0).clamp(10.0, 100.0)
}

/// Shortens `name` to `max_chars` characters, marking the cut with "…".
fn axis_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars || max_chars == 0 {
        return name.to_string();
    }
    let mut label: String = name.chars().take(max_chars.saturating_sub(1)).collect();
    label.push('…');
    label
}

/// Renders the drop rate chart to a PNG file.
pub fn generate_drop_rate_chart(stats: &DropStats, output_path: &Path, config: &ChartConfig) -> Result<()> {
    let root = BitMapBackend::new(
        output_path,
        (config.layout.chart_width, config.layout.chart_height),
    )
    .into_drawing_area();
    root.fill(&rgb(config.colors.background))
        .context("Failed to fill chart background")?;

    let title = match &stats.song_filter {
        Some(filter) => format!("{} drop rates ({} runs)", filter, stats.total_runs),
        None => format!("Drop rates ({} runs)", stats.total_runs),
    };

    let labels: Vec<String> = stats
        .items
        .iter()
        .map(|s| axis_label(&s.item, config.layout.max_label_chars))
        .collect();
    let bar_count = stats.items.len().max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", config.font.title_size))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0f64..bar_count as f64, 0.0f64..rate_axis_max(stats) * 1.1)
        .context("Failed to build drop rate chart")?;

    let grid_color = rgb(config.colors.grid_color);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bar_count)
        .x_label_formatter(&|x| {
            let idx = x.floor() as usize;
            labels.get(idx).cloned().unwrap_or_default()
        })
        .y_desc("Drop rate (%)")
        .y_label_formatter(&|y| format!("{:.0}", y))
        .label_style(("sans-serif", config.font.axis_label_size))
        .light_line_style(grid_color)
        .bold_line_style(grid_color.mix(0.8))
        .draw()
        .context("Failed to draw mesh")?;

    let bar = rgb(config.colors.bar);
    let outline = rgb(config.colors.bar_outline);
    let bar_width = 0.35;

    for (idx, item) in stats.items.iter().enumerate() {
        let x_center = idx as f64 + 0.5;
        let corners = [
            (x_center - bar_width, 0.0),
            (x_center + bar_width, item.drop_rate_percent),
        ];

        chart.draw_series(std::iter::once(Rectangle::new(corners, bar.filled())))?;
        chart.draw_series(std::iter::once(Rectangle::new(corners, outline.stroke_width(1))))?;

        chart.draw_series(std::iter::once(Text::new(
            format!("{:.1}% / {:.2}", item.drop_rate_percent, item.avg_amount_per_run),
            (x_center - bar_width, item.drop_rate_percent + 1.0),
            ("sans-serif", config.font.bar_label_size).into_font().color(&BLACK),
        )))?;
    }

    root.present().context("Failed to save drop rate chart")?;
    Ok(())
}
