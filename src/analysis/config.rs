//! Chart configuration loaded from chart_config.json.
//!
//! If the config file doesn't exist, default values are used.
//! The file is read fresh each time a chart is generated.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub font: FontConfig,
    /// Colors (RGB values)
    pub colors: ColorConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub title_size: u32,
    pub axis_label_size: u32,
    /// Value printed above each bar
    pub bar_label_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub bar: [u8; 3],
    pub bar_outline: [u8; 3],
    pub background: [u8; 3],
    pub grid_color: [u8; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub chart_width: u32,
    pub chart_height: u32,
    /// Item names longer than this are shortened on the x axis
    pub max_label_chars: usize,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            title_size: 28,
            axis_label_size: 14,
            bar_label_size: 13,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            bar: [243, 156, 18],         // #F39C12
            bar_outline: [230, 126, 34], // #E67E22
            background: [245, 245, 245],
            grid_color: [220, 220, 220],
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            chart_width: 1000,
            chart_height: 600,
            max_label_chars: 12,
        }
    }
}

impl ChartConfig {
    /// Load config from file, or return defaults if the file is missing or invalid.
    pub fn load(config_path: &Path) -> Self {
        if config_path.exists() {
            match fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => {
                        info!("Loaded chart config from {}", config_path.display());
                        return config;
                    }
                    Err(e) => warn!("Failed to parse chart config: {}. Using defaults.", e),
                },
                Err(e) => warn!("Failed to read chart config: {}. Using defaults.", e),
            }
        }
        Self::default()
    }
}

pub(crate) fn rgb(color: [u8; 3]) -> plotters::style::RGBColor {
    plotters::style::RGBColor(color[0], color[1], color[2])
}
