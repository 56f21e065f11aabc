//! Configuration types for extraction.
//!
//! Loads settings from config.json at startup. Provides match thresholds,
//! the multiplier baseline, reserved template names and the fixed region
//! offsets of the result screen layout. The loaded value is passed explicitly
//! into every extraction call.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A rectangle placed at a fixed pixel offset from a reference point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionOffset {
    /// Horizontal offset from the reference point (negative = left)
    pub dx: i32,
    /// Vertical offset from the reference point (negative = up)
    pub dy: i32,
    pub width: u32,
    pub height: u32,
}

/// Where the quantity text sits relative to a matched item icon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantityRegion {
    /// Horizontal offset from the match's left edge
    pub dx: i32,
    /// Vertical offset from the icon's bottom edge
    pub dy: i32,
    /// Added to the template width
    pub extra_width: u32,
    /// Height of the band that holds the digits
    pub height: u32,
    /// Pixels darker than this become black text on white after inversion
    pub binarize_threshold: u8,
}

impl Default for QuantityRegion {
    fn default() -> Self {
        Self {
            dx: 0,
            dy: -10,
            extra_width: 0,
            height: 50,
            binarize_threshold: 180,
        }
    }
}

/// Tesseract settings for the two recognition modes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub song_language: String,
    pub song_psm: u8,
    pub quantity_language: String,
    pub quantity_psm: u8,
    pub quantity_whitelist: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            song_language: "jpn".to_string(),
            song_psm: 6,
            quantity_language: "eng".to_string(),
            quantity_psm: 7,
            quantity_whitelist: "x0123456789".to_string(),
        }
    }
}

/// Tunable constants of the extraction pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum confidence for the anchor landmark (0.0-1.0)
    #[serde(default = "default_anchor_threshold")]
    pub anchor_threshold: f32,
    /// Minimum confidence for item templates (0.0-1.0)
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    /// Multiplier-source quantity that corresponds to a 1.0x run
    #[serde(default = "default_base_multiplier_amount")]
    pub base_multiplier_amount: f64,
    /// File stem of the anchor template
    #[serde(default = "default_anchor_template")]
    pub anchor_template: String,
    /// File stem of the multiplier-source template
    #[serde(default = "default_multiplier_template")]
    pub multiplier_template: String,
    /// Adaptive binarization window radius; 0 keeps plain greyscale
    #[serde(default = "default_adaptive_block_radius")]
    pub adaptive_block_radius: u32,
    /// Song title box, relative to the anchor's top-left corner
    #[serde(default = "default_song_region")]
    pub song_region: RegionOffset,
    /// Prize list box, relative to the anchor's bottom-left corner
    #[serde(default = "default_prize_region")]
    pub prize_region: RegionOffset,
    #[serde(default)]
    pub quantity_region: QuantityRegion,
    #[serde(default)]
    pub ocr: OcrConfig,
}

fn default_anchor_threshold() -> f32 {
    0.70
}

fn default_match_threshold() -> f32 {
    0.80
}

fn default_base_multiplier_amount() -> f64 {
    200.0
}

fn default_anchor_template() -> String {
    "anchor".to_string()
}

fn default_multiplier_template() -> String {
    "style_point".to_string()
}

fn default_adaptive_block_radius() -> u32 {
    7
}

fn default_song_region() -> RegionOffset {
    RegionOffset {
        dx: -50,
        dy: -60,
        width: 400,
        height: 50,
    }
}

fn default_prize_region() -> RegionOffset {
    RegionOffset {
        dx: -40,
        dy: 10,
        width: 640,
        height: 360,
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            anchor_threshold: default_anchor_threshold(),
            match_threshold: default_match_threshold(),
            base_multiplier_amount: default_base_multiplier_amount(),
            anchor_template: default_anchor_template(),
            multiplier_template: default_multiplier_template(),
            adaptive_block_radius: default_adaptive_block_radius(),
            song_region: default_song_region(),
            prize_region: default_prize_region(),
            quantity_region: QuantityRegion::default(),
            ocr: OcrConfig::default(),
        }
    }
}

impl ExtractionConfig {
    /// Clamps thresholds into [0, 1] and replaces a non-positive baseline.
    pub fn validated(mut self) -> Self {
        self.anchor_threshold = clamp_threshold("anchor_threshold", self.anchor_threshold);
        self.match_threshold = clamp_threshold("match_threshold", self.match_threshold);

        if !(self.base_multiplier_amount.is_finite() && self.base_multiplier_amount > 0.0) {
            warn!(
                "base_multiplier_amount {} is not positive, using {}",
                self.base_multiplier_amount,
                default_base_multiplier_amount()
            );
            self.base_multiplier_amount = default_base_multiplier_amount();
        }

        self
    }
}

fn clamp_threshold(name: &str, value: f32) -> f32 {
    if (0.0..=1.0).contains(&value) {
        return value;
    }
    let clamped = if value.is_nan() { 1.0 } else { value.clamp(0.0, 1.0) };
    warn!("{} {} out of range, using {}", name, value, clamped);
    clamped
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Directory holding one image per item template
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    /// Append-only CSV record log
    #[serde(default = "default_drop_log")]
    pub drop_log: PathBuf,
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_drop_log() -> PathBuf {
    PathBuf::from("drop_data.csv")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            templates_dir: default_templates_dir(),
            drop_log: default_drop_log(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from `config_path` or returns defaults.
    ///
    /// A missing, unreadable or invalid file is logged and replaced by defaults.
    /// Relative paths in the file are resolved against the executable directory.
    pub fn load(config_path: &Path) -> Self {
        info!("Looking for config at: {}", config_path.display());

        let mut config = if config_path.exists() {
            match fs::read_to_string(config_path) {
                Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                    Ok(config) => {
                        info!("Config loaded from {}", config_path.display());
                        config
                    }
                    Err(e) => {
                        warn!("Failed to parse {}: {}. Using defaults.", config_path.display(), e);
                        AppConfig::default()
                    }
                },
                Err(e) => {
                    warn!("Failed to read {}: {}. Using defaults.", config_path.display(), e);
                    AppConfig::default()
                }
            }
        } else {
            info!("{} not found. Using default config.", config_path.display());
            AppConfig::default()
        };

        config.extraction = config.extraction.validated();
        config.templates_dir = crate::paths::resolve(&config.templates_dir);
        config.drop_log = crate::paths::resolve(&config.drop_log);
        config
    }
}
