//! Result screen extraction.
//!
//! One call turns one screenshot into an [`ExtractionResult`]:
//! anchor search, region layout, song title OCR, prize template matching,
//! quantity OCR, multiplier resolution and normalization.

pub mod multiplier;
pub mod normalize;
pub mod quantity;

#[cfg(test)]
pub(crate) mod fixtures;

use image::{DynamicImage, GrayImage};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, SkipReason};
use crate::ocr::{clean_song_name, OcrRequest, TextRecognizer};
use crate::vision::{
    crop_rect, load_image, locate_anchor, match_prize_templates, preprocess, resolve_regions,
    MatchCandidate, PixelRect, TemplateDescriptor, TemplateLibrary,
};

pub use multiplier::{resolve_multiplier, Multiplier};
pub use normalize::normalize_drops;
pub use quantity::{read_quantities, read_quantity};

/// Song name used when the title cannot be read.
pub const UNKNOWN_SONG: &str = "Unknown";

/// One item's contribution to a run, already divided by the multiplier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropEntry {
    pub item: String,
    pub normalized_amount: f64,
}

/// Everything extracted from one result screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub song_name: String,
    pub multiplier: f64,
    /// Ordinary items in library order; never contains the multiplier source
    pub drops: Vec<DropEntry>,
}

impl ExtractionResult {
    /// Result for a screenshot whose layout could not be located.
    pub fn unknown_layout() -> Self {
        Self {
            song_name: UNKNOWN_SONG.to_string(),
            multiplier: Multiplier::BASELINE.value(),
            drops: Vec::new(),
        }
    }
}

/// A recognized quantity below an accepted match.
#[derive(Debug, Clone)]
pub struct QuantityReading<'a> {
    pub candidate: MatchCandidate<'a>,
    pub text: String,
    pub amount: u32,
}

/// What happened to one library template during an extraction.
#[derive(Debug, Clone)]
pub struct TemplateOutcome<'a> {
    pub template: &'a TemplateDescriptor,
    pub result: Result<QuantityReading<'a>, SkipReason>,
}

/// Decodes `path` and extracts its drops.
pub fn extract_file(
    path: &Path,
    library: &TemplateLibrary,
    config: &ExtractionConfig,
    recognizer: &dyn TextRecognizer,
) -> Result<ExtractionResult, ExtractError> {
    let img = load_image(path)?;
    info!("Extracting {} ({}x{})", path.display(), img.width(), img.height());
    Ok(extract_drops(&img, library, config, recognizer))
}

/// Extracts song name, multiplier and normalized drops from a decoded screenshot.
///
/// Never fails: an unlocatable anchor yields [`ExtractionResult::unknown_layout`]
/// and per-template problems only drop that template.
pub fn extract_drops(
    img: &DynamicImage,
    library: &TemplateLibrary,
    config: &ExtractionConfig,
    recognizer: &dyn TextRecognizer,
) -> ExtractionResult {
    let gray = img.to_luma8();
    let processed = preprocess(img, config.adaptive_block_radius);

    let Some(anchor) = locate_anchor(&processed, library, config.anchor_threshold) else {
        return ExtractionResult::unknown_layout();
    };

    let regions = resolve_regions(&anchor, config, gray.dimensions());
    let song_name = read_song_name(&gray, regions.song, config, recognizer);

    let outcomes = match regions.prize {
        Some(prize) => {
            let prize_pixels = crop_rect(&processed, &prize);
            let matches = match_prize_templates(&prize_pixels, &prize, library, config.match_threshold);
            read_quantities(&gray, matches, config, recognizer)
        }
        None => {
            warn!("Prize region lies outside the image");
            Vec::new()
        }
    };

    let multiplier = resolve_multiplier(&outcomes, config.base_multiplier_amount);
    let drops = normalize_drops(&outcomes, multiplier);

    info!(
        "Song '{}', multiplier {}, {} drop(s)",
        song_name,
        multiplier.value(),
        drops.len()
    );

    ExtractionResult {
        song_name,
        multiplier: multiplier.value(),
        drops,
    }
}

/// Reads the song title from the greyscale song box, or [`UNKNOWN_SONG`].
fn read_song_name(
    gray: &GrayImage,
    region: Option<PixelRect>,
    config: &ExtractionConfig,
    recognizer: &dyn TextRecognizer,
) -> String {
    let Some(rect) = region else {
        warn!("Song region lies outside the image");
        return UNKNOWN_SONG.to_string();
    };

    match recognizer.recognize(&crop_rect(gray, &rect), &OcrRequest::song_title(&config.ocr)) {
        Ok(text) => clean_song_name(&text).unwrap_or_else(|| {
            info!("Song title empty after OCR");
            UNKNOWN_SONG.to_string()
        }),
        Err(e) => {
            warn!("Song title OCR failed: {}", e);
            UNKNOWN_SONG.to_string()
        }
    }
}
