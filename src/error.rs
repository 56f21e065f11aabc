//! Error taxonomy for extraction and statistics.
//!
//! Only [`ExtractError`] aborts an extraction call. Per-template problems are
//! [`SkipReason`] values collected next to the successful matches, and an
//! unlocatable anchor is a regular result rather than an error.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a whole extraction call.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("anchor template '{name}' not found in {dir}")]
    MissingAnchorTemplate { name: String, dir: PathBuf },

    #[error("failed to read template directory {dir}: {source}")]
    TemplateDirectory {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single template contributed no drop entry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("template {template_w}x{template_h} does not fit region {region_w}x{region_h}")]
    TemplateTooLarge {
        template_w: u32,
        template_h: u32,
        region_w: u32,
        region_h: u32,
    },

    #[error("best match {confidence:.3} below threshold {threshold:.3}")]
    BelowThreshold { confidence: f32, threshold: f32 },

    #[error("quantity region lies outside the image")]
    QuantityOutOfBounds,

    #[error("no digits in recognized text {text:?}")]
    UnreadableQuantity { text: String },

    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Reasons a statistics query has nothing to report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoData {
    #[error("No data has been recorded yet.")]
    EmptyLog,

    #[error("No data found for songs containing \"{filter}\".")]
    NoMatchingRecords { filter: String },
}
