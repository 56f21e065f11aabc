//! Quantity text under each matched icon.

use image::GrayImage;
use tracing::{debug, warn};

use super::{QuantityReading, TemplateOutcome};
use crate::config::ExtractionConfig;
use crate::error::SkipReason;
use crate::ocr::{parse_quantity, OcrRequest, TextRecognizer};
use crate::vision::{crop_rect, quantity_rect, threshold_bright_text, MatchCandidate, TemplateDescriptor};

/// Recognizes the quantity printed below one accepted match.
pub fn read_quantity<'a>(
    gray: &GrayImage,
    candidate: MatchCandidate<'a>,
    config: &ExtractionConfig,
    recognizer: &dyn TextRecognizer,
) -> Result<QuantityReading<'a>, SkipReason> {
    let rect = quantity_rect(
        candidate.top_left,
        candidate.template.dimensions(),
        &config.quantity_region,
        gray.dimensions(),
    )
    .ok_or(SkipReason::QuantityOutOfBounds)?;

    let band = threshold_bright_text(
        &crop_rect(gray, &rect),
        config.quantity_region.binarize_threshold,
    );

    let text = recognizer
        .recognize(&band, &OcrRequest::quantity(&config.ocr))
        .map_err(|e| SkipReason::Recognition(e.to_string()))?;

    let amount = parse_quantity(&text).ok_or_else(|| SkipReason::UnreadableQuantity {
        text: text.trim().to_string(),
    })?;

    debug!(
        "'{}' quantity text {:?} -> {}",
        candidate.template.name,
        text.trim(),
        amount
    );

    Ok(QuantityReading {
        candidate,
        text: text.trim().to_string(),
        amount,
    })
}

/// Turns per-template match results into per-template quantity outcomes.
///
/// Failures stay attached to their template; processing always continues.
pub fn read_quantities<'a>(
    gray: &GrayImage,
    matches: Vec<(&'a TemplateDescriptor, Result<MatchCandidate<'a>, SkipReason>)>,
    config: &ExtractionConfig,
    recognizer: &dyn TextRecognizer,
) -> Vec<TemplateOutcome<'a>> {
    matches
        .into_iter()
        .map(|(template, matched)| {
            let result = matched.and_then(|candidate| read_quantity(gray, candidate, config, recognizer));

            if let Err(reason @ (SkipReason::UnreadableQuantity { .. } | SkipReason::Recognition(_))) =
                &result
            {
                warn!("'{}' matched but skipped: {}", template.name, reason);
            }

            TemplateOutcome { template, result }
        })
        .collect()
}
