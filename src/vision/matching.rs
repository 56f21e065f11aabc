//! Normalized cross-correlation template matching.

use image::GrayImage;
use imageproc::template_matching::{match_template, MatchTemplateMethod};
use tracing::{debug, info};

use super::region::{Anchor, PixelRect};
use super::templates::{TemplateDescriptor, TemplateLibrary};
use crate::error::SkipReason;

/// Best location of one template.
#[derive(Clone, Copy, Debug)]
pub struct MatchCandidate<'a> {
    pub template: &'a TemplateDescriptor,
    /// Absolute image coordinates of the template's top-left corner
    pub top_left: (u32, u32),
    pub confidence: f32,
}

/// Finds the single highest-scoring position of `template` in `image`.
///
/// Scores are normalized cross-correlation in [0, 1]. Positions where the
/// score is undefined (an all-black window) count as 0.
pub fn best_match(image: &GrayImage, template: &GrayImage) -> Result<((u32, u32), f32), SkipReason> {
    let (img_w, img_h) = image.dimensions();
    let (tpl_w, tpl_h) = template.dimensions();

    if tpl_w == 0 || tpl_h == 0 || tpl_w > img_w || tpl_h > img_h {
        return Err(SkipReason::TemplateTooLarge {
            template_w: tpl_w,
            template_h: tpl_h,
            region_w: img_w,
            region_h: img_h,
        });
    }

    let scores = match_template(image, template, MatchTemplateMethod::CrossCorrelationNormalized);

    let mut max_val = 0.0f32;
    let mut max_loc = (0u32, 0u32);
    for (x, y, pixel) in scores.enumerate_pixels() {
        let val = pixel[0];
        if val.is_finite() && val > max_val {
            max_val = val;
            max_loc = (x, y);
        }
    }

    Ok((max_loc, max_val.min(1.0)))
}

/// Searches the whole preprocessed screenshot for the anchor template.
///
/// Returns `None` when the anchor cannot be placed at all (larger than the image).
pub fn find_anchor<'a>(image: &GrayImage, library: &'a TemplateLibrary) -> Option<MatchCandidate<'a>> {
    let template = library.anchor();
    match best_match(image, &template.pixels) {
        Ok((top_left, confidence)) => Some(MatchCandidate {
            template,
            top_left,
            confidence,
        }),
        Err(reason) => {
            info!("Anchor '{}' skipped: {}", template.name, reason);
            None
        }
    }
}

/// Accepts an anchor candidate whose confidence reaches `threshold`.
pub fn accept_anchor(candidate: &MatchCandidate<'_>, threshold: f32) -> Option<Anchor> {
    if candidate.confidence < threshold {
        info!(
            "Anchor not found: confidence {:.3} < {:.3}",
            candidate.confidence, threshold
        );
        return None;
    }

    let (width, height) = candidate.template.dimensions();
    info!(
        "Anchor found at ({}, {}) with confidence {:.3}",
        candidate.top_left.0, candidate.top_left.1, candidate.confidence
    );

    Some(Anchor {
        x: candidate.top_left.0,
        y: candidate.top_left.1,
        width,
        height,
        confidence: candidate.confidence,
    })
}

/// Locates and accepts the anchor in one step.
pub fn locate_anchor(image: &GrayImage, library: &TemplateLibrary, threshold: f32) -> Option<Anchor> {
    find_anchor(image, library).and_then(|candidate| accept_anchor(&candidate, threshold))
}

/// Matches every non-anchor template against the prize region.
///
/// `region_pixels` is the preprocessed crop at `region`; candidate positions are
/// returned in absolute image coordinates. One entry per template, in library order.
pub fn match_prize_templates<'a>(
    region_pixels: &GrayImage,
    region: &PixelRect,
    library: &'a TemplateLibrary,
    threshold: f32,
) -> Vec<(&'a TemplateDescriptor, Result<MatchCandidate<'a>, SkipReason>)> {
    library
        .items()
        .iter()
        .map(|template| {
            let result = best_match(region_pixels, &template.pixels).and_then(|((x, y), confidence)| {
                if confidence < threshold {
                    return Err(SkipReason::BelowThreshold { confidence, threshold });
                }
                Ok(MatchCandidate {
                    template,
                    top_left: (region.x + x, region.y + y),
                    confidence,
                })
            });

            match &result {
                Ok(candidate) => debug!(
                    "'{}' matched at {:?} ({:.3})",
                    template.name, candidate.top_left, candidate.confidence
                ),
                Err(reason) => debug!("'{}' not matched: {}", template.name, reason),
            }

            (template, result)
        })
        .collect()
}
