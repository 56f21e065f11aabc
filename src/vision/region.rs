//! Region derivation relative to the anchor landmark.
//!
//! All offsets come from [`ExtractionConfig`]; nothing here looks at pixels.

use serde::Serialize;

use crate::config::{ExtractionConfig, QuantityRegion, RegionOffset};

/// An axis-aligned rectangle that lies fully inside an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Clips a possibly out-of-bounds rectangle to `(img_w, img_h)`.
    ///
    /// Returns `None` when nothing of the rectangle remains.
    pub fn clipped(x: i64, y: i64, width: u32, height: u32, img_w: u32, img_h: u32) -> Option<Self> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width as i64).min(img_w as i64);
        let y1 = (y + height as i64).min(img_h as i64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

/// Accepted anchor location.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Anchor {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub confidence: f32,
}

/// Song and prize rectangles for one screenshot; `None` means fully outside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutRegions {
    pub song: Option<PixelRect>,
    pub prize: Option<PixelRect>,
}

/// Computes the song-name box (from the anchor's top-left) and the prize-list
/// box (from the anchor's bottom-left), clipped to the image.
pub fn resolve_regions(anchor: &Anchor, config: &ExtractionConfig, dims: (u32, u32)) -> LayoutRegions {
    let song = place(anchor.x, anchor.y, &config.song_region, dims);
    let prize = place(anchor.x, anchor.y + anchor.height, &config.prize_region, dims);
    LayoutRegions { song, prize }
}

fn place(ref_x: u32, ref_y: u32, offset: &RegionOffset, (img_w, img_h): (u32, u32)) -> Option<PixelRect> {
    PixelRect::clipped(
        ref_x as i64 + offset.dx as i64,
        ref_y as i64 + offset.dy as i64,
        offset.width,
        offset.height,
        img_w,
        img_h,
    )
}

/// Quantity band under a matched icon at absolute `(mx, my)` with size `(tw, th)`.
pub fn quantity_rect(
    (mx, my): (u32, u32),
    (tw, th): (u32, u32),
    region: &QuantityRegion,
    (img_w, img_h): (u32, u32),
) -> Option<PixelRect> {
    PixelRect::clipped(
        mx as i64 + region.dx as i64,
        my as i64 + th as i64 + region.dy as i64,
        tw.saturating_add(region.extra_width),
        region.height,
        img_w,
        img_h,
    )
}
