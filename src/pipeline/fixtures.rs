//! Synthetic result screens and a scripted recognizer for extraction tests.
//!
//! Screens are 200x160, black, with binary patterns pasted in. Patterns are
//! chosen so each template only correlates strongly with itself.

use anyhow::{anyhow, Result};
use image::{DynamicImage, GrayImage, Luma};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::config::{ExtractionConfig, RegionOffset};
use crate::ocr::{OcrRequest, TextRecognizer};
use crate::vision::{TemplateDescriptor, TemplateLibrary, TemplateRole};

pub const SCREEN_SIZE: (u32, u32) = (200, 160);
pub const ANCHOR_AT: (u32, u32) = (60, 40);

/// Icon placements inside the prize box of an anchor at [`ANCHOR_AT`].
pub const COIN: Icon = Icon { kind: IconKind::Coin, at: (30, 72) };
pub const GEM: Icon = Icon { kind: IconKind::Gem, at: (80, 72) };
pub const STYLE_POINT: Icon = Icon { kind: IconKind::StylePoint, at: (130, 72) };

#[derive(Clone, Copy)]
pub enum IconKind {
    Coin,
    Gem,
    StylePoint,
}

#[derive(Clone, Copy)]
pub struct Icon {
    pub kind: IconKind,
    pub at: (u32, u32),
}

pub struct Fixture {
    pub library: TemplateLibrary,
    pub config: ExtractionConfig,
}

fn checker(width: u32, height: u32, cell: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 { Luma([255]) } else { Luma([0]) }
    })
}

pub fn anchor_pattern() -> GrayImage {
    checker(24, 12, 4)
}

pub fn icon_pattern(kind: IconKind) -> GrayImage {
    match kind {
        IconKind::Coin => GrayImage::from_fn(12, 12, |_, y| Luma([if (y / 2) % 2 == 0 { 255 } else { 0 }])),
        IconKind::Gem => GrayImage::from_fn(12, 12, |x, _| Luma([if (x / 2) % 2 == 0 { 255 } else { 0 }])),
        IconKind::StylePoint => checker(12, 12, 3),
    }
}

/// Layout scaled down to the synthetic screen; binarization off.
pub fn test_config() -> ExtractionConfig {
    ExtractionConfig {
        adaptive_block_radius: 0,
        song_region: RegionOffset { dx: -20, dy: -30, width: 120, height: 24 },
        prize_region: RegionOffset { dx: -40, dy: 8, width: 160, height: 80 },
        ..ExtractionConfig::default()
    }
}

/// Library with anchor, coin, gem and style_point (the multiplier source).
pub fn standard() -> Fixture {
    let descriptor = |name: &str, pixels: GrayImage, role: TemplateRole| TemplateDescriptor {
        name: name.to_string(),
        pixels,
        role,
    };

    let library = TemplateLibrary::from_parts(
        descriptor("anchor", anchor_pattern(), TemplateRole::Anchor),
        vec![
            descriptor("coin", icon_pattern(IconKind::Coin), TemplateRole::Ordinary),
            descriptor("gem", icon_pattern(IconKind::Gem), TemplateRole::Ordinary),
            descriptor(
                "style_point",
                icon_pattern(IconKind::StylePoint),
                TemplateRole::MultiplierSource,
            ),
        ],
    );

    Fixture {
        library,
        config: test_config(),
    }
}

/// Writes the standard templates as PNG files into `dir`.
pub fn write_templates(dir: &std::path::Path) {
    anchor_pattern().save(dir.join("anchor.png")).unwrap();
    icon_pattern(IconKind::Coin).save(dir.join("coin.png")).unwrap();
    icon_pattern(IconKind::Gem).save(dir.join("gem.png")).unwrap();
    icon_pattern(IconKind::StylePoint).save(dir.join("style_point.png")).unwrap();
}

/// Black screen with the anchor (if any) and the given icons pasted in.
pub fn screen(anchor_at: Option<(u32, u32)>, icons: &[Icon]) -> DynamicImage {
    let mut canvas = GrayImage::new(SCREEN_SIZE.0, SCREEN_SIZE.1);
    if let Some((x, y)) = anchor_at {
        image::imageops::replace(&mut canvas, &anchor_pattern(), x as i64, y as i64);
    }
    for icon in icons {
        image::imageops::replace(&mut canvas, &icon_pattern(icon.kind), icon.at.0 as i64, icon.at.1 as i64);
    }
    DynamicImage::ImageLuma8(canvas)
}

/// Returns a fixed song title and then quantity texts in call order.
pub struct ScriptedRecognizer {
    song: Option<String>,
    quantities: RefCell<VecDeque<String>>,
    calls: Cell<usize>,
}

impl ScriptedRecognizer {
    /// `song: None` makes title recognition fail.
    pub fn new(song: Option<&str>, quantities: &[&str]) -> Self {
        Self {
            song: song.map(str::to_string),
            quantities: RefCell::new(quantities.iter().map(|q| q.to_string()).collect()),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn remaining(&self) -> usize {
        self.quantities.borrow().len()
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&self, _img: &GrayImage, request: &OcrRequest<'_>) -> Result<String> {
        self.calls.set(self.calls.get() + 1);

        if request.whitelist.is_none() {
            return self.song.clone().ok_or_else(|| anyhow!("scripted title failure"));
        }

        self.quantities
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted quantity left"))
    }
}
