//! Template library loaded from a directory of item images.
//!
//! Every raster file becomes one template named after its file stem. Two stems
//! are reserved: the anchor landmark and the multiplier-source item.

use image::GrayImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::preprocess::binarize_adaptive;
use crate::config::ExtractionConfig;
use crate::error::ExtractError;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "webp", "gif"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateRole {
    Ordinary,
    Anchor,
    MultiplierSource,
}

/// One reference image, already preprocessed like the screenshots it is matched against.
#[derive(Clone, Debug)]
pub struct TemplateDescriptor {
    pub name: String,
    pub pixels: GrayImage,
    pub role: TemplateRole,
}

impl TemplateDescriptor {
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

#[derive(Clone, Debug)]
pub struct TemplateLibrary {
    anchor: TemplateDescriptor,
    /// Ordinary and multiplier-source templates, sorted by file name
    items: Vec<TemplateDescriptor>,
}

impl TemplateLibrary {
    /// Loads all templates in `dir`.
    ///
    /// Unreadable files are skipped with a warning. A missing anchor file is fatal.
    pub fn load(dir: &Path, config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|source| ExtractError::TemplateDirectory {
                dir: dir.to_path_buf(),
                source,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && has_image_extension(path))
            .collect();
        paths.sort();

        let mut anchor = None;
        let mut items = Vec::new();

        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            let pixels = match image::open(&path) {
                Ok(img) => binarize_adaptive(&img.to_luma8(), config.adaptive_block_radius),
                Err(e) => {
                    warn!("Skipping template {}: {}", path.display(), e);
                    continue;
                }
            };

            let role = if name == config.anchor_template {
                TemplateRole::Anchor
            } else if name == config.multiplier_template {
                TemplateRole::MultiplierSource
            } else {
                TemplateRole::Ordinary
            };

            debug!(
                "Loaded template '{}' ({}x{}, {:?})",
                name,
                pixels.width(),
                pixels.height(),
                role
            );

            let descriptor = TemplateDescriptor { name, pixels, role };
            if role == TemplateRole::Anchor {
                anchor = Some(descriptor);
            } else {
                items.push(descriptor);
            }
        }

        let anchor = anchor.ok_or_else(|| ExtractError::MissingAnchorTemplate {
            name: config.anchor_template.clone(),
            dir: dir.to_path_buf(),
        })?;

        info!(
            "Template library: anchor '{}' + {} item templates from {}",
            anchor.name,
            items.len(),
            dir.display()
        );

        Ok(Self::from_parts(anchor, items))
    }

    /// Builds a library from already loaded templates; `items` keep their order.
    pub fn from_parts(anchor: TemplateDescriptor, items: Vec<TemplateDescriptor>) -> Self {
        Self { anchor, items }
    }

    pub fn anchor(&self) -> &TemplateDescriptor {
        &self.anchor
    }

    /// Non-anchor templates in enumeration order.
    pub fn items(&self) -> &[TemplateDescriptor] {
        &self.items
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}
