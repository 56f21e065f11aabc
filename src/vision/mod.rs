//! Visual side of extraction: preprocessing, template library, matching and
//! anchor-relative region geometry.

pub mod matching;
pub mod preprocess;
pub mod region;
pub mod templates;

pub use matching::{locate_anchor, match_prize_templates, MatchCandidate};
pub use preprocess::{crop_rect, load_image, preprocess, threshold_bright_text};
pub use region::{quantity_rect, resolve_regions, Anchor, PixelRect};
pub use templates::{TemplateDescriptor, TemplateLibrary, TemplateRole};
