pub mod engine;
pub mod extract;
pub mod setup;

pub use engine::{OcrRequest, TesseractRecognizer, TextRecognizer};
pub use extract::{clean_song_name, parse_quantity};
pub use setup::ensure_tesseract;
