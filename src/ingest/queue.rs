//! Work queue between whoever receives screenshots and the ingest worker.
//!
//! Uses std::sync::mpsc; the channel is unbounded, so screenshots queue up
//! while an extraction is running.

use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

/// One screenshot waiting for extraction.
#[derive(Debug, Clone)]
pub struct IngestItem {
    pub image_path: PathBuf,
    /// When the image was queued; the run itself is stamped at write time
    pub received_at: DateTime<Local>,
}

impl IngestItem {
    pub fn new(image_path: PathBuf) -> Self {
        Self {
            image_path,
            received_at: Local::now(),
        }
    }
}

/// Creates the (sender, receiver) pair feeding [`super::run_ingest_worker`].
pub fn create_ingest_queue() -> (Sender<IngestItem>, Receiver<IngestItem>) {
    channel()
}
