//! Ingest worker thread.
//!
//! Receives screenshot paths from the queue, runs the extraction pipeline and
//! appends recognized drops to the shared drop log.

use chrono::Local;
use std::fmt;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::drop_log::DropLog;
use super::queue::IngestItem;
use crate::config::ExtractionConfig;
use crate::ocr::TextRecognizer;
use crate::pipeline::extract_file;
use crate::vision::TemplateLibrary;

/// Everything the worker owns for its lifetime.
pub struct IngestContext {
    pub library: TemplateLibrary,
    pub config: ExtractionConfig,
    pub recognizer: Box<dyn TextRecognizer + Send>,
    pub log: Arc<DropLog>,
}

/// Per-image outcome reported back to the sender side.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestStatus {
    /// Rows appended to the drop log
    Recorded(usize),
    /// Extraction ran but found no drops; nothing written
    NothingRecognized,
    Failed(String),
}

impl fmt::Display for IngestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestStatus::Recorded(rows) => write!(f, "✅ recorded {} drop(s)", rows),
            IngestStatus::NothingRecognized => write!(f, "❓ nothing recognized"),
            IngestStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub processed: usize,
    pub recorded: usize,
    pub rows: usize,
    pub nothing_recognized: usize,
    pub failed: usize,
}

impl IngestSummary {
    fn add(&mut self, status: &IngestStatus) {
        self.processed += 1;
        match status {
            IngestStatus::Recorded(rows) => {
                self.recorded += 1;
                self.rows += rows;
            }
            IngestStatus::NothingRecognized => self.nothing_recognized += 1,
            IngestStatus::Failed(_) => self.failed += 1,
        }
    }
}

/// Extracts one screenshot and records its drops.
///
/// The run is stamped when its rows are written, not when the image was queued.
pub fn process_item(item: &IngestItem, context: &IngestContext) -> IngestStatus {
    let result = match extract_file(
        &item.image_path,
        &context.library,
        &context.config,
        context.recognizer.as_ref(),
    ) {
        Ok(result) => result,
        Err(e) => return IngestStatus::Failed(e.to_string()),
    };

    if result.drops.is_empty() {
        return IngestStatus::NothingRecognized;
    }

    match context.log.append_result(&result) {
        Ok(rows) => IngestStatus::Recorded(rows),
        Err(e) => IngestStatus::Failed(format!("{:#}", e)),
    }
}

/// Runs the ingest loop until the channel closes (every sender dropped).
///
/// `on_status` is called after each item. A failed item never stops the loop.
/// Blocks, so run it on a dedicated thread.
pub fn run_ingest_worker<F>(receiver: Receiver<IngestItem>, context: IngestContext, mut on_status: F) -> IngestSummary
where
    F: FnMut(&IngestItem, &IngestStatus),
{
    info!("Ingest worker started");
    let mut summary = IngestSummary::default();

    for item in receiver.iter() {
        info!("Ingest worker: processing {}", item.image_path.display());
        debug!(
            "Ingest worker: {} waited {} ms in the queue",
            item.image_path.display(),
            (Local::now() - item.received_at).num_milliseconds()
        );

        let status = process_item(&item, &context);
        match &status {
            IngestStatus::Failed(reason) => {
                warn!("Ingest worker: {} failed: {}", item.image_path.display(), reason)
            }
            other => info!("Ingest worker: {} {}", item.image_path.display(), other),
        }

        summary.add(&status);
        on_status(&item, &status);
    }

    info!(
        "Ingest worker finished: {} processed, {} recorded ({} rows), {} empty, {} failed",
        summary.processed, summary.recorded, summary.rows, summary.nothing_recognized, summary.failed
    );
    summary
}
