pub mod drop_log;
pub mod queue;
pub mod worker;

pub use drop_log::DropLog;
pub use queue::{create_ingest_queue, IngestItem};
pub use worker::{run_ingest_worker, IngestContext, IngestStatus, IngestSummary};
