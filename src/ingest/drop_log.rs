//! Append-only CSV log of drop records.
//!
//! One row per drop entry. All rows of one extraction share a timestamp, which
//! is how the statistics side counts runs, so every appended run gets a stamp
//! later than the one before it.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Local, SubsecRound};
use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::pipeline::ExtractionResult;

pub const HEADER: &str = "datetime,song_name,multiplier,item_name,normalized_amount";

/// Millisecond precision keeps runs recorded within the same second apart.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub struct DropLog {
    path: PathBuf,
    /// Stamp of the last run appended through this handle
    last_stamp: Mutex<Option<DateTime<Local>>>,
}

impl DropLog {
    /// Opens the log, writing the header if the file is missing or empty.
    ///
    /// Existing content is preserved.
    pub fn init(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create drop log directory")?;
        }

        let has_content = path.exists() && {
            let file = File::open(path).context("Failed to open existing drop log")?;
            BufReader::new(file).lines().next().is_some()
        };

        if !has_content {
            let mut file = File::create(path).context("Failed to create drop log")?;
            writeln!(file, "{}", HEADER).context("Failed to write drop log header")?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            last_stamp: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends every drop of `result`, stamped with the current time.
    pub fn append_result(&self, result: &ExtractionResult) -> Result<usize> {
        self.append_result_at(result, Local::now())
    }

    /// Appends every drop of `result` with one shared timestamp.
    ///
    /// The stamp is truncated to milliseconds and moved 1 ms past the previous
    /// run when it would not be later. All rows go out in a single write so
    /// readers never see half a run. Returns the number of rows written; a
    /// result without drops writes nothing.
    pub fn append_result_at(&self, result: &ExtractionResult, recorded_at: DateTime<Local>) -> Result<usize> {
        if result.drops.is_empty() {
            return Ok(0);
        }

        let mut last_stamp = self.last_stamp.lock().map_err(|_| anyhow!("drop log lock poisoned"))?;
        let stamp = next_stamp(*last_stamp, recorded_at);
        let rows = format_rows(result, stamp);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context("Failed to open drop log for append")?;
        file.write_all(rows.as_bytes()).context("Failed to write drop log rows")?;
        *last_stamp = Some(stamp);

        Ok(result.drops.len())
    }
}

fn next_stamp(last: Option<DateTime<Local>>, recorded_at: DateTime<Local>) -> DateTime<Local> {
    let stamp = recorded_at.trunc_subsecs(3);
    match last {
        Some(last) if stamp <= last => last + Duration::milliseconds(1),
        _ => stamp,
    }
}

/// CSV rows for one result, newline-terminated.
fn format_rows(result: &ExtractionResult, recorded_at: DateTime<Local>) -> String {
    let timestamp = recorded_at.format(TIMESTAMP_FORMAT).to_string();
    let song = quote_field(&result.song_name);

    result
        .drops
        .iter()
        .map(|drop| {
            format!(
                "{},{},{},{},{}\n",
                timestamp,
                song,
                result.multiplier,
                quote_field(&drop.item),
                drop.normalized_amount
            )
        })
        .collect()
}

/// Quotes a field containing a comma, quote or line break.
fn quote_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
