//! CSV reader for the drop log.
//!
//! Parses the file written by [`crate::ingest::DropLog`] into records.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

use crate::ingest::drop_log::TIMESTAMP_FORMAT;

/// One persisted row: one item of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct DropRecord {
    /// Shared by every row of the same run
    pub recorded_at: NaiveDateTime,
    pub song_name: String,
    pub multiplier: f64,
    pub item: String,
    pub normalized_amount: f64,
}

/// Loads every well-formed record from the drop log.
///
/// A missing file is an empty log. Skips the header row, blank lines and
/// malformed rows (with a warning).
pub fn read_records(path: &Path) -> Result<Vec<DropRecord>> {
    if !path.exists() {
        debug!("Drop log {} does not exist yet", path.display());
        return Ok(Vec::new());
    }

    let file = File::open(path).context(format!("Failed to open drop log: {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.context("Failed to read line from drop log")?;

        if line_num == 0 || line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping malformed drop log row {}: {}", line_num + 1, e),
        }
    }

    Ok(records)
}

fn parse_line(line: &str) -> Result<DropRecord> {
    let parts = split_csv_line(line);

    if parts.len() != 5 {
        return Err(anyhow!("Expected 5 columns, got {}", parts.len()));
    }

    let recorded_at = NaiveDateTime::parse_from_str(&parts[0], TIMESTAMP_FORMAT)
        .context(format!("Invalid timestamp {:?}", parts[0]))?;
    let multiplier = parts[2].parse::<f64>().context("Invalid multiplier")?;
    let normalized_amount = parts[4].parse::<f64>().context("Invalid amount")?;

    if parts[3].is_empty() {
        return Err(anyhow!("Empty item name"));
    }

    Ok(DropRecord {
        recorded_at,
        song_name: parts[1].clone(),
        multiplier,
        item: parts[3].clone(),
        normalized_amount,
    })
}

/// Splits one line into fields, honouring double-quoted fields with `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);

    fields
}
