use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::FileMetadata;
use crate::progress::ProgressReporter;
use crate::storage::Database;

const PROGRESS_INTERVAL: usize = 1000;

#[derive(Debug, Default)]
pub struct LoadResult {
    pub inserted: usize,
    pub skipped: usize,
    pub duration: Duration,
}

/// Read a JSON-lines file produced by [`crate::scan`] and append every
/// record to the `fileindex` table, creating the database if needed.
pub fn load(
    json_file_name: &Path,
    sqlite_file_name: &Path,
    reporter: &dyn ProgressReporter,
) -> Result<LoadResult> {
    let start = Instant::now();
    reporter.on_load_start(&json_file_name.to_string_lossy());

    let file = File::open(json_file_name).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Error opening {}: {}", json_file_name.display(), err),
        )
    })?;
    let (records, skipped) = read_records(BufReader::new(file))?;
    debug!(
        "Parsed {} records from {} ({} lines skipped)",
        records.len(),
        json_file_name.display(),
        skipped
    );

    let db = Database::open(sqlite_file_name)?;
    let inserted = db.insert_file_metadata(&records, PROGRESS_INTERVAL, |count| {
        reporter.on_load_progress(count)
    })?;

    let duration = start.elapsed();
    reporter.on_load_complete(inserted, duration.as_secs_f64());
    Ok(LoadResult {
        inserted,
        skipped,
        duration,
    })
}

/// Parse records line by line. Blank lines are ignored; lines that are not
/// a valid record are logged and counted as skipped.
pub fn read_records<R: BufRead>(reader: R) -> Result<(Vec<FileMetadata>, usize)> {
    let mut records = Vec::new();
    let mut skipped = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<FileMetadata>(trimmed) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!("Skipping line {}: {}", index + 1, err);
                skipped += 1;
            }
        }
    }

    Ok((records, skipped))
}
