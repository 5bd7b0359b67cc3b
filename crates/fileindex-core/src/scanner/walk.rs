use glob::Pattern;
use std::fs::{Metadata, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, error, trace, warn};
use walkdir::WalkDir;

use crate::error::Result;
use crate::hasher;
use crate::model::FileMetadata;
use crate::progress::ProgressReporter;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub volume_name: String,
    pub root_path: PathBuf,
    pub output_file_name: PathBuf,
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub files_recorded: usize,
    pub files_skipped: usize,
    pub bytes_hashed: u64,
    pub duration: Duration,
}

/// Walk `root_path` and append one JSON line per regular, non-empty file to
/// the output file. Entries that cannot be read are logged and skipped.
pub fn scan(options: &ScanOptions, reporter: &dyn ProgressReporter) -> Result<ScanResult> {
    let start = Instant::now();
    let root = options.root_path.as_path();
    let ignore_patterns = compile_ignore_patterns(&options.ignore_patterns);

    let output = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&options.output_file_name)
        .map_err(|err| {
            io::Error::new(
                err.kind(),
                format!(
                    "Error opening output file {}: {}",
                    options.output_file_name.display(),
                    err
                ),
            )
        })?;
    let mut writer = BufWriter::new(output);

    reporter.on_scan_start(&root.to_string_lossy());
    let mut result = ScanResult::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_ignored(entry.path(), &ignore_patterns));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error walking {}: {}", root.display(), err);
                result.files_skipped += 1;
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            trace!("{} is a directory", entry.path().display());
            continue;
        }
        if !file_type.is_file() {
            trace!("{} is not a regular file", entry.path().display());
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("Error getting metadata for {}: {}", entry.path().display(), err);
                result.files_skipped += 1;
                continue;
            }
        };
        if metadata.len() == 0 {
            trace!("{} is length 0", entry.path().display());
            continue;
        }

        let record = match build_record(&options.volume_name, root, entry.path(), &metadata) {
            Ok(record) => record,
            Err(err) => {
                warn!("Error hashing {}: {}", entry.path().display(), err);
                result.files_skipped += 1;
                continue;
            }
        };

        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;

        result.files_recorded += 1;
        result.bytes_hashed += metadata.len();
        reporter.on_scan_progress(result.files_recorded, &entry.path().to_string_lossy());
    }

    writer.flush()?;
    result.duration = start.elapsed();
    reporter.on_scan_complete(result.files_recorded, result.duration.as_secs_f64());
    debug!(
        "Scan of {} completed in {:.2}s: {} recorded, {} skipped, {} bytes",
        root.display(),
        result.duration.as_secs_f64(),
        result.files_recorded,
        result.files_skipped,
        result.bytes_hashed,
    );

    Ok(result)
}

fn build_record(
    volume_name: &str,
    root: &Path,
    file: &Path,
    metadata: &Metadata,
) -> io::Result<FileMetadata> {
    let sha256 = hasher::hash_file(file)?;
    let modified = metadata.modified().map(unix_seconds).unwrap_or(0);

    Ok(FileMetadata {
        path: volume_relative_dir(root, file),
        name: file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        volume: volume_name.to_string(),
        size: metadata.len() as i64,
        sha256,
        modified,
    })
}

/// Directory of `file` relative to `root`, as `/a/b`. Files directly under
/// the root yield an empty string.
pub fn volume_relative_dir(root: &Path, file: &Path) -> String {
    let parent = file.parent().unwrap_or(root);
    let relative = parent.strip_prefix(root).unwrap_or(parent);

    let mut dir = String::new();
    for component in relative.components() {
        dir.push('/');
        dir.push_str(&component.as_os_str().to_string_lossy());
    }
    dir
}

fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_secs() as i64,
        Err(err) => -(err.duration().as_secs() as i64),
    }
}

fn compile_ignore_patterns(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}

fn is_ignored(path: &Path, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|pattern| pattern.matches_path(path))
}
