/// Trait for reporting scan and load progress.
///
/// The CLI implements it with indicatif spinners. All methods have default
/// no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self, _root_path: &str) {}
    fn on_scan_progress(&self, _files_recorded: usize, _current_path: &str) {}
    fn on_scan_complete(&self, _files_recorded: usize, _duration_secs: f64) {}
    fn on_load_start(&self, _json_file_name: &str) {}
    fn on_load_progress(&self, _rows_inserted: usize) {}
    fn on_load_complete(&self, _rows_inserted: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
