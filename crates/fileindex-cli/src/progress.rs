use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use colored::*;
use fileindex_core::ProgressReporter;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Spinner-based reporter for the `scan` and `load` commands. Neither phase
/// knows its total upfront, so both use a spinner with a running count.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS);
        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));

        let mut guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn set_message(&self, message: String) {
        let guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = guard.as_ref() {
            pb.set_message(message);
        }
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, root_path: &str) {
        self.start_spinner(format!("Scanning {}...", root_path));
    }

    fn on_scan_progress(&self, files_recorded: usize, _current_path: &str) {
        self.set_message(format!("Scanning... {} files recorded", files_recorded));
    }

    fn on_scan_complete(&self, files_recorded: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Scan complete: {} files in {:.2}s",
            "✓".green(),
            files_recorded,
            duration_secs
        );
    }

    fn on_load_start(&self, json_file_name: &str) {
        self.start_spinner(format!("Loading {}...", json_file_name));
    }

    fn on_load_progress(&self, rows_inserted: usize) {
        self.set_message(format!("Loading... {} rows inserted", rows_inserted));
    }

    fn on_load_complete(&self, rows_inserted: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Load complete: {} records in {:.2}s",
            "✓".green(),
            rows_inserted,
            duration_secs
        );
    }
}
