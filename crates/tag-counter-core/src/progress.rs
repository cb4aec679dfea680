use std::path::Path;

/// Trait for reporting count progress.
///
/// CLI implements with an indicatif bar; tests use `SilentReporter`.
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_discovery_start(&self, _root: &Path) {}
    fn on_discovery_complete(&self, _candidates: usize, _duration_secs: f64) {}
    fn on_count_start(&self, _total_files: usize) {}
    fn on_file_complete(&self, _files_done: usize, _total_files: usize, _path: &Path) {}
    fn on_file_skipped(&self, _path: &Path, _reason: &str) {}
    fn on_count_complete(&self, _total_count: u64, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
