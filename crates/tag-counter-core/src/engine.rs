use crate::counter::{self, DocumentSummary};
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::request::ScanRequest;
use crate::scanner;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of parsing one candidate. Consumed as soon as it is produced.
#[derive(Debug)]
pub enum ParseOutcome {
    Parsed {
        count: u64,
        summary: Option<DocumentSummary>,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Document summary of the first file that parsed, for debug output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugSample {
    pub path: PathBuf,
    pub summary: DocumentSummary,
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub total_count: u64,
    /// Only files with at least one match, ordered by path.
    pub per_file_counts: BTreeMap<PathBuf, u64>,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub skipped_files: Vec<SkippedFile>,
    pub debug_sample: Option<DebugSample>,
    pub elapsed: Duration,
}

impl ScanResult {
    pub fn files_with_matches(&self) -> usize {
        self.per_file_counts.len()
    }

    fn record(&mut self, path: &Path, outcome: ParseOutcome) {
        match outcome {
            ParseOutcome::Parsed { count, summary } => {
                self.files_processed += 1;
                if count > 0 {
                    self.total_count += count;
                    self.per_file_counts.insert(path.to_path_buf(), count);
                }
                if self.debug_sample.is_none() {
                    if let Some(summary) = summary {
                        self.debug_sample = Some(DebugSample {
                            path: path.to_path_buf(),
                            summary,
                        });
                    }
                }
            }
            ParseOutcome::Failed { reason } => {
                self.files_skipped += 1;
                self.skipped_files.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason,
                });
            }
        }
    }
}

pub struct CountEngine {
    request: ScanRequest,
    debug_sample_size: Option<usize>,
}

impl CountEngine {
    pub fn new(request: ScanRequest) -> Self {
        Self {
            request,
            debug_sample_size: None,
        }
    }

    /// Capture the first `limit` elements of the first parsed file.
    pub fn with_debug_sample(mut self, limit: usize) -> Self {
        self.debug_sample_size = Some(limit);
        self
    }

    pub fn request(&self) -> &ScanRequest {
        &self.request
    }

    /// Run the full count:
    /// 1. Recursive discovery of files matching the request's patterns
    /// 2. Per-file parse and namespace-agnostic count, skipping failures
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<ScanResult, Error> {
        let start = Instant::now();
        let root = self.request.root_directory();

        info!(
            "Searching {} for {:?}",
            root.display(),
            self.request.extensions()
        );
        reporter.on_discovery_start(root);
        let candidates: Vec<PathBuf> = scanner::discover(root, self.request.extensions())
            .into_iter()
            .collect();
        let discovery_duration = start.elapsed();
        reporter.on_discovery_complete(candidates.len(), discovery_duration.as_secs_f64());
        debug!(
            "Discovery completed in {:.2}s, {} candidate files",
            discovery_duration.as_secs_f64(),
            candidates.len(),
        );

        let mut result = aggregate_with_sample(
            &candidates,
            self.request.tag_name(),
            self.debug_sample_size,
            reporter,
        );
        result.elapsed = start.elapsed();

        Ok(result)
    }
}

/// Parse and count every candidate in path order.
pub fn aggregate(
    candidates: &[PathBuf],
    tag_name: &str,
    reporter: &dyn ProgressReporter,
) -> ScanResult {
    aggregate_with_sample(candidates, tag_name, None, reporter)
}

pub fn aggregate_with_sample(
    candidates: &[PathBuf],
    tag_name: &str,
    sample_limit: Option<usize>,
    reporter: &dyn ProgressReporter,
) -> ScanResult {
    let start = Instant::now();
    let mut ordered: Vec<&PathBuf> = candidates.iter().collect();
    ordered.sort();
    ordered.dedup();

    let total = ordered.len();
    reporter.on_count_start(total);

    let mut result = ScanResult::default();
    for (index, path) in ordered.into_iter().enumerate() {
        let wants_sample = result.debug_sample.is_none();
        let outcome = parse_outcome(path, tag_name, sample_limit.filter(|_| wants_sample));

        match &outcome {
            ParseOutcome::Parsed { count, .. } => {
                debug!("{}: {} occurrence(s)", path.display(), count);
            }
            ParseOutcome::Failed { reason } => {
                warn!("Skipping {}: {}", path.display(), reason);
                reporter.on_file_skipped(path, reason);
            }
        }

        result.record(path, outcome);
        reporter.on_file_complete(index + 1, total, path);
    }

    result.elapsed = start.elapsed();
    reporter.on_count_complete(result.total_count, result.elapsed.as_secs_f64());
    info!(
        "{} occurrence(s) of <{}> in {} file(s); {} processed, {} skipped",
        result.total_count,
        tag_name,
        result.files_with_matches(),
        result.files_processed,
        result.files_skipped,
    );

    result
}

fn parse_outcome(path: &Path, tag_name: &str, sample_limit: Option<usize>) -> ParseOutcome {
    match counter::analyze_file(path, tag_name, sample_limit) {
        Ok(analysis) => ParseOutcome::Parsed {
            count: analysis.count,
            summary: analysis.summary,
        },
        Err(err) => ParseOutcome::Failed {
            reason: err.to_string(),
        },
    }
}
