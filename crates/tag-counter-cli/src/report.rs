use colored::*;
use std::fmt::Write as _;
use std::path::Path;
use tag_counter_core::{DebugSample, ScanRequest, ScanResult};

#[derive(Debug, Clone, Copy)]
pub struct ListingLimits {
    /// List every file when at most this many have matches.
    pub limit: usize,
    /// Otherwise list this many, then a remainder line.
    pub head: usize,
}

impl Default for ListingLimits {
    fn default() -> Self {
        Self { limit: 20, head: 10 }
    }
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn shown_count(total: usize, limits: ListingLimits) -> usize {
    if total <= limits.limit {
        total
    } else {
        limits.head.min(total)
    }
}

pub fn render_report(request: &ScanRequest, result: &ScanResult, limits: ListingLimits) -> String {
    let root = request.root_directory();
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Results".bold());
    let _ = writeln!(out, "  Tag name:           {}", request.tag_name().cyan());
    let _ = writeln!(out, "  Directory:          {}", root.display());
    let _ = writeln!(out, "  Extensions:         {}", request.extensions().join(", "));
    let _ = writeln!(
        out,
        "  Total occurrences:  {}",
        result.total_count.to_string().green().bold()
    );
    let _ = writeln!(out, "  Files processed:    {}", result.files_processed);
    let skipped = if result.files_skipped > 0 {
        result.files_skipped.to_string().yellow()
    } else {
        result.files_skipped.to_string().normal()
    };
    let _ = writeln!(out, "  Files skipped:      {}", skipped);
    let _ = writeln!(out, "  Files with matches: {}", result.files_with_matches());
    let _ = writeln!(
        out,
        "  Processing time:    {}",
        format!("{:.2}s", result.elapsed.as_secs_f64()).green()
    );

    if !result.per_file_counts.is_empty() {
        let total = result.per_file_counts.len();
        let shown = shown_count(total, limits);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Occurrences by file:".bold());
        for (path, count) in result.per_file_counts.iter().take(shown) {
            let _ = writeln!(out, "  {}: {}", display_path(root, path), count);
        }
        if shown < total {
            let _ = writeln!(out, "  ... and {} more files", total - shown);
        }
    }

    if !result.skipped_files.is_empty() {
        let total = result.skipped_files.len();
        let shown = shown_count(total, limits);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Skipped files:".yellow().bold());
        for skipped in result.skipped_files.iter().take(shown) {
            let _ = writeln!(
                out,
                "  {}: {}",
                display_path(root, &skipped.path),
                skipped.reason
            );
        }
        if shown < total {
            let _ = writeln!(out, "  ... and {} more files", total - shown);
        }
    }

    if result.total_count == 0 {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            format!("No <{}> elements found.", request.tag_name()).yellow()
        );
        let _ = writeln!(out, "Troubleshooting:");
        let _ = writeln!(
            out,
            "  - Tag names are case-sensitive: check the exact spelling of '{}'",
            request.tag_name()
        );
        let _ = writeln!(
            out,
            "  - Only the local name is compared; do not include a namespace prefix"
        );
        if result.files_processed == 0 && result.files_skipped == 0 {
            let _ = writeln!(
                out,
                "  - No files matched {}; adjust --extensions",
                request.extensions().join(", ")
            );
        }
        if result.files_skipped > 0 {
            let _ = writeln!(
                out,
                "  - {} file(s) could not be parsed; see the skipped list above",
                result.files_skipped
            );
        }
        let _ = writeln!(
            out,
            "  - Run with --show-debug to see element names in a sample file"
        );
    }

    out
}

pub fn render_debug(root: &Path, sample: Option<&DebugSample>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Debug".bold());

    let Some(sample) = sample else {
        let _ = writeln!(out, "  No file could be parsed; nothing to sample.");
        return out;
    };

    let summary = &sample.summary;
    let _ = writeln!(
        out,
        "  First parsed file: {}",
        display_path(root, &sample.path)
    );
    let _ = writeln!(out, "  Root element:      {}", summary.root.local_name.cyan());
    let _ = writeln!(
        out,
        "  Namespace:         {}",
        summary.root.namespace.as_deref().unwrap_or("(none)")
    );
    let _ = writeln!(out, "  First {} elements:", summary.elements.len());
    for (index, element) in summary.elements.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}. local={} qualified={} namespace={}",
            index + 1,
            element.local_name,
            element.qualified_name,
            element.namespace.as_deref().unwrap_or("(none)")
        );
    }

    out
}
