use glob::Pattern;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

/// Recursive file discovery. Returns the canonical paths of every file
/// under `root` whose name matches any of `extensions`, deduplicated and
/// sorted. Unreadable directories and entries are skipped.
pub fn discover(root: &Path, extensions: &[String]) -> BTreeSet<PathBuf> {
    let patterns = compile_patterns(extensions);
    let mut candidates = BTreeSet::new();

    if patterns.is_empty() {
        return candidates;
    }

    for entry_result in WalkDir::new(root).follow_links(false) {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        // Symlinks count only when they resolve to a regular file.
        if file_type.is_symlink() && !entry.path().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if !patterns.iter().any(|pattern| pattern.matches(&file_name)) {
            continue;
        }

        match fs::canonicalize(entry.path()) {
            Ok(canonical) => {
                if !candidates.insert(canonical) {
                    debug!("Duplicate candidate {}", entry.path().display());
                }
            }
            Err(err) => {
                warn!("Error canonicalizing {}: {}", entry.path().display(), err);
            }
        }
    }

    candidates
}

/// Compile glob patterns, logging and dropping any that are invalid.
pub fn compile_patterns(globs: &[String]) -> Vec<Pattern> {
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
