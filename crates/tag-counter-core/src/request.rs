use crate::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Glob patterns used when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["*.xml", "*.out"];

/// A validated, immutable description of one counting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    root_directory: PathBuf,
    tag_name: String,
    extensions: Vec<String>,
}

impl ScanRequest {
    /// Validates the root directory and tag name and normalizes the
    /// extension patterns. The root is stored canonicalized.
    pub fn new<P, S, I>(root_directory: P, tag_name: &str, extensions: I) -> Result<Self, Error>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let root = root_directory.as_ref();
        let metadata = match fs::metadata(root) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::DirectoryNotFound(root.to_path_buf()));
            }
            Err(err) => return Err(Error::Io(err)),
        };
        if !metadata.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }

        if tag_name.trim().is_empty() {
            return Err(Error::EmptyTagName);
        }

        Ok(Self {
            root_directory: fs::canonicalize(root)?,
            tag_name: tag_name.to_string(),
            extensions: normalize_extensions(extensions),
        })
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

/// Split a comma-separated pattern list such as `"*.xml, *.out"`.
pub fn parse_extensions(raw: &str) -> Vec<String> {
    normalize_extensions(raw.split(','))
}

fn normalize_extensions<S, I>(extensions: I) -> Vec<String>
where
    S: AsRef<str>,
    I: IntoIterator<Item = S>,
{
    let mut result: Vec<String> = Vec::new();
    for ext in extensions {
        let ext = ext.as_ref().trim();
        if !ext.is_empty() && !result.iter().any(|seen| seen == ext) {
            result.push(ext.to_string());
        }
    }

    if result.is_empty() {
        DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
    } else {
        result
    }
}
