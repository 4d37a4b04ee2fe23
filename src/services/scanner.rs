//! Audio file discovery
//!
//! Recursive traversal of a source directory, selecting files whose
//! extension matches the configured patterns. Entries are visited in
//! filename order so a run processes files deterministically.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File discovery errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// One discovered input file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Absolute (or as-configured) input path
    pub path: PathBuf,
    /// Path relative to the source directory it was found under
    pub relative_path: PathBuf,
}

/// Recursive scanner matching configured filename patterns.
pub struct FileScanner {
    extensions: Vec<String>,
}

impl FileScanner {
    /// Build a scanner from glob-style patterns ("*.flac"). Patterns
    /// reduce to case-insensitive extension matching.
    pub fn new(patterns: &[String]) -> Self {
        let extensions = patterns
            .iter()
            .map(|p| {
                p.trim_start_matches('*')
                    .trim_start_matches('.')
                    .to_lowercase()
            })
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions }
    }

    /// Scan one source directory for matching files.
    pub fn scan(&self, root: &Path) -> Result<Vec<DiscoveredFile>, ScanError> {
        if !root.exists() {
            return Err(ScanError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if !self.matches(entry.path()) {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf();

            files.push(DiscoveredFile {
                path: entry.path().to_path_buf(),
                relative_path,
            });
        }

        tracing::debug!(
            root = %root.display(),
            count = files.len(),
            "Discovered audio files"
        );

        Ok(files)
    }

    fn matches(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext = ext.to_string_lossy().to_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            }
            None => false,
        }
    }
}
