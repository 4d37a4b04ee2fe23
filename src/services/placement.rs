//! Output placement planning
//!
//! Maps a resolved track identity to an output path under the mirrored
//! tree and decides whether the file still needs converting. Existence
//! of the output alone triggers a skip; contents and timestamps are
//! never compared, so a rerun cannot reconvert or overwrite.

use crate::services::sanitizer::sanitize;
use crate::types::{PlacementAction, PlacementDecision, ResolvedTrack};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placement planning errors
#[derive(Debug, Error)]
pub enum PlacementError {
    /// Input path yields no usable filename component
    #[error("No filename in relative path: {0}")]
    NoFileName(PathBuf),

    /// Could not create the destination directory
    #[error("Failed to create output directory {0}: {1}")]
    CreateDirFailed(PathBuf, std::io::Error),
}

/// Plans output paths under a fixed destination root.
pub struct PlacementPlanner {
    output_root: PathBuf,
}

impl PlacementPlanner {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Compute the output path for one file and decide convert-or-skip.
    ///
    /// On `Convert` the destination directory exists when this returns.
    pub fn plan(
        &self,
        resolved: &ResolvedTrack,
        relative_path: &Path,
    ) -> Result<PlacementDecision, PlacementError> {
        let file_name = self.derive_file_name(resolved, relative_path)?;

        let output_dir = match relative_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.output_root.join(parent),
            _ => self.output_root.clone(),
        };
        let output_path = output_dir.join(file_name);

        if output_path.is_file() {
            return Ok(PlacementDecision {
                output_path,
                action: PlacementAction::Skip,
            });
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| PlacementError::CreateDirFailed(output_dir, e))?;

        Ok(PlacementDecision {
            output_path,
            action: PlacementAction::Convert,
        })
    }

    /// Derive the output filename: "{artist} - {title}.mp3" when a title
    /// was resolved, otherwise the original base name with the extension
    /// replaced.
    fn derive_file_name(
        &self,
        resolved: &ResolvedTrack,
        relative_path: &Path,
    ) -> Result<String, PlacementError> {
        if let Some(title) = &resolved.title {
            let stem = match &resolved.artist {
                Some(artist) => format!("{} - {}", artist, title),
                None => title.clone(),
            };
            let sanitized = sanitize(&stem);
            if !sanitized.is_empty() {
                return Ok(format!("{}.mp3", sanitized));
            }
            // Sanitizing wiped the whole name; fall back to the
            // original filename.
        }

        let original = relative_path
            .file_name()
            .ok_or_else(|| PlacementError::NoFileName(relative_path.to_path_buf()))?;
        let renamed = Path::new(original).with_extension("mp3");
        Ok(renamed.to_string_lossy().into_owned())
    }
}
