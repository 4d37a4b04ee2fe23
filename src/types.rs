//! Core data model for the conversion pipeline
//!
//! Metadata fields are `Option<String>` throughout so "tag absent" and
//! "tag is the empty string" cannot be confused. Producers trim values
//! and map blank strings to `None`.

use std::path::{Path, PathBuf};

/// Tags read directly from a file's embedded metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

/// Best catalog candidate returned by one external lookup.
///
/// Consumed immediately by the resolver; an instance only exists for
/// candidates that already passed the acceptance threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMatch {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Confidence score reported by the catalog service (0-100)
    pub score: u8,
}

/// Where a resolved track identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSource {
    /// Title taken from the file's embedded tags
    Embedded,
    /// At least one field overlaid from an accepted catalog match
    Catalog,
    /// No usable title; naming falls back to the original filename
    None,
}

/// Final title/artist/album triple chosen for naming.
///
/// Produced once per input file and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub source: TrackSource,
}

/// Convert-or-skip verdict plus target path for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementDecision {
    pub output_path: PathBuf,
    pub action: PlacementAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementAction {
    Convert,
    Skip,
}

/// Outcome of one per-file attempt, folded into [`RunStats`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Converted,
    Skipped,
    Failed(String),
}

/// Counters for one full pass over the discovered input files.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub total: usize,
    pub converted: usize,
    pub skipped: usize,
    /// Input paths that failed, in processing order
    pub error_paths: Vec<PathBuf>,
}

impl RunStats {
    /// Fold one concluded attempt into the counters.
    pub fn record(&mut self, input: &Path, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Converted => self.converted += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Failed(_) => self.error_paths.push(input.to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_folds_outcomes() {
        let mut stats = RunStats::default();
        stats.total = 3;
        stats.record(Path::new("a.flac"), &FileOutcome::Converted);
        stats.record(Path::new("b.flac"), &FileOutcome::Skipped);
        stats.record(Path::new("c.flac"), &FileOutcome::Failed("boom".into()));

        assert_eq!(stats.converted, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.error_paths, vec![PathBuf::from("c.flac")]);
    }
}
