//! Embedded tag reading via ffprobe
//!
//! The probe asks ffprobe for the title, artist, and album format tags
//! as bare value lines in that fixed order. A missing trailing line
//! means the tag is absent. A non-zero exit or a spawn failure is a
//! soft failure the caller degrades to "no tags".

use crate::types::RawTags;
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

/// Tag probe errors
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to run ffprobe: {0}")]
    Spawn(std::io::Error),

    #[error("ffprobe exited with {code:?}")]
    ExitFailure { code: Option<i32> },
}

/// Seam for embedded tag reading, so the pipeline can be tested
/// without spawning processes.
#[allow(async_fn_in_trait)]
pub trait TagReader {
    async fn read_tags(&self, path: &Path) -> Result<RawTags, ProbeError>;
}

/// Production tag reader shelling out to ffprobe.
pub struct FfprobeTagReader;

impl TagReader for FfprobeTagReader {
    async fn read_tags(&self, path: &Path) -> Result<RawTags, ProbeError> {
        let output = Command::new("ffprobe")
            .arg("-v")
            .arg("quiet")
            .arg("-show_entries")
            .arg("format_tags=title,artist,album")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(path)
            .output()
            .await
            .map_err(ProbeError::Spawn)?;

        if !output.status.success() {
            return Err(ProbeError::ExitFailure {
                code: output.status.code(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let tags = parse_tag_lines(&stdout);

        tracing::debug!(
            file = %path.display(),
            title = ?tags.title,
            artist = ?tags.artist,
            "Probed embedded tags"
        );

        Ok(tags)
    }
}

/// Interpret probe output lines positionally as title, artist, album.
/// Blank lines and missing trailing lines mean the tag is absent.
fn parse_tag_lines(stdout: &str) -> RawTags {
    let mut lines = stdout.lines();
    let mut next = || {
        lines
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    RawTags {
        title: next(),
        artist: next(),
        album: next(),
    }
}
