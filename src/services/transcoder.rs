//! MP3 transcoding via ffmpeg

use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

/// Transcoding errors
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to run ffmpeg: {0}")]
    Spawn(std::io::Error),

    #[error("ffmpeg exited with {code:?}: {stderr}")]
    ExitFailure {
        code: Option<i32>,
        stderr: String,
    },
}

/// Seam for the transcode step, so batch scenarios can be tested
/// without ffmpeg installed.
#[allow(async_fn_in_trait)]
pub trait Transcoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

/// Production transcoder shelling out to ffmpeg.
///
/// Keeps the first audio stream, copies any attached picture stream,
/// and carries source metadata into ID3v2.3 + ID3v1 tags.
pub struct FfmpegTranscoder {
    bitrate: String,
}

impl FfmpegTranscoder {
    pub fn new(bitrate: impl Into<String>) -> Self {
        Self {
            bitrate: bitrate.into(),
        }
    }

    /// Check that ffmpeg is reachable on PATH.
    pub async fn check_available() -> bool {
        match Command::new("ffmpeg").arg("-version").output().await {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }
}

impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let result = Command::new("ffmpeg")
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(input)
            .arg("-map")
            .arg("0:a:0")
            .arg("-map")
            .arg("0:v?")
            .arg("-c:a")
            .arg("libmp3lame")
            .arg("-b:a")
            .arg(&self.bitrate)
            .arg("-c:v")
            .arg("copy")
            .arg("-map_metadata")
            .arg("0")
            .arg("-id3v2_version")
            .arg("3")
            .arg("-write_id3v1")
            .arg("1")
            .arg("-y")
            .arg(output)
            .output()
            .await
            .map_err(TranscodeError::Spawn)?;

        if !result.status.success() {
            return Err(TranscodeError::ExitFailure {
                code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
