//! Append-only run log
//!
//! One `conversion.log` per run, written into the output directory.
//! Appends are best-effort: a failed write is reported through tracing
//! rather than aborting the batch.

use crate::config::Config;
use crate::error::Result;
use crate::types::RunStats;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

const LOG_FILE_NAME: &str = "conversion.log";

/// Append-only text sink recording notable per-run events.
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Create (truncating any previous run's log) and write the start line.
    pub async fn create(output_dir: &Path) -> Result<Self> {
        let path = output_dir.join(LOG_FILE_NAME);
        tokio::fs::write(&path, format!("run started: {}\n", timestamp())).await?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record the run setup after the header.
    pub async fn log_setup(&self, config: &Config) {
        let mut lines = String::from("source directories:\n");
        for dir in &config.source_directories {
            lines.push_str(&format!("  - {}\n", dir.display()));
        }
        lines.push_str(&format!(
            "output directory: {}\nbitrate: {}\n\n",
            config.output_directory.display(),
            config.bitrate
        ));
        self.append_raw(&lines).await;
    }

    /// Append one diagnostic line.
    pub async fn append(&self, line: &str) {
        self.append_raw(&format!("{}\n", line)).await;
    }

    /// Append the end-of-run summary block.
    pub async fn write_summary(&self, stats: &RunStats) {
        let mut block = format!(
            "\nrun finished: {}\ntotal files: {}\nconverted: {}\nskipped: {}\nerrors: {}\n",
            timestamp(),
            stats.total,
            stats.converted,
            stats.skipped,
            stats.error_paths.len()
        );
        if !stats.error_paths.is_empty() {
            block.push_str("error files:\n");
            for path in &stats.error_paths {
                block.push_str(&format!("  {}\n", path.display()));
            }
        }
        // An empty run is not a success; call it out distinctly
        if stats.total == 0 {
            block.push_str("no audio files were found; check the source directory paths\n");
        }
        self.append_raw(&block).await;
    }

    async fn append_raw(&self, text: &str) {
        let result = async {
            let mut file = tokio::fs::OpenOptions::new()
                .append(true)
                .open(&self.path)
                .await?;
            file.write_all(text.as_bytes()).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(log = %self.path.display(), error = %e, "Run log write failed");
        }
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
