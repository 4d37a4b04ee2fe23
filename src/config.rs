//! Configuration loading and default-file bootstrap

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tool configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories scanned recursively for input audio files
    pub source_directories: Vec<PathBuf>,
    /// Root of the mirrored MP3 output tree
    pub output_directory: PathBuf,
    /// MP3 bitrate passed to the transcoder (e.g. "256k")
    pub bitrate: String,
    /// Filename patterns selecting input files (e.g. "*.flac")
    pub supported_formats: Vec<String>,
    pub metadata_lookup: MetadataLookupConfig,
}

/// External catalog lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataLookupConfig {
    /// Master switch for catalog lookups
    pub enabled: bool,
    /// Enhanced naming: query the catalog with embedded artist + title
    pub use_enhanced: bool,
    /// Minimum spacing between catalog requests
    pub request_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_directories: Vec::new(),
            output_directory: PathBuf::from("output"),
            bitrate: "256k".to_string(),
            supported_formats: [
                "*.flac", "*.wav", "*.m4a", "*.aac", "*.ogg", "*.wma", "*.ape", "*.mp3",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            metadata_lookup: MetadataLookupConfig::default(),
        }
    }
}

impl Default for MetadataLookupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            use_enhanced: false,
            request_delay_ms: 1000,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("parse {} failed: {}", path.display(), e)))
    }

    /// Write a default configuration file for the user to fill in.
    pub fn write_default(path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())
            .map_err(|e| Error::Config(format!("serialize default config failed: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate fields the pipeline depends on.
    pub fn validate(&self) -> Result<()> {
        if self.source_directories.is_empty() {
            return Err(Error::Config(
                "no source directories configured".to_string(),
            ));
        }
        if self.output_directory.as_os_str().is_empty() {
            return Err(Error::Config("output directory not configured".to_string()));
        }
        if self.bitrate.trim().is_empty() {
            return Err(Error::Config("bitrate not configured".to_string()));
        }
        if self.supported_formats.is_empty() {
            return Err(Error::Config("no supported formats configured".to_string()));
        }
        Ok(())
    }
}
