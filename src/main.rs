//! trackforge - batch audio to MP3 converter
//!
//! Discovers audio files under the configured source directories,
//! resolves a naming identity for each (embedded tags, optionally
//! refined by a MusicBrainz lookup), and converts new files into a
//! mirrored MP3 output tree via ffmpeg.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trackforge::config::Config;
use trackforge::services::{
    BatchOrchestrator, DiscoveredFile, FfmpegTranscoder, FfprobeTagReader, FileScanner,
    MetadataResolver, MusicBrainzClient, PlacementPlanner, RunLog,
};
use trackforge::types::RunStats;

/// Command-line arguments for trackforge
#[derive(Parser, Debug)]
#[command(name = "trackforge")]
#[command(about = "Batch audio to MP3 converter with metadata-driven naming")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "trackforge.toml", env = "TRACKFORGE_CONFIG")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trackforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("TrackForge {} starting", env!("CARGO_PKG_VERSION"));

    // Bootstrap a default config on first run, then ask the user to
    // review it before any processing happens.
    if !args.config.exists() {
        Config::write_default(&args.config)?;
        info!(
            "Created default configuration: {}",
            args.config.display()
        );
        info!("Review the configuration and run again.");
        return Ok(());
    }

    let config = Config::load(&args.config)?;
    config.validate()?;

    // Preflight: fatal failures surface before any file is processed
    if !FfmpegTranscoder::check_available().await {
        return Err(trackforge::Error::Preflight(
            "ffmpeg not found; install it and make sure it is on PATH".to_string(),
        )
        .into());
    }
    for dir in &config.source_directories {
        if !dir.is_dir() {
            return Err(trackforge::Error::Preflight(format!(
                "source directory not found: {}",
                dir.display()
            ))
            .into());
        }
    }
    tokio::fs::create_dir_all(&config.output_directory).await?;

    info!("Source directories:");
    for dir in &config.source_directories {
        info!("  - {}", dir.display());
    }
    info!("Output directory: {}", config.output_directory.display());
    info!("Bitrate: {}", config.bitrate);

    let run_log = RunLog::create(&config.output_directory).await?;
    run_log.log_setup(&config).await;

    // Discover input files per source directory, in scan order
    let scanner = FileScanner::new(&config.supported_formats);
    let mut files: Vec<DiscoveredFile> = Vec::new();
    for dir in &config.source_directories {
        info!("Scanning {}", dir.display());
        files.extend(scanner.scan(dir)?);
    }
    info!("Discovered {} audio files", files.len());

    let lookup = &config.metadata_lookup;
    let catalog = if lookup.enabled && lookup.use_enhanced {
        info!(
            "Catalog lookup enabled (request delay {}ms)",
            lookup.request_delay_ms
        );
        Some(MusicBrainzClient::new(lookup.request_delay_ms)?)
    } else {
        None
    };

    let orchestrator = BatchOrchestrator::new(
        MetadataResolver::new(catalog, lookup.enabled, lookup.use_enhanced),
        FfprobeTagReader,
        PlacementPlanner::new(&config.output_directory),
        FfmpegTranscoder::new(&config.bitrate),
    );

    let stats = orchestrator.run(&files, &run_log).await;

    report(&stats, &run_log).await;

    Ok(())
}

/// Print the end-of-run summary and append it to the run log.
async fn report(stats: &RunStats, run_log: &RunLog) {
    info!("Run complete");
    info!("  total files: {}", stats.total);
    info!("  converted:   {}", stats.converted);
    info!("  skipped:     {}", stats.skipped);
    info!("  errors:      {}", stats.error_paths.len());
    for path in &stats.error_paths {
        warn!("  failed: {}", path.display());
    }
    info!("Run log: {}", run_log.path().display());

    if stats.total == 0 {
        warn!("No audio files were found; check the source directory paths.");
    }

    run_log.write_summary(stats).await;
}
