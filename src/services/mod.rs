//! Service modules for the conversion pipeline

pub mod musicbrainz;
pub mod orchestrator;
pub mod placement;
pub mod rate_limiter;
pub mod resolver;
pub mod run_log;
pub mod sanitizer;
pub mod scanner;
pub mod tag_probe;
pub mod transcoder;

pub use musicbrainz::{MBError, MusicBrainzClient};
pub use orchestrator::BatchOrchestrator;
pub use placement::{PlacementError, PlacementPlanner};
pub use rate_limiter::RateLimiter;
pub use resolver::{CatalogSearch, MetadataResolver};
pub use run_log::RunLog;
pub use sanitizer::sanitize;
pub use scanner::{DiscoveredFile, FileScanner, ScanError};
pub use tag_probe::{FfprobeTagReader, ProbeError, TagReader};
pub use transcoder::{FfmpegTranscoder, TranscodeError, Transcoder};
