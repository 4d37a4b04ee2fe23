//! Batch conversion orchestration
//!
//! Drives the per-file pipeline (tag probe → resolver → placement →
//! transcode) over the discovered files in order and folds each
//! outcome into [`RunStats`]. A single file's failure is recorded and
//! never terminates the batch.

use crate::services::placement::PlacementPlanner;
use crate::services::resolver::{CatalogSearch, MetadataResolver};
use crate::services::run_log::RunLog;
use crate::services::scanner::DiscoveredFile;
use crate::services::tag_probe::TagReader;
use crate::services::transcoder::Transcoder;
use crate::types::{FileOutcome, PlacementAction, RawTags, RunStats};

pub struct BatchOrchestrator<C, R, T> {
    resolver: MetadataResolver<C>,
    tag_reader: R,
    planner: PlacementPlanner,
    transcoder: T,
}

impl<C, R, T> BatchOrchestrator<C, R, T>
where
    C: CatalogSearch,
    R: TagReader,
    T: Transcoder,
{
    pub fn new(
        resolver: MetadataResolver<C>,
        tag_reader: R,
        planner: PlacementPlanner,
        transcoder: T,
    ) -> Self {
        Self {
            resolver,
            tag_reader,
            planner,
            transcoder,
        }
    }

    /// Process every discovered file sequentially, in the order given.
    pub async fn run(&self, files: &[DiscoveredFile], run_log: &RunLog) -> RunStats {
        let mut stats = RunStats::default();

        for file in files {
            stats.total += 1;

            let outcome = self.process_file(file, run_log).await;
            match &outcome {
                FileOutcome::Converted => {
                    tracing::info!(file = %file.relative_path.display(), "Converted");
                }
                FileOutcome::Skipped => {
                    tracing::info!(file = %file.relative_path.display(), "Skipped (output exists)");
                }
                FileOutcome::Failed(reason) => {
                    tracing::warn!(file = %file.relative_path.display(), reason = %reason, "Conversion failed");
                    run_log
                        .append(&format!(
                            "conversion error: {} ({})",
                            file.path.display(),
                            reason
                        ))
                        .await;
                }
            }

            stats.record(&file.path, &outcome);
        }

        stats
    }

    async fn process_file(&self, file: &DiscoveredFile, run_log: &RunLog) -> FileOutcome {
        // Tag probe failures degrade to "no tags"
        let raw = match self.tag_reader.read_tags(&file.path).await {
            Ok(tags) => tags,
            Err(e) => {
                tracing::warn!(file = %file.path.display(), error = %e, "Tag probe failed");
                run_log
                    .append(&format!("tag probe error: {} ({})", file.path.display(), e))
                    .await;
                RawTags::default()
            }
        };

        let resolved = self.resolver.resolve(raw, run_log).await;

        let decision = match self.planner.plan(&resolved, &file.relative_path) {
            Ok(decision) => decision,
            Err(e) => return FileOutcome::Failed(format!("placement failed: {}", e)),
        };

        match decision.action {
            PlacementAction::Skip => FileOutcome::Skipped,
            PlacementAction::Convert => {
                tracing::info!(
                    input = %file.relative_path.display(),
                    output = %decision.output_path.display(),
                    "Converting"
                );
                match self
                    .transcoder
                    .transcode(&file.path, &decision.output_path)
                    .await
                {
                    Ok(()) => FileOutcome::Converted,
                    Err(e) => FileOutcome::Failed(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tag_probe::ProbeError;
    use crate::services::transcoder::TranscodeError;
    use crate::types::CatalogMatch;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    struct NoCatalog;

    impl CatalogSearch for NoCatalog {
        type Error = std::convert::Infallible;

        async fn search(
            &self,
            _artist: &str,
            _title: &str,
        ) -> Result<Option<CatalogMatch>, Self::Error> {
            Ok(None)
        }
    }

    struct FixedCatalog(CatalogMatch);

    impl CatalogSearch for FixedCatalog {
        type Error = std::convert::Infallible;

        async fn search(
            &self,
            _artist: &str,
            _title: &str,
        ) -> Result<Option<CatalogMatch>, Self::Error> {
            Ok(Some(self.0.clone()))
        }
    }

    struct FakeTagReader {
        tags: HashMap<PathBuf, RawTags>,
        fail_for: Vec<PathBuf>,
    }

    impl FakeTagReader {
        fn empty() -> Self {
            Self {
                tags: HashMap::new(),
                fail_for: Vec::new(),
            }
        }

        fn with(tags: &[(&str, RawTags)]) -> Self {
            Self {
                tags: tags
                    .iter()
                    .map(|(p, t)| (PathBuf::from(p), t.clone()))
                    .collect(),
                fail_for: Vec::new(),
            }
        }
    }

    impl TagReader for FakeTagReader {
        async fn read_tags(&self, path: &Path) -> Result<RawTags, ProbeError> {
            if self.fail_for.iter().any(|p| p == path) {
                return Err(ProbeError::ExitFailure { code: Some(1) });
            }
            Ok(self.tags.get(path).cloned().unwrap_or_default())
        }
    }

    struct FakeTranscoder {
        calls: Mutex<Vec<PathBuf>>,
        fail_for: Vec<PathBuf>,
    }

    impl FakeTranscoder {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_for: Vec::new(),
            }
        }

        fn failing_for(paths: &[&str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_for: paths.iter().map(PathBuf::from).collect(),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Transcoder for FakeTranscoder {
        async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
            self.calls.lock().unwrap().push(input.to_path_buf());
            if self.fail_for.iter().any(|p| p == input) {
                return Err(TranscodeError::ExitFailure {
                    code: Some(1),
                    stderr: "synthetic failure".to_string(),
                });
            }
            std::fs::write(output, b"mp3").unwrap();
            Ok(())
        }
    }

    fn discovered(names: &[&str]) -> Vec<DiscoveredFile> {
        names
            .iter()
            .map(|n| DiscoveredFile {
                path: PathBuf::from(format!("/music/{}", n)),
                relative_path: PathBuf::from(n),
            })
            .collect()
    }

    fn tags(title: Option<&str>, artist: Option<&str>) -> RawTags {
        RawTags {
            title: title.map(String::from),
            artist: artist.map(String::from),
            album: None,
        }
    }

    async fn setup(out_dir: &Path) -> (PlacementPlanner, RunLog) {
        (
            PlacementPlanner::new(out_dir),
            RunLog::create(out_dir).await.unwrap(),
        )
    }

    #[tokio::test]
    async fn embedded_tags_drive_output_naming() {
        let dir = tempfile::tempdir().unwrap();
        let (planner, log) = setup(dir.path()).await;

        let orchestrator = BatchOrchestrator::new(
            MetadataResolver::<NoCatalog>::new(None, false, false),
            FakeTagReader::with(&[(
                "/music/track01.flac",
                tags(Some("Sunrise"), Some("DJ X")),
            )]),
            planner,
            FakeTranscoder::new(),
        );

        let stats = orchestrator.run(&discovered(&["track01.flac"]), &log).await;

        assert_eq!(stats.total, 1);
        assert_eq!(stats.converted, 1);
        assert!(dir.path().join("DJ X - Sunrise.mp3").is_file());
    }

    #[tokio::test]
    async fn missing_title_falls_back_to_original_name() {
        let dir = tempfile::tempdir().unwrap();
        let (planner, log) = setup(dir.path()).await;

        let orchestrator = BatchOrchestrator::new(
            MetadataResolver::<NoCatalog>::new(None, false, false),
            FakeTagReader::empty(),
            planner,
            FakeTranscoder::new(),
        );

        let stats = orchestrator.run(&discovered(&["track01.flac"]), &log).await;

        assert_eq!(stats.converted, 1);
        assert!(dir.path().join("track01.mp3").is_file());
    }

    #[tokio::test]
    async fn catalog_match_renames_output() {
        let dir = tempfile::tempdir().unwrap();
        let (planner, log) = setup(dir.path()).await;

        let orchestrator = BatchOrchestrator::new(
            MetadataResolver::new(
                Some(FixedCatalog(CatalogMatch {
                    title: Some("Night Drive".to_string()),
                    artist: Some("Y".to_string()),
                    album: None,
                    score: 95,
                })),
                true,
                true,
            ),
            FakeTagReader::with(&[(
                "/music/track01.flac",
                tags(Some("night_drive_raw"), Some("y")),
            )]),
            planner,
            FakeTranscoder::new(),
        );

        let stats = orchestrator.run(&discovered(&["track01.flac"]), &log).await;

        assert_eq!(stats.converted, 1);
        assert!(dir.path().join("Y - Night Drive.mp3").is_file());
    }

    #[tokio::test]
    async fn existing_output_skips_without_invoking_transcoder() {
        let dir = tempfile::tempdir().unwrap();
        let (planner, log) = setup(dir.path()).await;
        std::fs::write(dir.path().join("DJ X - Sunrise.mp3"), b"existing").unwrap();

        let transcoder = FakeTranscoder::new();
        let orchestrator = BatchOrchestrator::new(
            MetadataResolver::<NoCatalog>::new(None, false, false),
            FakeTagReader::with(&[(
                "/music/track01.flac",
                tags(Some("Sunrise"), Some("DJ X")),
            )]),
            planner,
            transcoder,
        );

        let stats = orchestrator.run(&discovered(&["track01.flac"]), &log).await;

        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.converted, 0);
        assert_eq!(orchestrator.transcoder.call_count(), 0);
    }

    #[tokio::test]
    async fn one_failure_among_five_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let (planner, log) = setup(dir.path()).await;

        let orchestrator = BatchOrchestrator::new(
            MetadataResolver::<NoCatalog>::new(None, false, false),
            FakeTagReader::empty(),
            planner,
            FakeTranscoder::failing_for(&["/music/c.flac"]),
        );

        let files = discovered(&["a.flac", "b.flac", "c.flac", "d.flac", "e.flac"]);
        let stats = orchestrator.run(&files, &log).await;

        assert_eq!(stats.total, 5);
        assert_eq!(stats.converted, 4);
        assert_eq!(stats.error_paths, vec![PathBuf::from("/music/c.flac")]);

        let logged = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert!(logged.contains("conversion error: /music/c.flac"));
    }

    #[tokio::test]
    async fn tag_probe_failure_degrades_to_filename_naming() {
        let dir = tempfile::tempdir().unwrap();
        let (planner, log) = setup(dir.path()).await;

        let mut reader = FakeTagReader::empty();
        reader.fail_for.push(PathBuf::from("/music/track01.flac"));

        let orchestrator = BatchOrchestrator::new(
            MetadataResolver::<NoCatalog>::new(None, false, false),
            reader,
            planner,
            FakeTranscoder::new(),
        );

        let stats = orchestrator.run(&discovered(&["track01.flac"]), &log).await;

        assert_eq!(stats.converted, 1);
        assert!(dir.path().join("track01.mp3").is_file());

        let logged = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert!(logged.contains("tag probe error"));
    }

    #[tokio::test]
    async fn mirrored_subdirectories_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let (planner, log) = setup(dir.path()).await;

        let orchestrator = BatchOrchestrator::new(
            MetadataResolver::<NoCatalog>::new(None, false, false),
            FakeTagReader::empty(),
            planner,
            FakeTranscoder::new(),
        );

        let files = vec![DiscoveredFile {
            path: PathBuf::from("/music/albums/2024/track01.flac"),
            relative_path: PathBuf::from("albums/2024/track01.flac"),
        }];
        let stats = orchestrator.run(&files, &log).await;

        assert_eq!(stats.converted, 1);
        assert!(dir.path().join("albums/2024/track01.mp3").is_file());
    }
}
