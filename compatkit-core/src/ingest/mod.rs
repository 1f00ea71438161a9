//! Offline normalization pipeline.
//!
//! Ingest is the write side of the crate: refresh the upstream checkout,
//! then rewrite every raw feature file into its normalized form. The query
//! side never touches the raw dataset; it only reads what this module
//! produced.

pub mod fetch;
pub mod normalize;
pub mod status;
pub mod version;

pub use fetch::{refresh_checkout, GitRefresher, Refresher, RefreshOutcome, UPSTREAM_REPO};
pub use normalize::normalize_feature;
pub use status::parse_status;
pub use version::compare_versions;

use std::path::Path;

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::DataPaths;
use crate::record::RawFeature;

/// Knobs for a single ingest run.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Normalize even when the checkout was already up to date.
    pub force: bool,
}

/// What a completed normalization pass did.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Feature files successfully normalized and written.
    pub processed: usize,
    /// Feature ids that failed, with the reason each one failed.
    pub failed: Vec<(String, String)>,
}

/// Result of an ingest run.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Upstream had nothing new and `force` was not set.
    Skipped,
    /// Normalization ran; the report says how it went.
    Completed(IngestReport),
}

/// Refresh the upstream checkout with git and normalize it if anything changed.
pub async fn run(paths: &DataPaths, options: &IngestOptions) -> Result<IngestOutcome> {
    run_with(&GitRefresher, paths, options).await
}

/// Refresh the checkout through `refresher` and normalize if anything changed.
pub async fn run_with(
    refresher: &dyn Refresher,
    paths: &DataPaths,
    options: &IngestOptions,
) -> Result<IngestOutcome> {
    debug!("Refreshing dataset via {}", refresher.name());
    let refresh = refresher.refresh(paths).await?;

    if refresh == RefreshOutcome::Unchanged && !options.force {
        info!("Checkout already up to date, skipping normalization");
        return Ok(IngestOutcome::Skipped);
    }

    let report = process_dataset(&paths.features_json, &paths.normalized).await?;
    Ok(IngestOutcome::Completed(report))
}

/// Normalize every `.json` feature file in `input_dir` into `output_dir`.
///
/// Files are processed concurrently. A file that fails to read, parse, or
/// write is reported in the returned [`IngestReport`] and does not stop the
/// rest of the pass.
pub async fn process_dataset(input_dir: &Path, output_dir: &Path) -> Result<IngestReport> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("failed to create output directory {output_dir:?}"))?;

    let mut entries = tokio::fs::read_dir(input_dir)
        .await
        .with_context(|| format!("failed to read input directory {input_dir:?}"))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if let Some(extension) = path.extension() {
            if extension == "json" {
                files.push(path);
            }
        }
    }

    info!("Normalizing {} feature files from {:?}", files.len(), input_dir);

    let jobs: Vec<_> = files
        .iter()
        .map(|path| {
            let feature = feature_id(path);
            async move {
                let result = process_file(path, output_dir).await;
                (feature, result)
            }
        })
        .collect();

    let results = join_all(jobs).await;

    let mut report = IngestReport::default();
    for (feature, result) in results {
        match result {
            Ok(()) => report.processed += 1,
            Err(e) => {
                warn!("Failed to normalize '{}': {:#}", feature, e);
                report.failed.push((feature, format!("{e:#}")));
            }
        }
    }

    info!(
        "Normalization complete: {} processed, {} failed",
        report.processed,
        report.failed.len()
    );

    Ok(report)
}

/// Normalize one raw feature file and write the result under `output_dir`.
async fn process_file(path: &Path, output_dir: &Path) -> Result<()> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {path:?}"))?;

    let raw: RawFeature =
        serde_json::from_str(&contents).with_context(|| format!("failed to parse {path:?}"))?;

    let record = normalize_feature(&raw);
    let json = serde_json::to_string(&record).context("failed to serialize normalized record")?;

    let file_name = path
        .file_name()
        .with_context(|| format!("input path {path:?} has no file name"))?;
    tokio::fs::write(output_dir.join(file_name), json)
        .await
        .with_context(|| format!("failed to write normalized {file_name:?}"))?;

    Ok(())
}

/// Feature id for reporting, derived from the file name.
fn feature_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct StubRefresher {
        outcome: RefreshOutcome,
    }

    #[async_trait]
    impl Refresher for StubRefresher {
        async fn refresh(&self, _paths: &DataPaths) -> Result<RefreshOutcome> {
            Ok(self.outcome)
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    const RAW_FLEXBOX: &str = r#"{"title":"Flexbox","stats":{"chrome":{"4":"a x","124":"y"}}}"#;

    async fn seeded_paths() -> (TempDir, DataPaths) {
        let dir = TempDir::new().unwrap();
        let paths = DataPaths::resolve(dir.path());
        tokio::fs::create_dir_all(&paths.features_json).await.unwrap();
        tokio::fs::write(paths.features_json.join("flexbox.json"), RAW_FLEXBOX)
            .await
            .unwrap();
        (dir, paths)
    }

    #[tokio::test]
    async fn test_unchanged_checkout_skips_normalization() {
        let (_dir, paths) = seeded_paths().await;
        let refresher = StubRefresher {
            outcome: RefreshOutcome::Unchanged,
        };

        let outcome = run_with(&refresher, &paths, &IngestOptions::default())
            .await
            .unwrap();

        assert!(matches!(outcome, IngestOutcome::Skipped));
        assert!(!paths.normalized.exists());
    }

    #[tokio::test]
    async fn test_force_normalizes_unchanged_checkout() {
        let (_dir, paths) = seeded_paths().await;
        let refresher = StubRefresher {
            outcome: RefreshOutcome::Unchanged,
        };

        let outcome = run_with(&refresher, &paths, &IngestOptions { force: true })
            .await
            .unwrap();

        let report = match outcome {
            IngestOutcome::Completed(report) => report,
            IngestOutcome::Skipped => panic!("force must not skip normalization"),
        };
        assert_eq!(report.processed, 1);
        assert!(paths.normalized.join("flexbox.json").exists());
    }

    #[tokio::test]
    async fn test_updated_checkout_is_normalized() {
        let (_dir, paths) = seeded_paths().await;
        let refresher = StubRefresher {
            outcome: RefreshOutcome::Updated,
        };

        let outcome = run_with(&refresher, &paths, &IngestOptions::default())
            .await
            .unwrap();

        assert!(matches!(outcome, IngestOutcome::Completed(_)));
        assert!(paths.normalized.join("flexbox.json").exists());
    }
}
