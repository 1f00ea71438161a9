//! Upstream dataset refresh.
//!
//! The raw dataset is a git repository. Refreshing means cloning it on
//! first use and fast-forwarding it afterwards; the rest of the ingest
//! pipeline only runs when this step reports new content (or is forced).

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::DataPaths;

/// Where the raw dataset lives.
pub const UPSTREAM_REPO: &str = "https://github.com/Fyrd/caniuse.git";

/// Notice git prints when a pull had nothing to fetch.
const UP_TO_DATE_NOTICE: &str = "Already up to date";

/// What a refresh found out about the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New content was fetched (a fresh clone always counts).
    Updated,
    /// The checkout already matched upstream.
    Unchanged,
}

/// Abstraction over how the dataset checkout is brought up to date.
///
/// The ingest driver decides whether to normalize from the reported
/// outcome, so anything that can say "changed or not" can stand in for
/// the real git checkout.
#[async_trait]
pub trait Refresher: Send + Sync {
    /// Bring the checkout up to date and report whether anything changed.
    async fn refresh(&self, paths: &DataPaths) -> Result<RefreshOutcome>;

    /// Refresher name for logging.
    fn name(&self) -> &'static str;
}

/// Refreshes the checkout with the system `git` binary.
pub struct GitRefresher;

#[async_trait]
impl Refresher for GitRefresher {
    async fn refresh(&self, paths: &DataPaths) -> Result<RefreshOutcome> {
        refresh_checkout(paths).await
    }

    fn name(&self) -> &'static str {
        "git"
    }
}

/// Clone or fast-forward the upstream dataset checkout.
///
/// Failures here are fatal to an ingest run: normalization must never run
/// against a checkout left in an unknown state.
pub async fn refresh_checkout(paths: &DataPaths) -> Result<RefreshOutcome> {
    let output = if paths.checkout.exists() {
        info!("Updating dataset checkout at {:?}", paths.checkout);
        Command::new("git")
            .args(["pull", "origin", "master"])
            .current_dir(&paths.checkout)
            .output()
            .await
            .context("failed to run git pull. Is git installed and in PATH?")?
    } else {
        info!("Cloning {} into {:?}", UPSTREAM_REPO, paths.checkout);
        tokio::fs::create_dir_all(&paths.root)
            .await
            .with_context(|| format!("failed to create data root {:?}", paths.root))?;
        Command::new("git")
            .arg("clone")
            .arg(UPSTREAM_REPO)
            .arg(&paths.checkout)
            .output()
            .await
            .context("failed to run git clone. Is git installed and in PATH?")?
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "git exited with {}: {}",
            output.status,
            stderr.trim_end()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    debug!("git output: {}", stdout.trim_end());

    Ok(pull_outcome(&stdout, &stderr))
}

/// Classify a successful git run by the up-to-date notice; git does not
/// pin the notice to one stream.
fn pull_outcome(stdout: &str, stderr: &str) -> RefreshOutcome {
    if stdout.contains(UP_TO_DATE_NOTICE) || stderr.contains(UP_TO_DATE_NOTICE) {
        RefreshOutcome::Unchanged
    } else {
        RefreshOutcome::Updated
    }
}
