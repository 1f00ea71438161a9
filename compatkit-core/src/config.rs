//! Data-directory layout resolution.
//!
//! Everything this system reads or writes lives under one data root:
//!
//! ```text
//! <root>/caniuse-raw/               upstream git checkout
//! <root>/caniuse-raw/features-json/ raw per-feature input files
//! <root>/caniuse/                   normalized per-feature output files
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable naming the data root when no flag is given.
pub const DATA_DIR_ENV: &str = "COMPATKIT_DATA_DIR";

/// Resolved filesystem layout for one data root.
#[derive(Debug, Clone)]
pub struct DataPaths {
    /// The data root itself.
    pub root: PathBuf,
    /// Upstream dataset checkout (`<root>/caniuse-raw`).
    pub checkout: PathBuf,
    /// Raw feature files inside the checkout (`<checkout>/features-json`).
    pub features_json: PathBuf,
    /// Normalized feature files served at query time (`<root>/caniuse`).
    pub normalized: PathBuf,
}

impl DataPaths {
    /// Resolve the conventional layout under `root`.
    pub fn resolve(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let checkout = root.join("caniuse-raw");
        DataPaths {
            features_json: checkout.join("features-json"),
            normalized: root.join("caniuse"),
            checkout,
            root,
        }
    }

    /// Resolve from the `COMPATKIT_DATA_DIR` environment variable.
    pub fn from_env() -> Result<Self> {
        let root = std::env::var(DATA_DIR_ENV)
            .with_context(|| format!("{DATA_DIR_ENV} environment variable must be set"))?;
        Ok(Self::resolve(root))
    }
}
