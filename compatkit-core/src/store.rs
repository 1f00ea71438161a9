//! Memoizing access to normalized feature records.
//!
//! The store is the read side of the crate. Records are loaded through a
//! [`RecordSource`], parsed once, and cached behind `Arc` so concurrent
//! queries share a single copy. Lookups never fail: anything that goes
//! wrong during a load is logged and reported as [`Lookup::NotFound`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::record::FeatureRecord;

/// Errors raised while loading a normalized record.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Feature id would escape the data directory.
    #[error("invalid feature id '{feature}'")]
    InvalidId { feature: String },

    /// Failed to read the record file.
    #[error("failed to read record for '{feature}'")]
    Read {
        feature: String,
        #[source]
        source: std::io::Error,
    },

    /// The record file exists but does not hold a normalized record.
    #[error("failed to parse record for '{feature}'")]
    Parse {
        feature: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where normalized records come from.
///
/// The store only needs the raw JSON text of one record at a time;
/// implementations decide how to find it.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Read the JSON text of one normalized record.
    async fn read(&self, feature: &str) -> Result<String, LoadError>;

    /// Source identifier for logging.
    fn name(&self) -> &'static str;
}

/// Reads normalized records from a directory of `<feature>.json` files.
pub struct DataDirSource {
    dir: PathBuf,
}

impl DataDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl RecordSource for DataDirSource {
    async fn read(&self, feature: &str) -> Result<String, LoadError> {
        // Feature ids name files inside the data directory, never paths.
        if feature.is_empty()
            || feature.contains('/')
            || feature.contains('\\')
            || feature.contains("..")
        {
            return Err(LoadError::InvalidId {
                feature: feature.to_string(),
            });
        }

        let path = self.dir.join(format!("{feature}.json"));
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Read {
                feature: feature.to_string(),
                source,
            })
    }

    fn name(&self) -> &'static str {
        "data-dir"
    }
}

/// Outcome of a store lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// The record is available, shared with every other holder.
    Found(Arc<FeatureRecord>),
    /// The record could not be loaded; the cause was already logged.
    NotFound,
}

/// Caching front for normalized feature records.
pub struct FeatureStore {
    source: Box<dyn RecordSource>,
    cache: RwLock<HashMap<String, Arc<FeatureRecord>>>,
}

impl FeatureStore {
    pub fn new(source: Box<dyn RecordSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Convenience constructor over a [`DataDirSource`].
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(DataDirSource::new(dir)))
    }

    /// Look up a feature record, loading and caching it on first use.
    ///
    /// Failed loads are not cached, so a record that shows up on disk
    /// later is picked up by the next lookup. Concurrent misses for the
    /// same feature may each read the source; the first parsed copy wins
    /// the cache slot.
    pub async fn load(&self, feature: &str) -> Lookup {
        if let Some(record) = self.cache.read().await.get(feature) {
            debug!("Cache hit for feature '{}'", feature);
            return Lookup::Found(Arc::clone(record));
        }

        let record = match self.fetch(feature).await {
            Ok(record) => Arc::new(record),
            Err(e) => {
                warn!(
                    "Failed to load feature '{}' from {}: {:#}",
                    feature,
                    self.source.name(),
                    anyhow::Error::from(e)
                );
                return Lookup::NotFound;
            }
        };

        let mut cache = self.cache.write().await;
        let entry = cache.entry(feature.to_string()).or_insert(record);
        Lookup::Found(Arc::clone(entry))
    }

    async fn fetch(&self, feature: &str) -> Result<FeatureRecord, LoadError> {
        let text = self.source.read(feature).await?;
        serde_json::from_str(&text).map_err(|source| LoadError::Parse {
            feature: feature.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that counts reads and serves a fixed payload, or fails
    /// every read when no payload is set.
    struct CountingSource {
        reads: Arc<AtomicUsize>,
        payload: Option<String>,
    }

    #[async_trait]
    impl RecordSource for CountingSource {
        async fn read(&self, feature: &str) -> Result<String, LoadError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            match &self.payload {
                Some(text) => Ok(text.clone()),
                None => Err(LoadError::Read {
                    feature: feature.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                }),
            }
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn counting_store(payload: Option<&str>) -> (FeatureStore, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            reads: Arc::clone(&reads),
            payload: payload.map(str::to_string),
        };
        (FeatureStore::new(Box::new(source)), reads)
    }

    #[tokio::test]
    async fn test_second_load_hits_cache() {
        let (store, reads) = counting_store(Some(r#"{"chrome":[["10",["y"]]]}"#));

        let first = store.load("flexbox").await;
        let second = store.load("flexbox").await;

        assert!(matches!(first, Lookup::Found(_)));
        assert!(matches!(second, Lookup::Found(_)));
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_records_are_shared() {
        let (store, _reads) = counting_store(Some(r#"{"chrome":[["10",["y"]]]}"#));

        let first = store.load("flexbox").await;
        let second = store.load("flexbox").await;

        match (first, second) {
            (Lookup::Found(a), Lookup::Found(b)) => assert!(Arc::ptr_eq(&a, &b)),
            other => panic!("expected two hits, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let (store, reads) = counting_store(None);

        assert!(matches!(store.load("flexbox").await, Lookup::NotFound));
        assert!(matches!(store.load("flexbox").await, Lookup::NotFound));

        // Both lookups reached the source; nothing was memoized.
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_record_is_not_found() {
        let (store, reads) = counting_store(Some("not json"));

        assert!(matches!(store.load("flexbox").await, Lookup::NotFound));
        assert!(matches!(store.load("flexbox").await, Lookup::NotFound));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_data_dir_source_rejects_path_like_ids() {
        let source = DataDirSource::new("/nonexistent");

        for id in ["../etc/passwd", "a/b", "a\\b", ""] {
            let err = source.read(id).await.unwrap_err();
            assert!(matches!(err, LoadError::InvalidId { .. }), "id: {id:?}");
        }
    }

    #[tokio::test]
    async fn test_data_dir_source_reads_record_files() {
        let dir = tempfile::tempdir().unwrap();
        let payload = r#"{"chrome":[["10",["y"]]]}"#;
        std::fs::write(dir.path().join("flexbox.json"), payload).unwrap();

        let source = DataDirSource::new(dir.path());
        assert_eq!(source.read("flexbox").await.unwrap(), payload);

        let err = source.read("grid").await.unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }
}
