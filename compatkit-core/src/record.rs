//! Raw and normalized feature record shapes.
//!
//! A raw record is one file from the upstream dataset's `features-json/`
//! directory; only its `stats` object matters here. A normalized record is
//! what this system persists and serves: per browser, an ordered list of
//! `[version, [codes]]` pairs, newest version first.
//!
//! Browser key order is meaningful (the "all browsers" query walks a record
//! in its own order), so both shapes use insertion-ordered maps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One raw upstream feature file: `{ "stats": { browser: { version: status } } }`.
///
/// Everything except `stats` is ignored at parse time. The inner map keeps
/// file order because it is the tiebreak order when two version strings
/// compare equal during normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFeature {
    pub stats: IndexMap<String, IndexMap<String, String>>,
}

/// One `[version, codes]` entry of a browser's support timeline.
///
/// Serialized as a two-element JSON array to match the persisted layout,
/// e.g. `["11.1", ["y", "x"]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSupport(pub String, pub Vec<String>);

impl VersionSupport {
    pub fn version(&self) -> &str {
        &self.0
    }

    pub fn codes(&self) -> &[String] {
        &self.1
    }
}

/// A normalized feature record: browser id -> support timeline, newest first.
///
/// Within one browser no version appears twice, and entries are ordered by
/// the dataset's version ordering, descending. Instances are produced by
/// normalization and read back verbatim from storage; nothing mutates them
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    pub browsers: IndexMap<String, Vec<VersionSupport>>,
}

impl FeatureRecord {
    /// Support timeline for one browser, if the record covers it.
    pub fn timeline(&self, browser: &str) -> Option<&[VersionSupport]> {
        self.browsers.get(browser).map(Vec::as_slice)
    }
}
