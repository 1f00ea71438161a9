//! Raw record normalization.
//!
//! Turns one upstream feature record into the query-ready form: per
//! browser, `[version, [codes]]` entries sorted newest first, with
//! footnotes stripped from every status.

use indexmap::IndexMap;

use super::status::parse_status;
use super::version::compare_versions;
use crate::record::{FeatureRecord, RawFeature, VersionSupport};

/// Convert one raw upstream record into its normalized form.
///
/// Pure and deterministic: browsers come out in input order, each with its
/// versions stable-sorted ascending by the dataset ordering and then
/// reversed, so callers always observe descending (newest-first) order.
/// Equal-comparing versions keep their raw-file relative order, reversed
/// along with everything else.
pub fn normalize_feature(raw: &RawFeature) -> FeatureRecord {
    let mut browsers = IndexMap::with_capacity(raw.stats.len());

    for (browser, versions) in &raw.stats {
        let mut pairs: Vec<(&String, &String)> = versions.iter().collect();
        pairs.sort_by(|a, b| compare_versions(a.0, b.0));

        let mut timeline: Vec<VersionSupport> = pairs
            .into_iter()
            .map(|(version, status)| VersionSupport(version.clone(), parse_status(status)))
            .collect();
        timeline.reverse();

        browsers.insert(browser.clone(), timeline);
    }

    FeatureRecord { browsers }
}
