//! Projection of a record onto a sanitized query.

use indexmap::IndexMap;
use serde::Serialize;

use crate::query::options::{BrowserSelection, Query};
use crate::record::{FeatureRecord, VersionSupport};

/// The browser -> timeline slice a query resolved to.
///
/// Serializes to the same shape as a stored record, just narrowed to the
/// requested browsers and version depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponseBody {
    pub browsers: IndexMap<String, Vec<VersionSupport>>,
}

/// Slice `record` down to the browsers and version depth `query` asks for.
///
/// An explicit browser list dictates both membership and key order, and a
/// listed browser the record does not cover still appears, with an empty
/// timeline. `All` walks the record in its own key order.
pub fn project(record: &FeatureRecord, query: &Query) -> ResponseBody {
    let mut body = ResponseBody::default();

    match &query.browsers {
        BrowserSelection::All => {
            for (browser, timeline) in &record.browsers {
                body.browsers
                    .insert(browser.clone(), slice_timeline(timeline, query.versions));
            }
        }
        BrowserSelection::List(list) => {
            for browser in list {
                let timeline = record
                    .timeline(browser)
                    .map(|timeline| slice_timeline(timeline, query.versions))
                    .unwrap_or_default();
                body.browsers.insert(browser.clone(), timeline);
            }
        }
    }

    body
}

fn slice_timeline(timeline: &[VersionSupport], versions: usize) -> Vec<VersionSupport> {
    timeline.iter().take(versions).cloned().collect()
}
