//! Query option parsing and sanitization.
//!
//! Raw options arrive loosely typed (a browsers field may be a string, a
//! list, or missing entirely) and may name browsers or counts that make no
//! sense. Sanitization never rejects a query; it degrades every bad field
//! to a usable default and hands the rest of the pipeline a [`Query`] it
//! can trust.

use serde::Deserialize;
use tracing::debug;

use crate::browsers::{is_known_browser, DEFAULT_BROWSERS};

/// Version count used when a query does not ask for one.
pub const DEFAULT_VERSIONS: usize = 4;

/// The `browsers` field as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BrowsersField")]
pub enum BrowserFilter {
    /// No usable browser filter was given.
    #[default]
    Unspecified,
    /// The literal string `"all"`: every browser in the record.
    All,
    /// An explicit list of browser ids, not yet validated.
    List(Vec<String>),
}

/// Wire shapes the `browsers` field can take.
#[derive(Deserialize)]
#[serde(untagged)]
enum BrowsersField {
    One(String),
    Many(Vec<String>),
}

impl From<BrowsersField> for BrowserFilter {
    fn from(field: BrowsersField) -> Self {
        match field {
            BrowsersField::One(s) if s == "all" => BrowserFilter::All,
            // Any other bare string is meaningless as a filter.
            BrowsersField::One(_) => BrowserFilter::Unspecified,
            BrowsersField::Many(list) => BrowserFilter::List(list),
        }
    }
}

/// How the response should be rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum OutputFormat {
    #[default]
    Json,
    Html,
}

impl From<String> for OutputFormat {
    fn from(value: String) -> Self {
        if value == "html" {
            OutputFormat::Html
        } else {
            OutputFormat::Json
        }
    }
}

/// A query as the caller supplied it, before sanitization.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryOptions {
    /// Feature id to look up, e.g. `flexbox`.
    pub feature: String,
    #[serde(default)]
    pub browsers: BrowserFilter,
    #[serde(default)]
    pub versions: Option<usize>,
    #[serde(default)]
    pub format: OutputFormat,
}

impl QueryOptions {
    /// Options for `feature` with every other field defaulted.
    pub fn for_feature(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            browsers: BrowserFilter::default(),
            versions: None,
            format: OutputFormat::default(),
        }
    }
}

/// Browser set a sanitized query asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserSelection {
    /// Every browser present in the record, in record order.
    All,
    /// These browsers, in this order, whether the record has them or not.
    List(Vec<String>),
}

/// A sanitized query. Every field is usable as-is.
#[derive(Debug, Clone)]
pub struct Query {
    pub feature: String,
    pub browsers: BrowserSelection,
    pub versions: usize,
    pub format: OutputFormat,
}

/// Degrade raw options into a [`Query`]. Never fails.
pub fn sanitize(options: QueryOptions) -> Query {
    let browsers = match options.browsers {
        BrowserFilter::All => BrowserSelection::All,
        BrowserFilter::List(list) => {
            let known: Vec<String> = list
                .into_iter()
                .filter(|id| is_known_browser(id))
                .collect();
            if known.is_empty() {
                debug!("Requested browsers are all unknown, using defaults");
                default_selection()
            } else {
                BrowserSelection::List(known)
            }
        }
        BrowserFilter::Unspecified => default_selection(),
    };

    let versions = match options.versions {
        Some(n) if n > 0 => n,
        _ => DEFAULT_VERSIONS,
    };

    Query {
        feature: options.feature,
        browsers,
        versions,
        format: options.format,
    }
}

fn default_selection() -> BrowserSelection {
    BrowserSelection::List(DEFAULT_BROWSERS.iter().map(|id| id.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defaults() -> Vec<String> {
        DEFAULT_BROWSERS.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_browsers_all_string() {
        let options: QueryOptions =
            serde_json::from_str(r#"{"feature":"flexbox","browsers":"all"}"#).unwrap();
        assert_eq!(options.browsers, BrowserFilter::All);

        let query = sanitize(options);
        assert_eq!(query.browsers, BrowserSelection::All);
    }

    #[test]
    fn test_browsers_other_string_is_unspecified() {
        let options: QueryOptions =
            serde_json::from_str(r#"{"feature":"flexbox","browsers":"chrome"}"#).unwrap();
        assert_eq!(options.browsers, BrowserFilter::Unspecified);

        let query = sanitize(options);
        assert_eq!(query.browsers, BrowserSelection::List(defaults()));
    }

    #[test]
    fn test_browser_list_keeps_known_in_order() {
        let options: QueryOptions = serde_json::from_str(
            r#"{"feature":"flexbox","browsers":["safari","netscape","ie","mosaic"]}"#,
        )
        .unwrap();

        let query = sanitize(options);
        assert_eq!(
            query.browsers,
            BrowserSelection::List(vec!["safari".to_string(), "ie".to_string()])
        );
    }

    #[test]
    fn test_browser_list_with_no_known_entries_falls_back() {
        let query = sanitize(QueryOptions {
            feature: "flexbox".to_string(),
            browsers: BrowserFilter::List(vec!["netscape".to_string(), "mosaic".to_string()]),
            versions: None,
            format: OutputFormat::Json,
        });
        assert_eq!(query.browsers, BrowserSelection::List(defaults()));
    }

    #[test]
    fn test_empty_browser_list_falls_back() {
        let query = sanitize(QueryOptions {
            feature: "flexbox".to_string(),
            browsers: BrowserFilter::List(Vec::new()),
            versions: None,
            format: OutputFormat::Json,
        });
        assert_eq!(query.browsers, BrowserSelection::List(defaults()));
    }

    #[test]
    fn test_missing_browsers_field_falls_back() {
        let options: QueryOptions = serde_json::from_str(r#"{"feature":"flexbox"}"#).unwrap();
        let query = sanitize(options);
        assert_eq!(query.browsers, BrowserSelection::List(defaults()));
    }

    #[test]
    fn test_versions_defaults() {
        let query = sanitize(QueryOptions::for_feature("flexbox"));
        assert_eq!(query.versions, DEFAULT_VERSIONS);

        let mut options = QueryOptions::for_feature("flexbox");
        options.versions = Some(0);
        assert_eq!(sanitize(options).versions, DEFAULT_VERSIONS);

        let mut options = QueryOptions::for_feature("flexbox");
        options.versions = Some(9);
        assert_eq!(sanitize(options).versions, 9);
    }

    #[test]
    fn test_format_parsing() {
        let options: QueryOptions =
            serde_json::from_str(r#"{"feature":"flexbox","format":"html"}"#).unwrap();
        assert_eq!(options.format, OutputFormat::Html);

        let options: QueryOptions =
            serde_json::from_str(r#"{"feature":"flexbox","format":"yaml"}"#).unwrap();
        assert_eq!(options.format, OutputFormat::Json);

        let options: QueryOptions = serde_json::from_str(r#"{"feature":"flexbox"}"#).unwrap();
        assert_eq!(options.format, OutputFormat::Json);
    }
}
