//! Query pipeline: sanitize options, load the record, project, render.
//!
//! This is the read path of the crate. It never errors: a feature that
//! cannot be loaded comes back as [`QueryResponse::NotFound`], and every
//! other input problem was already degraded to a default by the
//! sanitizer.

pub mod html;
pub mod options;
pub mod project;

pub use html::render;
pub use options::{
    sanitize, BrowserFilter, BrowserSelection, OutputFormat, Query, QueryOptions,
    DEFAULT_VERSIONS,
};
pub use project::{project, ResponseBody};

use tracing::debug;

use crate::store::{FeatureStore, Lookup};

/// A fully rendered query result.
#[derive(Debug, Clone)]
pub enum QueryResponse {
    /// The projected record, ready for JSON serialization.
    Json(ResponseBody),
    /// The rendered support-widget fragment.
    Html(String),
    /// The feature could not be loaded.
    NotFound,
}

/// Answer one query against `store`.
pub async fn respond(store: &FeatureStore, options: QueryOptions) -> QueryResponse {
    let query = sanitize(options);
    debug!(
        "Querying feature '{}' ({} versions)",
        query.feature, query.versions
    );

    let record = match store.load(&query.feature).await {
        Lookup::Found(record) => record,
        Lookup::NotFound => return QueryResponse::NotFound,
    };

    let body = project(&record, &query);
    match query.format {
        OutputFormat::Json => QueryResponse::Json(body),
        OutputFormat::Html => QueryResponse::Html(render(&query, &body)),
    }
}
