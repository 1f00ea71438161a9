//! HTML fragment rendering for query responses.
//!
//! The fragment is a small support widget: one block per browser showing
//! the newest version as a labeled button and the older versions as a
//! plain list, followed by a link to the feature's page upstream. It is
//! meant to be embedded in a host page, so no document scaffolding is
//! emitted.

use crate::browsers::{browser_name, support_title};
use crate::query::options::Query;
use crate::query::project::ResponseBody;
use crate::record::VersionSupport;

/// Base URL of the upstream feature pages linked from every fragment.
pub const CANIUSE_URL: &str = "https://caniuse.com";

/// Render `body` as a support-widget HTML fragment.
///
/// Browsers whose sliced timeline is empty are skipped entirely. Support
/// codes become CSS classes as-is; only codes with a known title
/// contribute to the human-readable `title` attribute.
pub fn render(query: &Query, body: &ResponseBody) -> String {
    let mut html = String::with_capacity(1024);

    for (browser, timeline) in &body.browsers {
        let Some((latest, older)) = timeline.split_first() else {
            continue;
        };

        html.push_str("<div class=\"caniuse-browser\">");
        html.push_str(&format!(
            "<button class=\"{}\" title=\"{}\">{} {}</button>",
            escape(&cell_class(latest)),
            escape(&cell_title(latest)),
            escape(browser_name(browser)),
            escape(latest.version())
        ));

        if !older.is_empty() {
            html.push_str("<ul>");
            for entry in older {
                html.push_str(&format!(
                    "<li class=\"{}\" title=\"{}\">{}</li>",
                    escape(&cell_class(entry)),
                    escape(&cell_title(entry)),
                    escape(entry.version())
                ));
            }
            html.push_str("</ul>");
        }

        html.push_str("</div>");
    }

    html.push_str(&format!(
        "<a href=\"{}/{}\">More info</a>",
        CANIUSE_URL,
        escape(&query.feature)
    ));

    html
}

/// Class attribute for one cell: the cell marker plus every raw code.
fn cell_class(entry: &VersionSupport) -> String {
    let mut class = String::from("caniuse-cell");
    for code in entry.codes() {
        class.push(' ');
        class.push_str(code);
    }
    class
}

/// Title attribute for one cell: the known codes' titles, joined.
fn cell_title(entry: &VersionSupport) -> String {
    entry
        .codes()
        .iter()
        .filter_map(|code| support_title(code))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape text for element content and double-quoted attribute values.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
