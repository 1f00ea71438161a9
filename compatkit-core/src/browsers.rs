//! Fixed browser and support-code lookup tables.
//!
//! These enumerations are shared by option sanitization, projection and
//! HTML rendering. The identifiers and title strings come from the caniuse
//! dataset's contribution guide and must not drift from it.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Browsers a query may ask for when none are given explicitly.
pub const DEFAULT_BROWSERS: [&str; 4] = ["chrome", "firefox", "safari", "edge"];

/// Known browser identifiers mapped to their human-readable names.
///
/// Membership in this table is what makes a browser id valid in a query;
/// the names are what the HTML renderer displays.
pub static BROWSER_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("and_chr", "Chrome (Android)"),
        ("and_ff", "Firefox (Android)"),
        ("and_uc", "UC Browser (Android)"),
        ("android", "Android"),
        ("bb", "Blackberry"),
        ("chrome", "Chrome"),
        ("edge", "Edge"),
        ("firefox", "Firefox"),
        ("ie", "IE"),
        ("ios_saf", "Safari (iOS)"),
        ("op_mini", "Opera Mini"),
        ("op_mob", "Opera Mobile"),
        ("opera", "Opera"),
        ("safari", "Safari"),
        ("samsung", "Samsung Internet"),
    ])
});

/// Human-readable titles for the single-letter support codes.
///
/// Codes missing from this table (dataset extensions) are passed through
/// untitled rather than rejected.
pub static SUPPORT_TITLES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("y", "Supported."),
        ("a", "Almost supported (aka Partial support)."),
        ("n", "No support, or disabled by default."),
        ("p", "No support, but has Polyfill."),
        ("u", "Support unknown."),
        ("x", "Requires prefix to work."),
        ("d", "Disabled by default (needs to enabled)."),
    ])
});

/// Whether `id` is a member of the known browser set.
pub fn is_known_browser(id: &str) -> bool {
    BROWSER_NAMES.contains_key(id)
}

/// Display name for a browser id, falling back to the id itself.
pub fn browser_name(id: &str) -> &str {
    BROWSER_NAMES.get(id).copied().unwrap_or(id)
}

/// Title for a support code, if the code is a known one.
pub fn support_title(code: &str) -> Option<&'static str> {
    SUPPORT_TITLES.get(code).copied()
}
