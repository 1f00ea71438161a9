//! Raw support-status parsing.
//!
//! An upstream status string packs one or more single-letter support codes
//! and an optional `#n` footnote reference, e.g. `"n d #6"`. Queries only
//! care about the codes.

/// Split a raw status string into its support codes, dropping the footnote.
///
/// Order and duplicates are preserved; tokens are not checked against the
/// known code set (unknown dataset extensions pass through untouched).
///
/// `"n d #6"` -> `["n", "d"]`
pub fn parse_status(raw: &str) -> Vec<String> {
    raw.split('#')
        .next()
        .unwrap_or("")
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footnote_is_stripped() {
        assert_eq!(parse_status("n d #6"), ["n", "d"]);
        assert_eq!(parse_status("y #130"), ["y"]);
    }

    #[test]
    fn test_single_code() {
        assert_eq!(parse_status("y"), ["y"]);
    }

    #[test]
    fn test_footnote_only_yields_nothing() {
        assert!(parse_status("#only-footnote").is_empty());
        assert!(parse_status("").is_empty());
    }

    #[test]
    fn test_duplicate_and_unknown_codes_survive() {
        assert_eq!(parse_status("a x a"), ["a", "x", "a"]);
        assert_eq!(parse_status("y zz"), ["y", "zz"]);
    }

    #[test]
    fn test_extra_spaces_collapse() {
        assert_eq!(parse_status("n  d"), ["n", "d"]);
        assert_eq!(parse_status(" y "), ["y"]);
    }
}
