//! Version ordering for browser release strings.
//!
//! The dataset's version keys are mostly dotted numbers (`"9"`, `"11.1"`)
//! with occasional labels such as Safari's `"TP"` technology preview or
//! Android's range keys (`"4.4.3-4.4.4"`). Ordering rules:
//!
//! - only the first three dot-separated segments are considered;
//! - numeric segments compare by value, not lexicographically, and a
//!   missing segment counts as zero;
//! - a segment that is not a number sorts ABOVE every number at the same
//!   position, so preview builds end up newer than any numbered release.
//!
//! This is deliberately not semantic versioning; display order depends on
//! the non-numeric rule, so it must stay exactly as is.

use std::cmp::Ordering;

/// Compare two version strings under the dataset's ordering.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let pa: Vec<&str> = a.split('.').collect();
    let pb: Vec<&str> = b.split('.').collect();

    for i in 0..3 {
        let na = segment_number(pa.get(i).copied());
        let nb = segment_number(pb.get(i).copied());

        match (na, nb) {
            (Some(x), Some(y)) => {
                if x > y {
                    return Ordering::Greater;
                }
                if y > x {
                    return Ordering::Less;
                }
            }
            // A label beats any number at the same position.
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (None, None) => {}
        }
    }

    Ordering::Equal
}

/// Numeric value of one segment; `None` marks labels like `"TP"`.
///
/// Missing and empty segments count as zero, so `"3"` sorts below `"3.5"`
/// instead of picking up the label rule.
fn segment_number(segment: Option<&str>) -> Option<f64> {
    match segment {
        None | Some("") => Some(0.0),
        Some(s) => s.parse::<f64>().ok().filter(|n| !n.is_nan()),
    }
}
