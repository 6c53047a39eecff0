//! Join per-line resolved text into one highlighted string.

use super::resolver::resolve;
use crate::model::{QuadRegion, TextToken};

/// Resolve every region and join the results line by line.
///
/// Regions are taken in the order given, which is expected to be one region
/// per covered line from top to bottom.
pub fn stitch(regions: &[QuadRegion], tokens: &[TextToken]) -> String {
    regions
        .iter()
        .map(|region| resolve(&region.bounds(), tokens))
        .fold(String::new(), |acc, line| join_lines(&acc, &line))
}

/// Join accumulated text with the next line.
///
/// A trailing hyphen is dropped only when the two characters ending `acc` and
/// the first character of `next` all read as lowercase; otherwise the hyphen
/// is kept and the line joins without a space. Lines not ending in a hyphen
/// are joined with a single space. Compound words broken at their own hyphen
/// lose it when both sides are lowercase.
pub fn join_lines(acc: &str, next: &str) -> String {
    if acc.is_empty() {
        return next.to_string();
    }
    let Some(stem) = acc.strip_suffix('-') else {
        return format!("{} {}", acc, next);
    };

    let tail: String = {
        let chars: Vec<char> = acc.chars().collect();
        chars[chars.len().saturating_sub(2)..].iter().collect()
    };
    let head: String = next.chars().take(1).collect();

    if reads_lowercase(&tail) && reads_lowercase(&head) {
        format!("{}{}", stem, next)
    } else {
        format!("{}{}", acc, next)
    }
}

/// Whether lowercasing leaves the text unchanged.
///
/// Hyphens, digits and the empty string all count as lowercase.
fn reads_lowercase(s: &str) -> bool {
    s.to_lowercase() == s
}
