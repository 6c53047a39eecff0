//! Resolve the text lying under one quad region.
//!
//! Only whole tokens carry geometry, so partial coverage is estimated by
//! assuming every character of a token has the same width. The right edge gets
//! a correction: runs dominated by wide glyphs round the cut down, runs
//! dominated by slim glyphs round it up. The letter sets are tuned for Latin
//! text and are an approximation for anything else.

use crate::model::{round_half_up, Bounds, TextToken};

const WIDE_LETTERS: &[char] = &[
    'w', 'm', 'W', 'M', 'D', 'O', 'Q', 'G', 'S', 'B', 'C', 'P', 'E', 'R', 'A', 'N', 'U', 'V', 'X',
    'Y', 'Z', 'K', 'H',
];

const SLIM_LETTERS: &[char] = &[
    'i', 'r', 'l', 't', 'f', 'j', 'I', '1', '.', ',', '(', ')', '"', '\'',
];

/// Text covered by `bounds`, joined in token order and trimmed.
///
/// `tokens` must already be in reading order (see
/// [`TextLayerIndex`](super::TextLayerIndex)). A token contributes when its
/// baseline y lies in `[min_y, max_y]` and its horizontal span touches
/// `[min_x, max_x]`. Tokens with zero width are ignored. A region covering
/// nothing yields an empty string.
///
/// Adjacent pieces are separated by one space unless either side of the
/// boundary is already whitespace, so text layers that emit explicit space
/// runs are not double-spaced. A word the text layer splits into style runs
/// gets a space too: `"im"` followed by an italic `"portant"` resolves to
/// `"im portant"`. Runs carry no flag telling the two cases apart, so word
/// boundaries between runs without explicit spaces win.
pub fn resolve(bounds: &Bounds, tokens: &[TextToken]) -> String {
    let covered = tokens
        .iter()
        .filter_map(|token| covered_part(bounds, token))
        .filter(|piece| !piece.is_empty())
        .fold(String::new(), |mut acc, piece| {
            let needs_space = !acc.is_empty()
                && !acc.ends_with(char::is_whitespace)
                && !piece.starts_with(char::is_whitespace);
            if needs_space {
                acc.push(' ');
            }
            acc.push_str(&piece);
            acc
        });
    covered.trim().to_string()
}

fn covered_part(bounds: &Bounds, token: &TextToken) -> Option<String> {
    if token.width == 0.0 || !token.width.is_finite() {
        return None;
    }
    if !(bounds.min_y <= token.y && token.y <= bounds.max_y) {
        return None;
    }
    if token.end_x() < bounds.min_x || token.x > bounds.max_x {
        return None;
    }

    let chars: Vec<char> = token.text.chars().collect();
    let len = token.char_len() as f64;

    let start = if token.x >= bounds.min_x {
        0
    } else {
        (round_half_up(len * (bounds.min_x - token.x) / token.width) as usize).min(chars.len())
    };

    if token.end_x() <= bounds.max_x {
        return Some(chars[start..].iter().collect());
    }

    let exact_end = len * (bounds.max_x - token.x) / token.width;
    let end = (corrected_end(&chars, start, exact_end) as usize).min(chars.len());
    if end <= start {
        return Some(String::new());
    }
    Some(chars[start..end].iter().collect())
}

/// Round `exact_end` using the glyph mix of the candidate cut.
///
/// The candidate is `exact_end` characters taken from `start`, rounded
/// normally; its wide/slim balance picks floor, ceil or the normal rounding.
fn corrected_end(chars: &[char], start: usize, exact_end: f64) -> f64 {
    let rounded = round_half_up(exact_end);
    let take = rounded.max(0.0) as usize;
    let stop = start.saturating_add(take).min(chars.len());
    let candidate = &chars[start.min(stop)..stop];

    let wide = candidate.iter().filter(|c| is_wide(**c)).count();
    let slim = candidate.iter().filter(|c| is_slim(**c)).count();

    match wide.cmp(&slim) {
        std::cmp::Ordering::Greater => exact_end.floor(),
        std::cmp::Ordering::Less => exact_end.ceil(),
        std::cmp::Ordering::Equal => rounded,
    }
}

/// Whether a glyph is counted as wide by the end-rounding correction.
pub fn is_wide(c: char) -> bool {
    WIDE_LETTERS.contains(&c)
}

/// Whether a glyph is counted as slim by the end-rounding correction.
pub fn is_slim(c: char) -> bool {
    SLIM_LETTERS.contains(&c)
}
