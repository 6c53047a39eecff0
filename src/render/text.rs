//! Cleanup of annotation text before it is placed in a line.

/// Strip leading and trailing spaces and newlines.
///
/// Only `' '` and `'\n'` are removed; tabs and carriage returns stay.
pub fn trim_details(text: &str) -> &str {
    text.trim_matches(|c| c == ' ' || c == '\n')
}

/// Normalize line breaks inside a line of output.
///
/// `\r\n` and `\n\r` come from wrapped lines of highlighted text and become a
/// space, or nothing when the text so far ends with a hyphen. A lone `\r` or
/// `\n` is an intentional break and becomes `<br>`.
pub fn normalize_breaks(text: &str) -> String {
    join_breaks(text, "<br>")
}

/// Like [`normalize_breaks`] but intentional breaks become a space.
pub fn flatten_breaks(text: &str) -> String {
    join_breaks(text, " ")
}

fn join_breaks(text: &str, hard_break: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' | '\n' => {
                let pair = if c == '\r' { '\n' } else { '\r' };
                if chars.peek() == Some(&pair) {
                    chars.next();
                    if !out.ends_with('-') {
                        out.push(' ');
                    }
                } else {
                    out.push_str(hard_break);
                }
            }
            _ => out.push(c),
        }
    }
    out
}
