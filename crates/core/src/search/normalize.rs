//! Text normalization shared by the index, the query side and the lexicon.

/// Lowercase `text`, drop apostrophes and turn every other non-alphanumeric
/// character into a separator; runs of whitespace collapse to one space.
///
/// `"King's Indian: Sämisch"` becomes `"kings indian sämisch"`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    out
}

/// Normalized tokens of `text`.
pub fn tokens(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
