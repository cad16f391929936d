//! Splitting free text into normalised tokens.

/// Characters that separate tokens besides whitespace.
const DELIMITERS: &[char] = &[',', '!', '?', '.', ':', '(', ')', '"'];

#[inline]
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || DELIMITERS.contains(&c)
}

/// Raw, non-empty pieces of `text` between delimiters.
pub fn split_raw(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_delimiter).filter(|piece| !piece.is_empty())
}

/// Strips surrounding punctuation and lower-cases a raw piece.
///
/// Returns `None` for pieces that consist of punctuation only.
pub fn normalise(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_punctuation());
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Tokens of `text` in reading order.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    split_raw(text).filter_map(normalise)
}
