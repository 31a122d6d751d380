//! Text normalization for name comparison

/// Canonical comparison form of a display name
///
/// - Converts to lowercase
/// - Removes everything that is not a word character or whitespace
/// - Collapses whitespace runs to a single space and trims
///
/// Two names are the same for matching purposes iff their normalized forms
/// are equal.
pub fn normalize(s: &str) -> String {
    let stripped: String = s
        .to_lowercase()
        .chars()
        .filter(|&c| is_word_char(c) || c.is_whitespace())
        .collect();

    collapse_whitespace(&stripped)
}

/// Letters, digits and underscore
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Collapse whitespace runs and trim both ends
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Substring containment in either direction, over already-normalized strings
///
/// Unlike plain `str::contains`, an empty side never matches. Otherwise a name
/// that normalizes to nothing would match every catalog type.
pub fn contains_either(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}
