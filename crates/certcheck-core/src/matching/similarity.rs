//! Edit-distance similarity between certification names

use strsim::levenshtein;

use super::normalization::normalize;
use crate::config::MatchingConfig;

/// Levenshtein distance between the normalized forms of `a` and `b`
pub fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein(&normalize(a), &normalize(b))
}

/// Similarity in `[0, 1]`: `(max_len - distance) / max_len` over normalized forms
///
/// Two names that both normalize to empty are identical (1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_similarity(&normalize(a), &normalize(b))
}

/// Same as [`similarity`] for strings that are already normalized
pub(crate) fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Strictly more similar than the default threshold, but not normalized-identical
///
/// Identical names are exact matches, which are reported separately.
pub fn are_similar(a: &str, b: &str) -> bool {
    are_similar_normalized(
        &normalize(a),
        &normalize(b),
        MatchingConfig::default().similarity_threshold,
    )
}

pub(crate) fn are_similar_normalized(a: &str, b: &str, threshold: f64) -> bool {
    if a == b {
        return false;
    }
    let score = normalized_similarity(a, b);
    score > threshold && score < 1.0
}
