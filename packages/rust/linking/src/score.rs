//! Keyword relevance scoring.

/// Source tokens this short or shorter never count toward a score.
pub const MIN_TOKEN_CHARS: usize = 3;

/// Score how related `candidate_keyword` is to `source_keyword`.
///
/// Both phrases are lowercased and split on whitespace. Every source token
/// longer than [`MIN_TOKEN_CHARS`] that is a substring of, or contains, some
/// candidate token adds one point. Zero means "not a candidate".
///
/// Substring containment is deliberately loose so that "digestion" and
/// "digestive" still meet through their shared stem.
pub fn score(source_keyword: &str, candidate_keyword: &str) -> u32 {
    let source = source_keyword.to_lowercase();
    let candidate = candidate_keyword.to_lowercase();
    let candidate_tokens: Vec<&str> = candidate.split_whitespace().collect();

    let hits = source
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .filter(|token| {
            candidate_tokens
                .iter()
                .any(|other| other.contains(*token) || token.contains(*other))
        })
        .count();

    u32::try_from(hits).unwrap_or(u32::MAX)
}
