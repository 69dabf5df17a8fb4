//! Link-opportunity discovery.
//!
//! Ranks candidate articles by how strongly their keyword shows up in a body of
//! text. The ranked list feeds [`crate::inject_links`].

use std::collections::HashSet;

use regex::Regex;
use tracing::{debug, warn};

use healthreport_shared::{Document, LinkOpportunity};

use crate::score::MIN_TOKEN_CHARS;

/// Default number of opportunities kept after ranking.
pub const DEFAULT_MAX_OPPORTUNITIES: usize = 10;

/// Bonus for the full keyword phrase appearing in the content.
const PHRASE_BONUS: u32 = 10;

/// Rank `candidates` by keyword presence in `content`.
///
/// Relevance is [`PHRASE_BONUS`] when the whole keyword phrase occurs, plus one
/// per whole-word occurrence of each keyword token longer than three characters.
/// Candidates with zero relevance, the current article and repeated slugs are
/// dropped. The result is sorted by relevance (stable) and truncated to `max`.
pub fn find_link_opportunities(
    content: &str,
    current_slug: &str,
    candidates: &[Document],
    max: usize,
) -> Vec<LinkOpportunity> {
    let content_lower = content.to_lowercase();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut opportunities: Vec<LinkOpportunity> = Vec::new();

    for doc in candidates {
        if doc.slug == current_slug || !seen.insert(doc.slug.as_str()) {
            continue;
        }

        let keyword_lower = doc.keyword.trim().to_lowercase();
        if keyword_lower.is_empty() {
            continue;
        }

        let mut relevance = 0u32;
        if content_lower.contains(&keyword_lower) {
            relevance += PHRASE_BONUS;
        }

        for word in keyword_lower
            .split_whitespace()
            .filter(|w| w.chars().count() > MIN_TOKEN_CHARS)
        {
            relevance += whole_word_count(&content_lower, word);
        }

        if relevance > 0 {
            opportunities.push(LinkOpportunity::for_document(doc, relevance));
        }
    }

    opportunities.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    opportunities.truncate(max);

    debug!(
        current = current_slug,
        candidates = candidates.len(),
        kept = opportunities.len(),
        "link opportunities ranked"
    );

    opportunities
}

fn whole_word_count(haystack: &str, word: &str) -> u32 {
    let pattern = format!(r"\b{}\b", regex::escape(word));
    match Regex::new(&pattern) {
        Ok(re) => u32::try_from(re.find_iter(haystack).count()).unwrap_or(u32::MAX),
        Err(e) => {
            warn!(word, error = %e, "skipping token with unusable pattern");
            0
        }
    }
}
