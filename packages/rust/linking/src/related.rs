//! Related-article selection.
//!
//! Candidates are ranked by keyword relevance against the source article. When
//! fewer than `limit` candidates are relevant, the remainder is filled from the
//! unranked pool through a pluggable [`FillPolicy`], so the widget stays full
//! without pulling randomness into the pipeline.

use std::collections::HashSet;

use tracing::debug;

use healthreport_shared::Document;

use crate::score::score;

/// Default number of related articles shown under an article.
pub const DEFAULT_RELATED_LIMIT: usize = 6;

// ---------------------------------------------------------------------------
// Fill policies
// ---------------------------------------------------------------------------

/// Chooses filler articles when too few candidates are relevant.
///
/// `pool` never contains the source or an already selected slug, and holds no
/// duplicate slugs. Implementations return at most `needed` entries from it.
pub trait FillPolicy {
    fn fill<'a>(&self, pool: Vec<&'a Document>, needed: usize) -> Vec<&'a Document>;
}

/// Take the first unused candidates in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputOrderFill;

impl FillPolicy for InputOrderFill {
    fn fill<'a>(&self, pool: Vec<&'a Document>, needed: usize) -> Vec<&'a Document> {
        pool.into_iter().take(needed).collect()
    }
}

/// Take the lexicographically smallest unused slugs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicographicFill;

impl FillPolicy for LexicographicFill {
    fn fill<'a>(&self, mut pool: Vec<&'a Document>, needed: usize) -> Vec<&'a Document> {
        pool.sort_by(|a, b| a.slug.cmp(&b.slug));
        pool.truncate(needed);
        pool
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Select up to `limit` related articles, filling in input order.
pub fn select_related<'a>(
    source: &Document,
    candidates: &'a [Document],
    limit: usize,
) -> Vec<&'a Document> {
    select_related_with(source, candidates, limit, &InputOrderFill)
}

/// Select up to `limit` related articles with an explicit fill policy.
///
/// The result never contains the source, never repeats a slug, and has length
/// `min(limit, distinct candidates other than the source)`. Relevant candidates
/// come first, by descending score; equal scores keep their input order.
pub fn select_related_with<'a>(
    source: &Document,
    candidates: &'a [Document],
    limit: usize,
    fill: &dyn FillPolicy,
) -> Vec<&'a Document> {
    let eligible = eligible_candidates(source, candidates);

    let mut scored: Vec<(u32, &'a Document)> = eligible
        .iter()
        .map(|doc| (score(&source.keyword, &doc.keyword), *doc))
        .filter(|(s, _)| *s > 0)
        .collect();
    // `sort_by` is stable, so ties keep input order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut selected: Vec<&'a Document> =
        scored.into_iter().take(limit).map(|(_, doc)| doc).collect();
    let ranked = selected.len();

    if selected.len() < limit {
        let taken: HashSet<&'a str> = selected.iter().map(|&d| d.slug.as_str()).collect();
        let pool: Vec<&'a Document> = eligible
            .into_iter()
            .filter(|d| !taken.contains(d.slug.as_str()))
            .collect();

        let needed = limit - selected.len();
        let mut seen = taken;
        for doc in fill.fill(pool, needed).into_iter().take(needed) {
            if doc.slug != source.slug && seen.insert(doc.slug.as_str()) {
                selected.push(doc);
            }
        }
    }

    debug!(
        source = %source.slug,
        candidates = candidates.len(),
        ranked,
        filled = selected.len() - ranked,
        "related articles selected"
    );

    selected
}

/// Candidates other than the source, first occurrence of each slug only.
fn eligible_candidates<'a>(source: &Document, candidates: &'a [Document]) -> Vec<&'a Document> {
    let mut seen: HashSet<&'a str> = HashSet::new();
    candidates
        .iter()
        .filter(|doc| doc.slug != source.slug)
        .filter(|&doc| seen.insert(doc.slug.as_str()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
