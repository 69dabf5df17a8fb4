//! Contextual internal-link injection.
//!
//! Rewrites the first free occurrence of each candidate keyword in a Markdown
//! body into a `[text](/article/slug "Title")` link. Longer keywords are tried
//! first so a specific phrase wins over a generic one at the same position.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use healthreport_shared::{Document, LinkOpportunity, article_path};

/// Default cap on internal links per article.
pub const DEFAULT_MAX_LINKS: usize = 5;

/// Inject up to `max_links` internal links into `content`.
///
/// - Candidates pointing at `source` are ignored.
/// - Text already inside a Markdown or HTML link is never wrapped again, nor is
///   text directly after `[` or directly before `]`/`(`.
/// - Each keyword (case-folded) is linked at most once.
/// - Internal links already present in `content` count toward the cap and their
///   targets are not linked again, so running the injector over its own output
///   adds nothing.
///
/// Returns `content` unchanged when there is nothing to link.
pub fn inject_links(
    content: &str,
    source: &Document,
    candidates: &[LinkOpportunity],
    max_links: usize,
) -> String {
    let existing = existing_internal_links(content);
    let budget = max_links.saturating_sub(existing.len());
    if budget == 0 || candidates.is_empty() {
        return content.to_string();
    }

    let mut ordered: Vec<&LinkOpportunity> = candidates
        .iter()
        .filter(|opp| opp.slug != source.slug)
        .filter(|opp| !existing.contains(&opp.slug))
        .collect();
    // Stable: equal lengths keep their ranking order.
    ordered.sort_by(|a, b| b.keyword.chars().count().cmp(&a.keyword.chars().count()));

    let mut result = content.to_string();
    let mut used: HashSet<String> = HashSet::new();

    for opp in ordered {
        if used.len() >= budget {
            break;
        }

        let keyword = opp.keyword.trim();
        let folded = keyword.to_lowercase();
        if keyword.is_empty() || used.contains(&folded) {
            continue;
        }

        let Some(pattern) = keyword_pattern(keyword) else {
            continue;
        };

        let protected = link_spans(&result);
        let found = pattern
            .find_iter(&result)
            .find(|m| is_linkable(&result, m.range(), &protected))
            .map(|m| (m.range(), m.as_str().to_string()));

        let Some((range, matched)) = found else {
            continue;
        };

        let link = format!(
            "[{matched}]({} \"{}\")",
            article_path(&opp.slug),
            opp.title.replace('"', "'")
        );
        result.replace_range(range, &link);
        used.insert(folded);
    }

    debug!(
        source = %source.slug,
        existing = existing.len(),
        inserted = used.len(),
        "contextual links injected"
    );

    result
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Case-insensitive whole-phrase pattern for a keyword.
///
/// Word boundaries are only asserted next to word characters, so keywords that
/// start or end with punctuation still match.
fn keyword_pattern(keyword: &str) -> Option<Regex> {
    let starts_word = keyword.chars().next().is_some_and(is_word_char);
    let ends_word = keyword.chars().last().is_some_and(is_word_char);

    let pattern = format!(
        "(?i){}{}{}",
        if starts_word { r"\b" } else { "" },
        regex::escape(keyword),
        if ends_word { r"\b" } else { "" },
    );

    Regex::new(&pattern)
        .inspect_err(|e| warn!(keyword, error = %e, "skipping keyword with unusable pattern"))
        .ok()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte ranges of every Markdown link/image and HTML anchor in `text`.
///
/// A Markdown link with a quoted title ends at the `)` after the closing quote,
/// so parentheses inside the title stay protected.
fn link_spans(text: &str) -> Vec<Range<usize>> {
    static MD_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"\[[^\]]*\]\((?:[^)\s]*\s+"[^"]*"|[^)]*)\)"#).expect("valid regex")
    });
    static HTML_LINK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>.*?</a>").expect("valid regex"));

    MD_LINK_RE
        .find_iter(text)
        .chain(HTML_LINK_RE.find_iter(text))
        .map(|m| m.range())
        .collect()
}

fn is_linkable(text: &str, range: Range<usize>, protected: &[Range<usize>]) -> bool {
    if protected
        .iter()
        .any(|span| range.start < span.end && span.start < range.end)
    {
        return false;
    }

    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();

    before != Some('[') && !matches!(after, Some(']') | Some('('))
}

/// Distinct slugs of internal article links already present in `content`.
fn existing_internal_links(content: &str) -> HashSet<String> {
    static INTERNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r##"(?:\]\(|href=")/article/([^)\s"#?]+)"##).expect("valid regex")
    });

    INTERNAL_RE
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Document {
        Document {
            slug: "gut-health".into(),
            keyword: "gut health".into(),
            title: "Gut Health".into(),
            content: String::new(),
            format: "guide".into(),
            word_count: 0,
            products_mentioned: vec![],
            generated_at: None,
        }
    }

    fn opp(keyword: &str, slug: &str) -> LinkOpportunity {
        LinkOpportunity {
            keyword: keyword.into(),
            slug: slug.into(),
            title: format!("All About {keyword}"),
            relevance: 1,
        }
    }

    fn count_links(text: &str) -> usize {
        text.matches("](/article/").count()
    }

    #[test]
    fn links_first_occurrence_only() {
        let content = "Probiotics help. Eat probiotics daily.";
        let result = inject_links(content, &source(), &[opp("probiotics", "probiotics")], 5);
        assert_eq!(
            result,
            "[Probiotics](/article/probiotics \"All About probiotics\") help. Eat probiotics daily."
        );
    }

    #[test]
    fn whole_words_only() {
        let content = "Sleeping well matters.";
        let result = inject_links(content, &source(), &[opp("sleep", "sleep")], 5);
        assert_eq!(result, content);
    }

    #[test]
    fn skips_self_links() {
        let content = "Gut health is central.";
        let result = inject_links(content, &source(), &[opp("gut health", "gut-health")], 5);
        assert_eq!(result, content);
    }

    #[test]
    fn longer_keyword_wins() {
        let content = "Try natural sleep remedies tonight.";
        let candidates = vec![opp("sleep", "sleep"), opp("natural sleep remedies", "remedies")];
        let result = inject_links(content, &source(), &candidates, 5);
        assert!(result.contains("[natural sleep remedies](/article/remedies"));
        assert!(!result.contains("/article/sleep "));
        assert_eq!(count_links(&result), 1);
    }

    #[test]
    fn respects_cap() {
        let content = "alpha bravo charlie delta echo foxtrot golf";
        let candidates: Vec<_> = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf"]
            .iter()
            .map(|w| opp(w, w))
            .collect();
        let result = inject_links(content, &source(), &candidates, 3);
        assert_eq!(count_links(&result), 3);
    }

    #[test]
    fn same_keyword_from_two_candidates_linked_once() {
        let content = "Magnesium before bed. More magnesium facts.";
        let candidates = vec![opp("magnesium", "mag-a"), opp("Magnesium", "mag-b")];
        let result = inject_links(content, &source(), &candidates, 5);
        assert_eq!(count_links(&result), 1);
        assert!(result.contains("/article/mag-a"));
    }

    #[test]
    fn never_wraps_existing_links() {
        let content = "Read [vitamin d basics](https://example.com/vitd) first.";
        let result = inject_links(content, &source(), &[opp("vitamin d", "vitamin-d")], 5);
        assert_eq!(result, content);
    }

    #[test]
    fn never_wraps_html_anchors() {
        let content = r#"See <a href="https://x.com">zinc guide</a> for zinc."#;
        let result = inject_links(content, &source(), &[opp("zinc", "zinc")], 5);
        assert_eq!(
            result,
            r#"See <a href="https://x.com">zinc guide</a> for [zinc](/article/zinc "All About zinc")."#
        );
    }

    #[test]
    fn second_pass_adds_nothing() {
        let content = "Fiber and protein and fiber and protein and iron and zinc.";
        let candidates = vec![
            opp("fiber", "fiber"),
            opp("protein", "protein"),
            opp("iron", "iron"),
            opp("zinc", "zinc"),
        ];
        let once = inject_links(content, &source(), &candidates, 3);
        let twice = inject_links(&once, &source(), &candidates, 3);
        assert_eq!(count_links(&once), 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn keyword_with_regex_metacharacters() {
        let content = "Is vitamin c+ (ascorbic) useful?";
        let candidates = vec![opp("vitamin c+", "vit-c"), opp("(ascorbic)", "ascorbic")];
        let result = inject_links(content, &source(), &candidates, 5);
        assert!(result.contains("[vitamin c+](/article/vit-c"));
        assert!(result.contains("[(ascorbic)](/article/ascorbic"));
    }

    #[test]
    fn title_quotes_are_neutralized() {
        let mut candidate = opp("omega 3", "omega-3");
        candidate.title = r#"The "Best" Omega 3"#.into();
        let result = inject_links("Take omega 3 daily.", &source(), &[candidate], 5);
        assert!(result.contains(r#""The 'Best' Omega 3""#));
    }

    #[test]
    fn empty_candidates_leave_content_alone() {
        let content = "Nothing to link here.";
        assert_eq!(inject_links(content, &source(), &[], 5), content);
        assert_eq!(inject_links(content, &source(), &[opp("nothing", "n")], 0), content);
    }

    #[test]
    fn parentheses_in_title_stay_inside_the_link() {
        let mut vitamin = opp("vitamin d", "vitamin-d");
        vitamin.title = "Vitamin D (D3) Guide".into();
        let mut guide = opp("guide", "guide");
        guide.title = "A Guide".into();

        let result = inject_links(
            "Take vitamin d daily. Read this guide.",
            &source(),
            &[vitamin, guide],
            5,
        );
        assert_eq!(
            result,
            r#"Take [vitamin d](/article/vitamin-d "Vitamin D (D3) Guide") daily. Read this [guide](/article/guide "A Guide")."#
        );
    }

    #[test]
    fn repeated_authored_links_use_one_slot() {
        let content = "See [zinc](/article/zinc) and [more zinc](/article/zinc). Add iron.";
        let result = inject_links(content, &source(), &[opp("iron", "iron")], 2);
        assert!(result.contains("[iron](/article/iron"));
    }
}
