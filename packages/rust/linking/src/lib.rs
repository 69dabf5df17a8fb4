//! Article relevance and internal linking.
//!
//! All functions here are pure: no I/O, no shared state, and they degrade to
//! empty/unchanged output when given no candidates.
//!
//! - [`score`]: keyword overlap between two articles
//! - [`select_related`]: ranked "related articles" with a deterministic fill
//! - [`find_link_opportunities`] and [`inject_links`]: contextual links in a body

mod inject;
mod opportunities;
mod related;
mod score;

use healthreport_shared::Document;

pub use inject::{DEFAULT_MAX_LINKS, inject_links};
pub use opportunities::{DEFAULT_MAX_OPPORTUNITIES, find_link_opportunities};
pub use related::{
    DEFAULT_RELATED_LIMIT, FillPolicy, InputOrderFill, LexicographicFill, select_related,
    select_related_with,
};
pub use score::{MIN_TOKEN_CHARS, score};

/// Discover link opportunities for `source` among `candidates` and inject them
/// into `content`.
pub fn smart_internal_linking(
    content: &str,
    source: &Document,
    candidates: &[Document],
    max_opportunities: usize,
    max_links: usize,
) -> String {
    let opportunities =
        find_link_opportunities(content, &source.slug, candidates, max_opportunities);
    inject_links(content, source, &opportunities, max_links)
}
