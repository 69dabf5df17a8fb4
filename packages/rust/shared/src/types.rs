//! Core domain types for the article corpus.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// URL prefix under which every article is served.
pub const ARTICLE_PATH_PREFIX: &str = "/article/";

/// Site-relative path for an article slug (`/article/{slug}`).
pub fn article_path(slug: &str) -> String {
    format!("{ARTICLE_PATH_PREFIX}{slug}")
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A single pre-generated article, as stored in `<slug>.json`.
///
/// The stored JSON does not carry the slug; the article store fills it in
/// from the file name. Documents are never mutated after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// URL-safe unique identifier.
    #[serde(default)]
    pub slug: String,
    /// Primary topic phrase, used as the relevance-matching key.
    pub keyword: String,
    /// Display title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Category label (e.g. "how-to guide", "listicle").
    #[serde(default)]
    pub format: String,
    /// Word count recorded at generation time.
    #[serde(default)]
    pub word_count: usize,
    /// Affiliate products referenced in the body.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products_mentioned: Vec<String>,
    /// When the article was generated. Naive timestamps are read as UTC.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Site-relative URL of this article.
    pub fn path(&self) -> String {
        article_path(&self.slug)
    }
}

/// Accepts RFC 3339 as well as the offset-less ISO form many generators emit
/// (`2025-01-15T10:30:00.123456`).
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

// ---------------------------------------------------------------------------
// LinkOpportunity
// ---------------------------------------------------------------------------

/// A candidate for a contextual internal link, computed per render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOpportunity {
    /// Keyword phrase to look for in the content.
    pub keyword: String,
    /// Target article slug.
    pub slug: String,
    /// Target article title (used as the link title).
    pub title: String,
    /// Non-negative relevance score; zero never appears in ranked output.
    pub relevance: u32,
}

impl LinkOpportunity {
    /// Build an opportunity pointing at `doc`.
    pub fn for_document(doc: &Document, relevance: u32) -> Self {
        Self {
            keyword: doc.keyword.clone(),
            slug: doc.slug.clone(),
            title: doc.title.clone(),
            relevance,
        }
    }
}
