//! Per-page `<title>` and meta description.

use healthreport_markdown::{EXCERPT_CHARS, excerpt};
use healthreport_shared::Document;

/// Title shown for a slug with no article behind it.
pub const NOT_FOUND_TITLE: &str = "Article Not Found";

/// Head metadata for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: Option<String>,
}

/// Metadata for an article page, or the not-found page when `doc` is `None`.
pub fn article_metadata(doc: Option<&Document>, site_name: &str) -> PageMetadata {
    match doc {
        Some(doc) => PageMetadata {
            title: format!("{} | {site_name}", doc.title),
            description: Some(excerpt(&doc.content, EXCERPT_CHARS)),
        },
        None => PageMetadata {
            title: NOT_FOUND_TITLE.to_string(),
            description: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_title_and_description() {
        let doc = Document {
            slug: "omega-3".into(),
            keyword: "omega 3".into(),
            title: "Omega 3 Benefits".into(),
            content: format!("# Omega 3\n\n**Fish oil** {}", "x".repeat(300)),
            format: "guide".into(),
            word_count: 0,
            products_mentioned: vec![],
            generated_at: None,
        };

        let meta = article_metadata(Some(&doc), "The Healthy Solutions Report");
        assert_eq!(meta.title, "Omega 3 Benefits | The Healthy Solutions Report");

        let description = meta.description.expect("description");
        assert!(description.starts_with("Omega 3"));
        assert!(!description.contains('#'));
        assert!(!description.contains('*'));
        assert!(description.chars().count() <= EXCERPT_CHARS);
    }

    #[test]
    fn missing_article() {
        let meta = article_metadata(None, "Site");
        assert_eq!(meta.title, NOT_FOUND_TITLE);
        assert!(meta.description.is_none());
    }
}
