//! Article storage layer.
//!
//! Articles are read-only JSON documents, one `<slug>.json` per article. The
//! [`ArticleStore`] trait is the seam the renderer and the site builder use;
//! [`JsonDirStore`] is the on-disk implementation.
//!
//! **Access rules:**
//! - The store never writes. Articles are produced by an external generator.
//! - Slugs are listed in lexicographic order so every consumer sees the same
//!   corpus order.

mod json_dir;
mod sample;

use tracing::warn;

use healthreport_shared::{Document, Result};

pub use json_dir::JsonDirStore;
pub use sample::sample_candidates;

/// Read access to the article corpus.
pub trait ArticleStore {
    /// All known slugs, sorted lexicographically.
    fn list_all_slugs(&self) -> Result<Vec<String>>;

    /// Load one article. `Ok(None)` means no article exists for `slug`.
    fn get_by_slug(&self, slug: &str) -> Result<Option<Document>>;

    /// Load every article, skipping the ones that cannot be read or decoded.
    ///
    /// Only a failure to list the corpus is an error.
    fn load_all(&self) -> Result<LoadedCorpus> {
        let slugs = self.list_all_slugs()?;
        let mut corpus = LoadedCorpus::default();

        for slug in slugs {
            match self.get_by_slug(&slug) {
                Ok(Some(doc)) => corpus.documents.push(doc),
                Ok(None) => {
                    warn!(slug = %slug, "article vanished while loading");
                    corpus.skipped.push(slug);
                }
                Err(e) => {
                    warn!(slug = %slug, error = %e, "skipping unreadable article");
                    corpus.skipped.push(slug);
                }
            }
        }

        Ok(corpus)
    }
}

/// Result of [`ArticleStore::load_all`].
#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    /// Successfully decoded articles, in slug order.
    pub documents: Vec<Document>,
    /// Slugs that were listed but could not be loaded.
    pub skipped: Vec<String>,
}

impl LoadedCorpus {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Find a loaded article by slug.
    pub fn get(&self, slug: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.slug == slug)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
