//! Corpus statistics for deployment sanity checks.

use std::path::Path;

use serde::Serialize;

use healthreport_shared::Result;
use healthreport_storage::ArticleStore;

/// Slugs shown from each end of the corpus.
const SAMPLE_SIZE: usize = 10;

/// Summary of the article directory as the store sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub total: usize,
    pub first: Option<String>,
    pub last: Option<String>,
    pub sample_first_10: Vec<String>,
    pub sample_last_10: Vec<String>,
    pub directory_path: String,
}

/// Count the corpus and sample both ends of the sorted slug list.
pub fn corpus_stats(store: &dyn ArticleStore, directory: &Path) -> Result<CorpusStats> {
    let slugs = store.list_all_slugs()?;
    let tail_start = slugs.len().saturating_sub(SAMPLE_SIZE);

    Ok(CorpusStats {
        total: slugs.len(),
        first: slugs.first().cloned(),
        last: slugs.last().cloned(),
        sample_first_10: slugs.iter().take(SAMPLE_SIZE).cloned().collect(),
        sample_last_10: slugs[tail_start..].to_vec(),
        directory_path: directory.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use healthreport_shared::Document;

    use super::*;

    struct Slugs(Vec<String>);

    impl ArticleStore for Slugs {
        fn list_all_slugs(&self) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }

        fn get_by_slug(&self, _slug: &str) -> Result<Option<Document>> {
            Ok(None)
        }
    }

    #[test]
    fn samples_both_ends() {
        let store = Slugs((0..25).map(|i| format!("a{i:02}")).collect());
        let stats = corpus_stats(&store, Path::new("public/data/articles")).expect("stats");

        assert_eq!(stats.total, 25);
        assert_eq!(stats.first.as_deref(), Some("a00"));
        assert_eq!(stats.last.as_deref(), Some("a24"));
        assert_eq!(stats.sample_first_10.len(), 10);
        assert_eq!(stats.sample_first_10[9], "a09");
        assert_eq!(stats.sample_last_10.first().map(String::as_str), Some("a15"));
        assert_eq!(stats.directory_path, "public/data/articles");
    }

    #[test]
    fn empty_corpus() {
        let stats = corpus_stats(&Slugs(vec![]), Path::new("x")).expect("stats");
        assert_eq!(stats.total, 0);
        assert!(stats.first.is_none());
        assert!(stats.sample_last_10.is_empty());
    }
}
