//! Deterministic candidate sampling.
//!
//! Rendering an article compares it against a bounded window of the corpus
//! instead of every article. The window start is derived from a hash of the
//! source slug, so the same article always sees the same candidates and
//! different articles see different slices.

use sha2::{Digest, Sha256};

/// Pick up to `n` slugs from `slugs`, excluding `source_slug`.
///
/// `slugs` is expected in the store's sorted order. Selection starts at an
/// offset taken from the SHA-256 of `source_slug` and wraps around, so the
/// output is stable for a given corpus and has no duplicates when the input has
/// none.
pub fn sample_candidates(slugs: &[String], source_slug: &str, n: usize) -> Vec<String> {
    if slugs.is_empty() || n == 0 {
        return Vec::new();
    }

    let start = offset_for(source_slug, slugs.len());
    slugs
        .iter()
        .cycle()
        .skip(start)
        .take(slugs.len())
        .filter(|slug| slug.as_str() != source_slug)
        .take(n)
        .cloned()
        .collect()
}

fn offset_for(slug: &str, len: usize) -> usize {
    let digest = Sha256::digest(slug.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    // `len` fits in u64 on every supported target, and the remainder is < len.
    (u64::from_be_bytes(head) % len as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("article-{i:03}")).collect()
    }

    #[test]
    fn excludes_source_and_respects_n() {
        let slugs = corpus(20);
        let picked = sample_candidates(&slugs, "article-005", 8);
        assert_eq!(picked.len(), 8);
        assert!(!picked.iter().any(|s| s == "article-005"));
    }

    #[test]
    fn small_corpus_returns_everything_but_source() {
        let slugs = corpus(4);
        let mut picked = sample_candidates(&slugs, "article-002", 100);
        picked.sort();
        assert_eq!(picked, vec!["article-000", "article-001", "article-003"]);
    }

    #[test]
    fn deterministic_per_source() {
        let slugs = corpus(50);
        let a = sample_candidates(&slugs, "article-010", 10);
        let b = sample_candidates(&slugs, "article-010", 10);
        assert_eq!(a, b);
    }

    #[test]
    fn window_is_contiguous_with_wraparound() {
        let slugs = corpus(10);
        let picked = sample_candidates(&slugs, "not-in-corpus", 10);
        assert_eq!(picked.len(), 10);

        let first = slugs.iter().position(|s| *s == picked[0]).unwrap();
        for (i, slug) in picked.iter().enumerate() {
            assert_eq!(*slug, slugs[(first + i) % slugs.len()]);
        }
    }

    #[test]
    fn empty_inputs() {
        assert!(sample_candidates(&[], "x", 5).is_empty());
        assert!(sample_candidates(&corpus(3), "x", 0).is_empty());
    }
}
