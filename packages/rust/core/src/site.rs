//! Static site build.
//!
//! Loads the corpus once, renders every article against its deterministic
//! candidate sample, and writes the result to an output directory:
//!
//! ```text
//! <output>/
//! ├── index.html
//! ├── sitemap.xml
//! ├── build.json
//! ├── about/index.html
//! ├── privacy/index.html
//! └── article/
//!     └── <slug>/index.html
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use healthreport_shared::{AppConfig, Document, HealthReportError, Result};
use healthreport_storage::{ArticleStore, sample_candidates};

use crate::page::{
    PageOptions, StaticPage, render_article_page, render_index_page, render_static_page,
};
use crate::sitemap::build_sitemap;

const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each article page is written.
    fn page_written(&self, slug: &str, current: usize, total: usize);
    /// Called when the build completes.
    fn done(&self, summary: &BuildSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_written(&self, _slug: &str, _current: usize, _total: usize) {}
    fn done(&self, _summary: &BuildSummary) {}
}

/// Result of [`build_site`], also written to `build.json`.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub article_count: usize,
    pub skipped_count: usize,
    pub skipped: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    #[serde(skip)]
    pub output_dir: PathBuf,
    #[serde(skip)]
    pub elapsed: std::time::Duration,
}

// ---------------------------------------------------------------------------
// Single-article context
// ---------------------------------------------------------------------------

/// An article plus the candidates it is compared against when rendered.
#[derive(Debug, Clone)]
pub struct ArticleContext {
    pub document: Document,
    pub candidates: Vec<Document>,
}

/// Load `slug` and its candidate sample from `store`.
///
/// Candidates that fail to load are left out. An unknown slug is
/// [`HealthReportError::NotFound`].
pub fn article_context(
    store: &dyn ArticleStore,
    slug: &str,
    sample_size: usize,
) -> Result<ArticleContext> {
    let document = store
        .get_by_slug(slug)?
        .ok_or_else(|| HealthReportError::not_found(slug))?;

    let slugs = store.list_all_slugs()?;
    let mut candidates = Vec::new();
    for candidate in sample_candidates(&slugs, slug, sample_size) {
        match store.get_by_slug(&candidate) {
            Ok(Some(doc)) => candidates.push(candidate_stub(&doc)),
            Ok(None) => {}
            Err(e) => debug!(slug = %candidate, error = %e, "candidate skipped"),
        }
    }

    Ok(ArticleContext {
        document,
        candidates,
    })
}

/// Candidates only need identity and keyword data, never the body.
fn candidate_stub(doc: &Document) -> Document {
    Document {
        slug: doc.slug.clone(),
        keyword: doc.keyword.clone(),
        title: doc.title.clone(),
        content: String::new(),
        format: doc.format.clone(),
        word_count: doc.word_count,
        products_mentioned: Vec::new(),
        generated_at: doc.generated_at,
    }
}

// ---------------------------------------------------------------------------
// Full build
// ---------------------------------------------------------------------------

/// Render the whole site into `output_dir`.
#[instrument(skip_all, fields(output = %output_dir.display()))]
pub fn build_site(
    store: &dyn ArticleStore,
    config: &AppConfig,
    output_dir: &Path,
    progress: &dyn ProgressReporter,
) -> Result<BuildSummary> {
    let start = Instant::now();
    let opts = PageOptions::from(config);

    progress.phase("Loading articles");
    let corpus = store.load_all()?;
    info!(
        articles = corpus.len(),
        skipped = corpus.skipped.len(),
        "corpus loaded"
    );

    let slugs: Vec<String> = corpus.documents.iter().map(|d| d.slug.clone()).collect();
    let stubs: HashMap<&str, Document> = corpus
        .documents
        .iter()
        .map(|d| (d.slug.as_str(), candidate_stub(d)))
        .collect();

    progress.phase("Rendering articles");
    let article_root = output_dir.join("article");
    let total = corpus.documents.len();
    for (i, doc) in corpus.documents.iter().enumerate() {
        let candidates: Vec<Document> =
            sample_candidates(&slugs, &doc.slug, config.render.candidate_sample)
                .iter()
                .filter_map(|slug| stubs.get(slug.as_str()).cloned())
                .collect();

        let html = render_article_page(doc, &candidates, &opts);
        write_atomic(&article_root.join(&doc.slug).join("index.html"), &html)?;
        progress.page_written(&doc.slug, i + 1, total);
    }

    progress.phase("Writing index, site pages and sitemap");
    write_atomic(
        &output_dir.join("index.html"),
        &render_index_page(&corpus.documents, &opts),
    )?;
    for page in StaticPage::ALL {
        let dir = output_dir.join(page.path().trim_start_matches('/'));
        write_atomic(&dir.join("index.html"), &render_static_page(page, &opts))?;
    }

    let generated_at = Utc::now();
    let sitemap = build_sitemap(&config.site.base_url, &corpus.documents, generated_at)?;
    write_atomic(&output_dir.join("sitemap.xml"), &sitemap.to_xml())?;

    let summary = BuildSummary {
        article_count: total,
        skipped_count: corpus.skipped.len(),
        skipped: corpus.skipped.clone(),
        generated_at,
        tool_version: TOOL_VERSION.to_string(),
        output_dir: output_dir.to_path_buf(),
        elapsed: start.elapsed(),
    };
    let json = serde_json::to_string_pretty(&summary).map_err(|e| {
        HealthReportError::validation(format!("JSON serialization failed: {e}"))
    })?;
    write_atomic(&output_dir.join("build.json"), &json)?;

    info!(
        articles = summary.article_count,
        skipped = summary.skipped_count,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "site build complete"
    );
    progress.done(&summary);

    Ok(summary)
}

/// Write to a temp file beside `path`, then rename over it.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| HealthReportError::validation(format!("no parent for {}", path.display())))?;
    std::fs::create_dir_all(parent).map_err(|e| HealthReportError::io(parent, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = parent.join(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| HealthReportError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| HealthReportError::io(path, e))?;

    debug!(path = %path.display(), size = content.len(), "wrote file");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
