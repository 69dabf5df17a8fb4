//! Directory of `<slug>.json` article files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use healthreport_shared::{Document, HealthReportError, Result};

use crate::ArticleStore;

const EXTENSION: &str = "json";

/// [`ArticleStore`] backed by a flat directory of JSON files.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the articles are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{slug}.{EXTENSION}"))
    }
}

impl ArticleStore for JsonDirStore {
    #[instrument(skip_all, fields(dir = %self.dir.display()))]
    fn list_all_slugs(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("articles directory missing, corpus is empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(HealthReportError::io(&self.dir, e)),
        };

        let mut slugs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| HealthReportError::io(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                slugs.push(stem.to_string());
            }
        }

        slugs.sort();
        debug!(count = slugs.len(), "listed article slugs");
        Ok(slugs)
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<Document>> {
        if !is_safe_slug(slug) {
            debug!(slug, "rejecting unsafe slug");
            return Ok(None);
        }

        let path = self.path_for(slug);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(HealthReportError::io(&path, e)),
        };

        let mut doc: Document = serde_json::from_str(&raw)
            .map_err(|e| HealthReportError::parse(format!("{}: {e}", path.display())))?;
        doc.slug = slug.to_string();
        Ok(Some(doc))
    }
}

/// Slugs map straight onto file names, so anything that could leave the
/// directory is refused.
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains(['/', '\\']) && !slug.contains("..")
}
