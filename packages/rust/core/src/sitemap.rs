//! `sitemap.xml` generation.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use url::Url;

use healthreport_shared::{Document, HealthReportError, Result};

use crate::html::escape;

/// How often a crawler should expect a URL to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Daily,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
        }
    }
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Sitemap {
    pub entries: Vec<SitemapEntry>,
}

/// Static pages listed ahead of the articles.
const STATIC_PAGES: [(&str, ChangeFrequency, f32); 3] = [
    ("", ChangeFrequency::Daily, 1.0),
    ("/about", ChangeFrequency::Monthly, 0.5),
    ("/privacy", ChangeFrequency::Monthly, 0.5),
];

const ARTICLE_PRIORITY: f32 = 0.7;

/// Build the sitemap for `base_url` (an absolute http(s) origin).
///
/// Articles without a `generated_at` timestamp are stamped with `now`.
pub fn build_sitemap(base_url: &str, articles: &[Document], now: DateTime<Utc>) -> Result<Sitemap> {
    let parsed = Url::parse(base_url)
        .map_err(|e| HealthReportError::validation(format!("invalid base URL {base_url:?}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(HealthReportError::validation(format!(
            "base URL must be http(s): {base_url}"
        )));
    }
    let base = base_url.trim_end_matches('/');

    let mut entries: Vec<SitemapEntry> = STATIC_PAGES
        .iter()
        .map(|(path, change_frequency, priority)| SitemapEntry {
            url: format!("{base}{path}"),
            last_modified: now,
            change_frequency: *change_frequency,
            priority: *priority,
        })
        .collect();

    entries.extend(articles.iter().map(|doc| SitemapEntry {
        url: format!("{base}{}", doc.path()),
        last_modified: doc.generated_at.unwrap_or(now),
        change_frequency: ChangeFrequency::Monthly,
        priority: ARTICLE_PRIORITY,
    }));

    Ok(Sitemap { entries })
}

impl Sitemap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a sitemaps.org `urlset` document.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for entry in &self.entries {
            xml.push_str(&format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    \
                 <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
                escape(&entry.url),
                entry.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
                entry.change_frequency.as_str(),
                entry.priority,
            ));
        }
        xml.push_str("</urlset>\n");
        xml
    }
}
