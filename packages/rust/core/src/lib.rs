//! Site assembly and workflows for the Healthy Solutions Report.
//!
//! This crate ties together the article store, contextual linking, and Markdown
//! rendering into complete pages, and drives end-to-end workflows (site build,
//! sitemap, corpus stats, newsletter signup).

mod html;

pub mod metadata;
pub mod newsletter;
pub mod page;
pub mod site;
pub mod sitemap;
pub mod stats;

pub use metadata::{NOT_FOUND_TITLE, PageMetadata, article_metadata};
pub use newsletter::{NewsletterClient, SubscribeOutcome, validate_email};
pub use page::{
    PageOptions, StaticPage, render_article_body, render_article_page, render_index_page,
    render_static_page,
};
pub use site::{
    ArticleContext, BuildSummary, ProgressReporter, SilentProgress, article_context, build_site,
};
pub use sitemap::{ChangeFrequency, Sitemap, SitemapEntry, build_sitemap};
pub use stats::{CorpusStats, corpus_stats};
