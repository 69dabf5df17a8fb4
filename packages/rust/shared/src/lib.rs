//! Shared types, error model, and configuration for the Healthy Solutions Report.
//!
//! This crate is the foundation depended on by all other crates in the workspace.
//! It provides:
//! - [`HealthReportError`]: the unified error type
//! - Domain types ([`Document`], [`LinkOpportunity`])
//! - Configuration ([`AppConfig`] and its sections, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ArticlesConfig, DEFAULT_AD_CLIENT, NewsletterConfig, RenderConfig, SiteConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, newsletter_api_key,
};
pub use error::{HealthReportError, Result};
pub use types::{ARTICLE_PATH_PREFIX, Document, LinkOpportunity, article_path};
