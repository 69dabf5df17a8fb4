//! Application configuration.
//!
//! User config lives at `~/.healthreport/healthreport.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HealthReportError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "healthreport.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".healthreport";

/// Ad network publisher id used when none is configured.
pub const DEFAULT_AD_CLIENT: &str = "ca-pub-3425980701787946";

// ---------------------------------------------------------------------------
// Config structs (matching healthreport.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site identity.
    #[serde(default)]
    pub site: SiteConfig,

    /// Article store location.
    #[serde(default)]
    pub articles: ArticlesConfig,

    /// Rendering and linking knobs.
    #[serde(default)]
    pub render: RenderConfig,

    /// Mailing-list provider settings.
    #[serde(default)]
    pub newsletter: NewsletterConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Display name used in page titles and headers.
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Canonical origin, used for sitemap URLs.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Ad network publisher id written into ad slots.
    #[serde(default = "default_ad_client")]
    pub ad_client: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            base_url: default_base_url(),
            ad_client: default_ad_client(),
        }
    }
}

fn default_site_name() -> String {
    "The Healthy Solutions Report".into()
}
fn default_base_url() -> String {
    "https://thehealthysolutionsreport.com".into()
}
fn default_ad_client() -> String {
    DEFAULT_AD_CLIENT.into()
}

/// `[articles]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticlesConfig {
    /// Directory holding one `<slug>.json` per article.
    #[serde(default = "default_articles_dir")]
    pub dir: String,
}

impl Default for ArticlesConfig {
    fn default() -> Self {
        Self {
            dir: default_articles_dir(),
        }
    }
}

fn default_articles_dir() -> String {
    "public/data/articles".into()
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Interleave ad slots into article bodies.
    #[serde(default = "default_true")]
    pub include_ads: bool,

    /// Number of related articles shown under each article.
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,

    /// Maximum contextual links injected into one article.
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// How many corpus articles are sampled as candidates per page.
    #[serde(default = "default_candidate_sample")]
    pub candidate_sample: usize,

    /// How many ranked link opportunities are kept before injection.
    #[serde(default = "default_max_opportunities")]
    pub max_opportunities: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            include_ads: true,
            related_limit: default_related_limit(),
            max_links: default_max_links(),
            candidate_sample: default_candidate_sample(),
            max_opportunities: default_max_opportunities(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_related_limit() -> usize {
    6
}
fn default_max_links() -> usize {
    5
}
fn default_candidate_sample() -> usize {
    100
}
fn default_max_opportunities() -> usize {
    10
}

/// `[newsletter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Subscriber endpoint of the mailing-list API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Value recorded in the subscriber's `source` field.
    #[serde(default = "default_source")]
    pub source: String,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            endpoint: default_endpoint(),
            source: default_source(),
        }
    }
}

fn default_api_key_env() -> String {
    "MAILERLITE_API_KEY".into()
}
fn default_endpoint() -> String {
    "https://connect.mailerlite.com/api/subscribers".into()
}
fn default_source() -> String {
    "website_popup".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.healthreport/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| HealthReportError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.healthreport/healthreport.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| HealthReportError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        HealthReportError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| HealthReportError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| HealthReportError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| HealthReportError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the mailing-list API key from the env var named in the config.
pub fn newsletter_api_key(config: &NewsletterConfig) -> Result<String> {
    let var_name = &config.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(HealthReportError::config(format!(
            "mailing-list API key not found. Set the {var_name} environment variable."
        ))),
    }
}
