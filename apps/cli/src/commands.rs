//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use healthreport_core::{
    BuildSummary, NewsletterClient, PageOptions, ProgressReporter, SubscribeOutcome,
    article_context, build_site, build_sitemap, corpus_stats, render_article_body,
    render_article_page,
};
use healthreport_linking::{find_link_opportunities, select_related};
use healthreport_shared::{AppConfig, init_config, load_config, load_config_from};
use healthreport_storage::{ArticleStore, JsonDirStore};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Healthy Solutions Report: build the article site from JSON documents.
#[derive(Parser)]
#[command(
    name = "healthreport",
    version,
    about = "Render a pre-generated health article corpus into a static site.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.healthreport/healthreport.toml).
    #[arg(long, global = true, env = "HEALTHREPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Articles directory, overriding `[articles].dir`.
    #[arg(long, global = true)]
    pub articles_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Render every article, the index page and the sitemap into a directory.
    Build {
        /// Output directory.
        #[arg(short, long, default_value = "out")]
        out: PathBuf,
    },

    /// Print the rendered page for one article.
    Render {
        /// Article slug.
        slug: String,

        /// Leave ad slots out of the body.
        #[arg(long)]
        no_ads: bool,

        /// Print only the rendered body, not the full page.
        #[arg(long)]
        fragment: bool,
    },

    /// Show the related articles selected for one article.
    Related {
        /// Article slug.
        slug: String,

        /// Number of related articles (defaults to `[render].related_limit`).
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the contextual link opportunities found in one article.
    Links {
        /// Article slug.
        slug: String,
    },

    /// Print or write sitemap.xml.
    Sitemap {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print corpus statistics as JSON.
    Stats,

    /// Subscribe an email address to the newsletter.
    Subscribe {
        /// Email address.
        email: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "healthreport=info",
        1 => "healthreport=debug",
        _ => "healthreport=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output on stdout stays pipeable.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    if let Command::Config { action } = &cli.command {
        return match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&resolve_config(&cli)?),
        };
    }

    let config = resolve_config(&cli)?;
    let store = JsonDirStore::new(&config.articles.dir);

    match cli.command {
        Command::Build { out } => cmd_build(&store, &config, &out),
        Command::Render {
            slug,
            no_ads,
            fragment,
        } => cmd_render(&store, &config, &slug, no_ads, fragment),
        Command::Related { slug, limit } => cmd_related(&store, &config, &slug, limit),
        Command::Links { slug } => cmd_links(&store, &config, &slug),
        Command::Sitemap { out } => cmd_sitemap(&store, &config, out.as_deref()),
        Command::Stats => cmd_stats(&store),
        Command::Subscribe { email } => cmd_subscribe(&config, &email).await,
        Command::Config { .. } => Ok(()),
    }
}

/// Load the config file and apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(dir) = &cli.articles_dir {
        config.articles.dir = dir.to_string_lossy().into_owned();
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(store: &JsonDirStore, config: &AppConfig, out: &Path) -> Result<()> {
    info!(
        articles = %store.dir().display(),
        out = %out.display(),
        "building site"
    );

    let reporter = CliProgress::new();
    let summary = build_site(store, config, out, &reporter)?;

    println!();
    println!("  Site built successfully!");
    println!("  Articles: {}", summary.article_count);
    println!("  Skipped:  {}", summary.skipped_count);
    println!("  Path:     {}", summary.output_dir.display());
    println!("  Time:     {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_render(
    store: &JsonDirStore,
    config: &AppConfig,
    slug: &str,
    no_ads: bool,
    fragment: bool,
) -> Result<()> {
    let ctx = article_context(store, slug, config.render.candidate_sample)?;

    let mut opts = PageOptions::from(config);
    if no_ads {
        opts.render.include_ads = false;
    }

    let html = if fragment {
        render_article_body(&ctx.document, &ctx.candidates, &opts)
    } else {
        render_article_page(&ctx.document, &ctx.candidates, &opts)
    };
    println!("{html}");
    Ok(())
}

fn cmd_related(
    store: &JsonDirStore,
    config: &AppConfig,
    slug: &str,
    limit: Option<usize>,
) -> Result<()> {
    let ctx = article_context(store, slug, config.render.candidate_sample)?;
    let limit = limit.unwrap_or(config.render.related_limit);

    for doc in select_related(&ctx.document, &ctx.candidates, limit) {
        println!("{}\t{}\t{}", doc.slug, doc.keyword, doc.title);
    }
    Ok(())
}

fn cmd_links(store: &JsonDirStore, config: &AppConfig, slug: &str) -> Result<()> {
    let ctx = article_context(store, slug, config.render.candidate_sample)?;
    let opportunities = find_link_opportunities(
        &ctx.document.content,
        slug,
        &ctx.candidates,
        config.render.max_opportunities,
    );
    println!("{}", serde_json::to_string_pretty(&opportunities)?);
    Ok(())
}

fn cmd_sitemap(store: &JsonDirStore, config: &AppConfig, out: Option<&Path>) -> Result<()> {
    let corpus = store.load_all()?;
    let sitemap = build_sitemap(&config.site.base_url, &corpus.documents, Utc::now())?;
    let xml = sitemap.to_xml();

    match out {
        Some(path) => {
            std::fs::write(path, &xml)
                .map_err(|e| eyre!("failed to write {}: {e}", path.display()))?;
            info!(path = %path.display(), urls = sitemap.len(), "sitemap written");
        }
        None => print!("{xml}"),
    }
    Ok(())
}

fn cmd_stats(store: &JsonDirStore) -> Result<()> {
    let stats = corpus_stats(store, store.dir())?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

async fn cmd_subscribe(config: &AppConfig, email: &str) -> Result<()> {
    let client = NewsletterClient::from_config(&config.newsletter)?;
    match client.subscribe(email).await? {
        SubscribeOutcome::Subscribed => println!("Subscribed {}", email.trim()),
        SubscribeOutcome::AlreadySubscribed => println!("{} is already subscribed", email.trim()),
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_written(&self, slug: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Rendering [{current}/{total}] {slug}"));
    }

    fn done(&self, _summary: &BuildSummary) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_render_flags() {
        let cli = Cli::try_parse_from([
            "healthreport",
            "-vv",
            "--articles-dir",
            "data",
            "render",
            "gut-health",
            "--no-ads",
            "--fragment",
        ])
        .expect("parse");

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.articles_dir.as_deref(), Some(Path::new("data")));
        match cli.command {
            Command::Render {
                slug,
                no_ads,
                fragment,
            } => {
                assert_eq!(slug, "gut-health");
                assert!(no_ads);
                assert!(fragment);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn build_defaults_to_out_dir() {
        let cli = Cli::try_parse_from(["healthreport", "build"]).expect("parse");
        match cli.command {
            Command::Build { out } => assert_eq!(out, PathBuf::from("out")),
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn articles_dir_flag_overrides_config() {
        let tmp = std::env::temp_dir().join(format!(
            "hsr-cli-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&tmp, "[articles]\ndir = \"from-file\"\n").unwrap();

        let path = tmp.to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["healthreport", "--config", &path, "stats"]).unwrap();
        assert_eq!(resolve_config(&cli).unwrap().articles.dir, "from-file");

        let cli = Cli::try_parse_from([
            "healthreport",
            "--config",
            &path,
            "--articles-dir",
            "override",
            "stats",
        ])
        .unwrap();
        assert_eq!(resolve_config(&cli).unwrap().articles.dir, "override");

        let _ = std::fs::remove_file(&tmp);
    }
}
