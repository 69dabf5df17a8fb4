//! Markdown-to-HTML rendering for article bodies.
//!
//! Articles are written in a restricted Markdown subset (headings, bold, links,
//! bullet lists, paragraphs). [`render`] turns a body into a trusted HTML fragment
//! and can interleave ad slots at proportional offsets. Rendering is pure: the
//! same input and options always yield byte-identical output.

mod ads;
mod passes;

use tracing::debug;

use healthreport_shared::DEFAULT_AD_CLIENT;

/// Length of the meta description derived from an article body.
pub const EXCERPT_CHARS: usize = 160;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Options for a single render call.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Interleave three ad slots into bodies with more than five blocks.
    pub include_ads: bool,
    /// Publisher id written into each ad slot.
    pub ad_client: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_ads: false,
            ad_client: DEFAULT_AD_CLIENT.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Render a Markdown body to an HTML fragment.
///
/// Passes run in a fixed order:
/// 1. `#`/`##`/`###` headings (longest prefix first)
/// 2. `**bold**`
/// 3. `[label](url)` links
/// 4. `*`/`-` list items, each contiguous run wrapped in a `<ul>`
/// 5. Blank-line separated blocks wrapped in `<p>` unless already a heading or list
/// 6. Optional ad slots at 25%, 50% and 75% of the block sequence
pub fn render(markdown: &str, opts: &RenderOptions) -> String {
    let mut blocks = passes::run_pipeline(markdown);
    let block_count = blocks.len();

    let ad_count = if opts.include_ads {
        ads::interleave(&mut blocks, &opts.ad_client)
    } else {
        0
    };

    debug!(blocks = block_count, ads = ad_count, "markdown rendered");

    blocks.join("\n")
}

/// Render with the default ad client.
pub fn render_markdown(markdown: &str, include_ads: bool) -> String {
    render(
        markdown,
        &RenderOptions {
            include_ads,
            ..RenderOptions::default()
        },
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// First `max_chars` characters of the body with `#` and `*` markers removed.
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    markdown
        .chars()
        .take(max_chars)
        .filter(|c| *c != '#' && *c != '*')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Count whitespace-delimited words in a body.
pub fn count_words(markdown: &str) -> usize {
    markdown.split_whitespace().count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
