//! Full HTML page assembly.
//!
//! An article page is built from the document, the candidate set it is
//! compared against, and [`PageOptions`]. The body goes through contextual
//! linking first and Markdown rendering second; everything else taken from
//! the document is escaped before it is interpolated. The about and privacy
//! pages share the same layout.

use chrono::{Datelike, Utc};
use tracing::debug;

use healthreport_linking::{select_related, smart_internal_linking};
use healthreport_markdown::{RenderOptions, excerpt, render};
use healthreport_shared::{AppConfig, Document};

use crate::html::escape;
use crate::metadata::{PageMetadata, article_metadata};

/// Characters of body text shown on an index card.
const CARD_EXCERPT_CHARS: usize = 150;

const DISCLAIMER: &str = "The information provided in this article is for educational purposes \
only and is not intended as medical advice. Always consult with a qualified healthcare provider \
before making any changes to your health regimen.";

const AD_LOADER_URL: &str = "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js";

const TAGLINE: &str = "Your trusted source for health and wellness information";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Everything page assembly needs beyond the documents themselves.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Site display name.
    pub site_name: String,
    /// Markdown rendering options (ads on/off, ad client).
    pub render: RenderOptions,
    /// Related articles shown under the body.
    pub related_limit: usize,
    /// Contextual links injected into the body.
    pub max_links: usize,
    /// Ranked link opportunities considered before injection.
    pub max_opportunities: usize,
    /// Year printed in the footer.
    pub copyright_year: i32,
}

impl From<&AppConfig> for PageOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            site_name: config.site.name.clone(),
            render: RenderOptions {
                include_ads: config.render.include_ads,
                ad_client: config.site.ad_client.clone(),
            },
            related_limit: config.render.related_limit,
            max_links: config.render.max_links,
            max_opportunities: config.render.max_opportunities,
            copyright_year: Utc::now().year(),
        }
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Article page
// ---------------------------------------------------------------------------

/// Inject contextual links into the article body, then render it to HTML.
pub fn render_article_body(doc: &Document, candidates: &[Document], opts: &PageOptions) -> String {
    let linked = smart_internal_linking(
        &doc.content,
        doc,
        candidates,
        opts.max_opportunities,
        opts.max_links,
    );
    render(&linked, &opts.render)
}

/// Render a complete article page.
///
/// `candidates` feeds both the related-articles section and the contextual
/// links; it may contain the article itself, which is ignored.
pub fn render_article_page(doc: &Document, candidates: &[Document], opts: &PageOptions) -> String {
    let meta = article_metadata(Some(doc), &opts.site_name);
    let body = render_article_body(doc, candidates, opts);
    let related = select_related(doc, candidates, opts.related_limit);

    debug!(slug = %doc.slug, related = related.len(), "assembling article page");

    let title = escape(&doc.title);
    let format = escape(&doc.format);
    let keyword = escape(&doc.keyword);

    let mut main = String::new();
    main.push_str(&format!(
        r#"<nav class="flex items-center space-x-2 text-sm text-gray-600 mb-4" aria-label="Breadcrumb">
<a href="/" class="hover:text-blue-600">Home</a>
<span>/</span>
<span class="text-gray-400">{format}</span>
<span>/</span>
<span class="text-gray-900 font-medium" title="{title}">{title}</span>
</nav>
"#
    ));
    main.push_str(&format!(
        r#"<article class="bg-white rounded-lg shadow-md p-8">
<div class="prose prose-lg max-w-none">
{body}
</div>
<div class="mt-8 pt-8 border-t border-gray-200">
<p class="text-sm text-gray-600"><strong>Category:</strong> {format} | <strong>Keywords:</strong> {keyword}</p>
</div>
</article>
"#
    ));
    main.push_str(&related_section(&related));
    main.push_str(&format!(
        r#"<div class="mt-8 bg-blue-50 border border-blue-200 rounded-lg p-6">
<h3 class="text-lg font-semibold text-blue-900 mb-2">Medical Disclaimer</h3>
<p class="text-sm text-blue-800">{DISCLAIMER}</p>
</div>
"#
    ));

    layout(&meta, &back_home_header(opts), &main, opts)
}

/// Site banner with a link back to the home page.
fn back_home_header(opts: &PageOptions) -> String {
    format!(
        r#"<header class="bg-white shadow-sm">
<div class="max-w-4xl mx-auto px-4 py-6">
<a href="/" class="text-blue-600 hover:text-blue-800 text-sm font-medium">&larr; Back to Home</a>
<p class="text-4xl font-bold text-gray-900 mt-4">{}</p>
</div>
</header>
"#,
        escape(&opts.site_name)
    )
}

/// Related-articles cards, or nothing when there are none.
fn related_section(related: &[&Document]) -> String {
    if related.is_empty() {
        return String::new();
    }

    let mut section = String::from(
        r#"<section class="mt-12 bg-white rounded-lg shadow-md p-8">
<h2 class="text-2xl font-bold text-gray-900 mb-6">Related Articles You May Find Helpful</h2>
<div class="grid grid-cols-1 md:grid-cols-2 gap-4">
"#,
    );
    for doc in related {
        section.push_str(&format!(
            r#"<a href="{}" class="related-article block p-4 border border-gray-200 rounded-lg">
<h3 class="font-semibold text-gray-900 mb-2">{}</h3>
<p class="text-sm text-gray-600 mb-2">{}</p>
<span class="inline-block px-3 py-1 text-xs font-medium bg-blue-100 text-blue-800 rounded-full">{}</span>
</a>
"#,
            escape(&doc.path()),
            escape(&doc.title),
            escape(&doc.keyword),
            escape(&doc.format),
        ));
    }
    section.push_str("</div>\n</section>\n");
    section
}

// ---------------------------------------------------------------------------
// Index page
// ---------------------------------------------------------------------------

/// Render the home page listing every article, sorted by slug.
pub fn render_index_page(docs: &[Document], opts: &PageOptions) -> String {
    let mut sorted: Vec<&Document> = docs.iter().collect();
    sorted.sort_by(|a, b| a.slug.cmp(&b.slug));

    let site_name = escape(&opts.site_name);
    let header = format!(
        r#"<header class="bg-white shadow-sm">
<div class="max-w-7xl mx-auto px-4 py-8">
<h1 class="text-5xl font-bold text-gray-900 mb-2">{site_name}</h1>
<p class="text-xl text-gray-600">{TAGLINE}</p>
<div class="mt-4 flex items-center gap-4 text-sm text-gray-500">
<span class="article-count bg-blue-100 text-blue-800 px-3 py-1 rounded-full font-medium">{} Articles</span>
<span>Evidence-based health information</span>
</div>
</div>
</header>
"#,
        sorted.len()
    );

    let mut main = String::from(
        r#"<div class="mb-8">
<h2 class="text-3xl font-bold text-gray-900 mb-4">Latest Health Articles</h2>
<p class="text-gray-600">Browse our comprehensive collection of health and wellness articles</p>
</div>
"#,
    );

    if sorted.is_empty() {
        main.push_str(
            r#"<div class="text-center py-12">
<p class="text-gray-600 text-lg">No articles found. Please check back soon!</p>
</div>
"#,
        );
    } else {
        main.push_str(r#"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">"#);
        main.push('\n');
        for doc in &sorted {
            main.push_str(&index_card(doc));
        }
        main.push_str("</div>\n");
    }

    let meta = PageMetadata {
        title: opts.site_name.clone(),
        description: Some(TAGLINE.to_string()),
    };
    layout(&meta, &header, &main, opts)
}

fn index_card(doc: &Document) -> String {
    let heading = if doc.title.trim().is_empty() {
        &doc.keyword
    } else {
        &doc.title
    };

    format!(
        r#"<a href="{}" class="article-card bg-white rounded-lg shadow-md p-6 border border-gray-200">
<div class="mb-3"><span class="text-xs font-semibold text-blue-600 bg-blue-50 px-2 py-1 rounded">{}</span></div>
<h3 class="text-xl font-bold text-gray-900 mb-2">{}</h3>
<p class="text-gray-600 text-sm mb-4">{}...</p>
<div class="flex items-center justify-between text-xs text-gray-500">
<span>{} words</span>
<span class="text-blue-600 font-medium">Read more &rarr;</span>
</div>
</a>
"#,
        escape(&doc.path()),
        escape(&doc.format),
        escape(heading),
        escape(&excerpt(&doc.content, CARD_EXCERPT_CHARS)),
        doc.word_count,
    )
}

// ---------------------------------------------------------------------------
// About and privacy pages
// ---------------------------------------------------------------------------

/// Site pages that are not articles. Both are linked from every footer and
/// listed in the sitemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    About,
    Privacy,
}

impl StaticPage {
    pub const ALL: [StaticPage; 2] = [StaticPage::About, StaticPage::Privacy];

    /// Root-relative URL of the page.
    pub fn path(self) -> &'static str {
        match self {
            Self::About => "/about",
            Self::Privacy => "/privacy",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Self::About => "About Us",
            Self::Privacy => "Privacy Policy",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::About => {
                "Learn about our mission to provide evidence-based health and wellness information."
            }
            Self::Privacy => "How we collect, use and protect your information.",
        }
    }

    fn body(self, site_name: &str) -> String {
        match self {
            Self::About => about_body(site_name),
            Self::Privacy => privacy_body(site_name),
        }
    }
}

/// Render the about or privacy page.
pub fn render_static_page(page: StaticPage, opts: &PageOptions) -> String {
    let site_name = escape(&opts.site_name);
    let main = format!(
        r#"<article class="bg-white rounded-lg shadow-md p-8">
<h1 class="text-3xl font-bold text-gray-900 mb-6">{}</h1>
<div class="prose prose-lg max-w-none">
{}</div>
</article>
"#,
        page.heading(),
        page.body(&site_name)
    );

    let meta = PageMetadata {
        title: format!("{} | {}", page.heading(), opts.site_name),
        description: Some(page.description().to_string()),
    };
    layout(&meta, &back_home_header(opts), &main, opts)
}

fn prose_section(heading: &str, paragraphs: &[&str], items: &[&str]) -> String {
    let mut html = format!(
        "<h2 class=\"text-2xl font-semibold text-gray-900 mt-8 mb-4\">{heading}</h2>\n"
    );
    for p in paragraphs {
        html.push_str(&format!("<p class=\"text-gray-700 mb-4\">{p}</p>\n"));
    }
    if !items.is_empty() {
        html.push_str("<ul class=\"list-disc ml-6 mb-6 text-gray-700\">\n");
        for item in items {
            html.push_str(&format!("<li class=\"mb-2\">{item}</li>\n"));
        }
        html.push_str("</ul>\n");
    }
    html
}

fn about_body(site_name: &str) -> String {
    let mut html = format!(
        "<p class=\"text-lg text-gray-700 mb-6\">Welcome to {site_name}, your trusted source for \
evidence-based health and wellness information.</p>\n"
    );
    html.push_str(&prose_section(
        "Our Mission",
        &["We believe everyone deserves reliable, easy-to-understand health information. \
Our goal is to help readers make informed decisions with research-backed content on a wide range \
of health topics."],
        &[],
    ));
    html.push_str(&prose_section(
        "What We Offer",
        &["Our articles cover topics including:"],
        &[
            "Nutrition and diet",
            "Mental health and wellness",
            "Digestive health",
            "Brain health and cognitive function",
            "Weight management",
            "Immune system support",
            "Natural health solutions",
            "Preventive care",
        ],
    ));
    html.push_str(&prose_section(
        "Our Approach",
        &["Physical, mental and emotional well-being are connected, and our content is written to be:"],
        &[
            "<strong>Evidence-based:</strong> we prioritize information supported by research and expert consensus",
            "<strong>Accessible:</strong> complex topics in clear language",
            "<strong>Practical:</strong> advice you can act on day to day",
            "<strong>Comprehensive:</strong> topics covered from several angles",
        ],
    ));
    html.push_str(&prose_section("Important Disclaimer", &[DISCLAIMER], &[]));
    html.push_str(&prose_section(
        "Affiliate Disclosure",
        &[format!(
            "{site_name} participates in affiliate marketing programs. We may earn a commission \
when you buy through links on this site, at no additional cost to you. Affiliate relationships \
never influence our editorial content."
        )
        .as_str()],
        &[],
    ));
    html
}

fn privacy_body(site_name: &str) -> String {
    let mut html = format!(
        "<p class=\"text-gray-700 mb-6\">{site_name} (&quot;we&quot;, &quot;us&quot;) is committed to \
protecting your privacy. This policy explains how we collect, use and safeguard your information \
when you visit our website.</p>\n"
    );
    html.push_str(&prose_section(
        "Information We Collect",
        &["We collect information you provide when you subscribe to our newsletter or contact us, \
such as your email address. When you visit the site we may also collect:"],
        &[
            "IP address",
            "Browser type and version",
            "Operating system",
            "Pages visited and time spent on pages",
            "Referring website",
        ],
    ));
    html.push_str(&prose_section(
        "How We Use Your Information",
        &[],
        &[
            "Operate and maintain the website",
            "Send newsletters if you have opted in",
            "Analyze usage and improve our content",
            "Detect and prevent abuse",
        ],
    ));
    html.push_str(&prose_section(
        "Cookies and Third-Party Services",
        &[
            "We use cookies and similar technologies. You can control cookies through your browser \
settings.",
            "Our pages show advertising and contain affiliate links. Analytics and advertising \
partners may collect information about your visits. Newsletter addresses are stored by our email \
service provider.",
        ],
        &[],
    ));
    html.push_str(&prose_section(
        "Your Privacy Rights",
        &["Depending on where you live, you may request access to, correction of, or deletion of \
your personal information, and you can unsubscribe from our emails at any time."],
        &[],
    ));
    html.push_str(&prose_section(
        "Children's Privacy",
        &["This website is not intended for children under 13, and we do not knowingly collect \
their personal information."],
        &[],
    ));
    html
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

fn layout(meta: &PageMetadata, header: &str, main: &str, opts: &PageOptions) -> String {
    let description = meta
        .description
        .as_deref()
        .map(|d| format!("<meta name=\"description\" content=\"{}\">\n", escape(d)))
        .unwrap_or_default();
    let site_name = escape(&opts.site_name);
    let ad_loader = if opts.render.include_ads {
        format!(
            "<script async src=\"{AD_LOADER_URL}?client={}\" crossorigin=\"anonymous\"></script>\n",
            escape(&opts.render.ad_client)
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{description}{ad_loader}</head>
<body class="min-h-screen bg-gray-50">
{header}<main class="max-w-4xl mx-auto px-4 py-8">
{main}</main>
<footer class="bg-gray-800 text-white mt-16">
<div class="max-w-4xl mx-auto px-4 py-8 text-center">
<p class="text-sm">&copy; {year} {site_name}. All rights reserved.</p>
<div class="mt-4 space-x-4">
<a href="/about" class="text-sm">About</a>
<a href="/privacy" class="text-sm">Privacy Policy</a>
</div>
</div>
</footer>
</body>
</html>
"#,
        title = escape(&meta.title),
        year = opts.copyright_year,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::*;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    fn doc(slug: &str, keyword: &str, content: &str) -> Document {
        Document {
            slug: slug.into(),
            keyword: keyword.into(),
            title: format!("{keyword} guide"),
            content: content.into(),
            format: "how-to guide".into(),
            word_count: 120,
            products_mentioned: vec![],
            generated_at: None,
        }
    }

    fn opts() -> PageOptions {
        PageOptions {
            render: RenderOptions {
                include_ads: false,
                ..RenderOptions::default()
            },
            copyright_year: 2025,
            ..PageOptions::default()
        }
    }

    #[test]
    fn article_page_has_title_breadcrumbs_and_disclaimer() {
        let article = doc("gut-health", "gut health", "# Gut Health\n\nEat fiber daily.");
        let html = render_article_page(&article, &[], &opts());
        let page = Html::parse_document(&html);

        let title = page.select(&sel("title")).next().expect("title");
        assert_eq!(
            title.text().collect::<String>(),
            "gut health guide | The Healthy Solutions Report"
        );

        let crumbs: Vec<String> = page
            .select(&sel("nav[aria-label=Breadcrumb] a, nav[aria-label=Breadcrumb] span"))
            .map(|el| el.text().collect::<String>())
            .filter(|t| t != "/")
            .collect();
        assert_eq!(crumbs, vec!["Home", "how-to guide", "gut health guide"]);

        assert!(html.contains("Medical Disclaimer"));
        assert!(page.select(&sel("article h1")).next().is_some());
        // No related section when there are no candidates.
        assert_eq!(page.select(&sel("a.related-article")).count(), 0);
    }

    #[test]
    fn article_page_links_and_lists_related() {
        let article = doc(
            "gut-health",
            "gut health",
            "Good gut health starts with probiotics.\n\nAlso consider fiber.",
        );
        let candidates = vec![
            doc("probiotics", "probiotics", ""),
            doc("health-food", "health food", ""),
            doc("yoga", "morning yoga", ""),
        ];

        let html = render_article_page(&article, &candidates, &opts());
        let page = Html::parse_document(&html);

        let body_links: Vec<_> = page
            .select(&sel("article .prose a"))
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(body_links, vec!["/article/probiotics"]);

        let related: Vec<_> = page
            .select(&sel("a.related-article"))
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(
            related,
            vec!["/article/health-food", "/article/probiotics", "/article/yoga"]
        );
    }

    #[test]
    fn document_fields_are_escaped() {
        let mut article = doc("x", "<b>keyword</b>", "Body.");
        article.title = r#"Fish & "Chips" <script>"#.into();
        article.format = "<i>fmt</i>".into();

        let html = render_article_page(&article, &[], &opts());
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>keyword</b>"));
        assert!(!html.contains("<i>fmt</i>"));
        assert!(html.contains("Fish &amp; &quot;Chips&quot; &lt;script&gt;"));
    }

    #[test]
    fn index_lists_articles_sorted_with_count() {
        let docs = vec![
            doc("zinc", "zinc", "Zinc **matters**."),
            doc("ashwagandha", "ashwagandha", "# Adaptogen\n\nCalm."),
            doc("magnesium", "magnesium", "Sleep aid."),
        ];

        let html = render_index_page(&docs, &opts());
        let page = Html::parse_document(&html);

        let hrefs: Vec<_> = page
            .select(&sel("a.article-card"))
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(
            hrefs,
            vec!["/article/ashwagandha", "/article/magnesium", "/article/zinc"]
        );

        let count = page.select(&sel(".article-count")).next().expect("count");
        assert_eq!(count.text().collect::<String>(), "3 Articles");
        assert!(!html.contains("**matters**"));
    }

    #[test]
    fn ads_load_the_ad_script_in_head() {
        let options = PageOptions {
            render: RenderOptions {
                include_ads: true,
                ad_client: "ca-pub-777".into(),
            },
            ..opts()
        };
        let body = (0..12)
            .map(|i| format!("Paragraph {i}."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let article = doc("long-read", "long read", &body);

        let html = render_article_page(&article, &[], &options);
        let page = Html::parse_document(&html);

        let loaders: Vec<_> = page
            .select(&sel("head script[async]"))
            .filter_map(|s| s.value().attr("src"))
            .collect();
        assert_eq!(
            loaders,
            vec!["https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js?client=ca-pub-777"]
        );

        assert_eq!(page.select(&sel(".ad-slot")).count(), 3);
        let queued = page
            .select(&sel(".ad-slot script"))
            .filter(|s| s.text().collect::<String>().contains(".push({})"))
            .count();
        assert_eq!(queued, 3);
    }

    #[test]
    fn no_ad_script_without_ads() {
        let html = render_article_page(&doc("a", "a", "Body."), &[], &opts());
        assert!(!html.contains("adsbygoogle"));
    }

    #[test]
    fn static_pages_share_the_layout() {
        let about = Html::parse_document(&render_static_page(StaticPage::About, &opts()));
        let title = about.select(&sel("title")).next().expect("title");
        assert_eq!(
            title.text().collect::<String>(),
            "About Us | The Healthy Solutions Report"
        );
        assert_eq!(
            about.select(&sel("article h1")).next().map(|h| h.text().collect::<String>()),
            Some("About Us".to_string())
        );
        assert!(about.select(&sel("article li")).count() >= 8);

        let privacy = Html::parse_document(&render_static_page(StaticPage::Privacy, &opts()));
        let footer_links: Vec<_> = privacy
            .select(&sel("footer a"))
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(footer_links, vec!["/about", "/privacy"]);
        assert!(privacy.select(&sel("article h2")).count() >= 4);
    }

    #[test]
    fn empty_index_shows_placeholder() {
        let html = render_index_page(&[], &opts());
        assert!(html.contains("No articles found"));
        assert!(html.contains("0 Articles"));
    }
}
