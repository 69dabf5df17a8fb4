//! Markdown-to-HTML transformation passes.
//!
//! Each pass is a function `&str -> String` applied in a fixed order. The order
//! matters: headings are matched longest prefix first, bold runs before links so
//! link labels may carry emphasis, and list items are matched line by line before
//! contiguous runs are wrapped in a `<ul>`.

use std::sync::LazyLock;

use regex::Regex;

const H1_CLASS: &str = "text-3xl font-bold mt-8 mb-4";
const H2_CLASS: &str = "text-2xl font-bold mt-8 mb-4";
const H3_CLASS: &str = "text-xl font-semibold mt-6 mb-3";
const LINK_CLASS: &str = "text-blue-600 hover:text-blue-800 underline";
const LI_OPEN: &str = r#"<li class="ml-6 mb-2">"#;
const UL_OPEN: &str = r#"<ul class="list-disc my-4">"#;
const UL_CLOSE: &str = "</ul>";
const P_OPEN: &str = r#"<p class="mb-4 leading-relaxed">"#;

/// Run every inline/line pass and split the result into top-level blocks.
pub(crate) fn run_pipeline(md: &str) -> Vec<String> {
    let mut result = escape_text(md);

    result = convert_headings(&result);
    result = convert_bold(&result);
    result = convert_links(&result);
    result = convert_list_items(&result);
    result = wrap_list_runs(&result);

    split_blocks(&result)
}

// ---------------------------------------------------------------------------
// Pass 0: Escape raw text
// ---------------------------------------------------------------------------

/// Normalize line endings and escape the characters that would otherwise
/// break the markup produced by later passes.
fn escape_text(md: &str) -> String {
    md.replace("\r\n", "\n")
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a value placed inside a double-quoted attribute.
fn escape_attr(value: &str) -> String {
    value.replace('"', "&quot;")
}

// ---------------------------------------------------------------------------
// Pass 1: Headings
// ---------------------------------------------------------------------------

/// Convert `#`, `##` and `###` lines into headings.
///
/// Each heading is isolated by blank lines so the paragraph pass sees it as
/// its own block.
fn convert_headings(md: &str) -> String {
    static H3_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^### (.*?)[ \t]*$").expect("valid regex"));
    static H2_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^## (.*?)[ \t]*$").expect("valid regex"));
    static H1_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^# (.*?)[ \t]*$").expect("valid regex"));

    let result = H3_RE.replace_all(md, format!("\n\n<h3 class=\"{H3_CLASS}\">$1</h3>\n\n").as_str());
    let result =
        H2_RE.replace_all(&result, format!("\n\n<h2 class=\"{H2_CLASS}\">$1</h2>\n\n").as_str());
    let result =
        H1_RE.replace_all(&result, format!("\n\n<h1 class=\"{H1_CLASS}\">$1</h1>\n\n").as_str());

    result.into_owned()
}

// ---------------------------------------------------------------------------
// Pass 2: Bold
// ---------------------------------------------------------------------------

fn convert_bold(md: &str) -> String {
    static BOLD_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));

    BOLD_RE.replace_all(md, "<strong>$1</strong>").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 3: Links
// ---------------------------------------------------------------------------

/// Convert `[label](url)` and `[label](url "title")` into anchors.
///
/// Every link opens in a new tab and carries `noopener noreferrer nofollow`.
/// An optional quoted title becomes the `title` attribute. Image syntax `![alt](src)` is left untouched.
fn convert_links(md: &str) -> String {
    static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"\[([^\]]+)\]\(([^)\s]+)(?:\s+"([^"]*)")?\)"#).expect("valid regex")
    });

    LINK_RE
        .replace_all(md, |caps: &regex::Captures| {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            if start > 0 && md.as_bytes()[start - 1] == b'!' {
                return caps[0].to_string();
            }

            let label = &caps[1];
            let href = escape_attr(&caps[2]);
            let title = caps
                .get(3)
                .map(|t| format!(" title=\"{}\"", escape_attr(t.as_str())))
                .unwrap_or_default();

            format!(
                r#"<a href="{href}"{title} class="{LINK_CLASS}" target="_blank" rel="noopener noreferrer nofollow">{label}</a>"#
            )
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 4: List items and list wrapping
// ---------------------------------------------------------------------------

fn convert_list_items(md: &str) -> String {
    static ITEM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^[*-] (.*?)[ \t]*$").expect("valid regex"));

    ITEM_RE
        .replace_all(md, format!("{LI_OPEN}$1</li>").as_str())
        .into_owned()
}

/// Wrap each contiguous run of `<li>` lines in its own `<ul>`.
///
/// Runs separated by any other line (blank or not) become separate lists.
fn wrap_list_runs(md: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut in_list = false;

    for line in md.lines() {
        let is_item = line.starts_with(LI_OPEN);
        if is_item && !in_list {
            lines.push(format!("\n{UL_OPEN}"));
            in_list = true;
        } else if !is_item && in_list {
            lines.push(format!("{UL_CLOSE}\n"));
            in_list = false;
        }
        lines.push(line.to_string());
    }

    if in_list {
        lines.push(format!("{UL_CLOSE}\n"));
    }

    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Pass 5: Paragraphs
// ---------------------------------------------------------------------------

/// Split on blank lines and wrap every block that is not already a heading
/// or list in a paragraph.
fn split_blocks(md: &str) -> Vec<String> {
    static BLANK_LINE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("valid regex"));

    BLANK_LINE_RE
        .split(md)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            if is_block_element(block) {
                block.to_string()
            } else {
                format!("{P_OPEN}{block}</p>")
            }
        })
        .collect()
}

fn is_block_element(block: &str) -> bool {
    block.starts_with("<h") || block.starts_with("<ul") || block.starts_with("<li")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
