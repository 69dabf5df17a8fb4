//! Small HTML/XML helpers shared by the page and sitemap writers.

use askama_escape::{Html, escape as escape_with};

/// Escape text for use in HTML/XML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    escape_with(text, Html).to_string()
}
