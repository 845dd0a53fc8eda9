//! Message formatting and HTML sanitization.
//!
//! Raw text is escaped before any markup is built, so user and reply content
//! can never inject HTML. After escaping:
//!
//! - paragraphs are split on blank lines and wrapped in `<p>`,
//! - single newlines inside a paragraph become `<br>`,
//! - contiguous lines starting with `-`, `*` or `•` become one `<ul>`.

use std::sync::LazyLock;

use regex::Regex;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*").expect("valid paragraph regex"));

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*•]\s+(.*)$").expect("valid bullet regex"));

/// A message in both its raw and formatted forms.
///
/// Views that cannot render HTML (a terminal) use `raw`; HTML views use
/// `html`, which is always safe to insert as markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub raw: String,
    pub html: String,
}

impl RenderedMessage {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let html = format_message(&raw);
        Self { raw, html }
    }
}

/// Escape `& < > " '` for safe inclusion in HTML text or attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Format raw message text into block-structured, escaped HTML.
///
/// Empty or whitespace-only input yields `<p></p>`.
pub fn format_message(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return "<p></p>".to_string();
    }

    let escaped = escape_html(trimmed);
    let mut html = String::new();
    for paragraph in PARAGRAPH_BREAK.split(&escaped) {
        if !paragraph.trim().is_empty() {
            render_paragraph(paragraph, &mut html);
        }
    }
    html
}

fn render_paragraph(paragraph: &str, html: &mut String) {
    let mut text_lines: Vec<&str> = Vec::new();
    let mut bullets: Vec<&str> = Vec::new();

    for line in paragraph.lines() {
        if let Some(item) = BULLET_LINE.captures(line).and_then(|c| c.get(1)) {
            flush_text(&mut text_lines, html);
            bullets.push(item.as_str().trim_end());
        } else {
            flush_bullets(&mut bullets, html);
            text_lines.push(line.trim_end());
        }
    }
    flush_text(&mut text_lines, html);
    flush_bullets(&mut bullets, html);
}

fn flush_text(lines: &mut Vec<&str>, html: &mut String) {
    if lines.is_empty() {
        return;
    }
    html.push_str("<p>");
    html.push_str(&lines.join("<br>"));
    html.push_str("</p>");
    lines.clear();
}

fn flush_bullets(items: &mut Vec<&str>, html: &mut String) {
    if items.is_empty() {
        return;
    }
    html.push_str("<ul>");
    for item in items.iter() {
        html.push_str("<li>");
        html.push_str(item);
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    items.clear();
}
