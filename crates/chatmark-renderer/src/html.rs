//! HTML templates for rendered output.
//!
//! Every tag the renderer emits is written by a function in this module.
//! Callers pass raw user text; escaping happens here, so no template can place
//! unescaped input into the output.

use std::fmt::Write;

use crate::stash::{KEY_CLOSE, KEY_OPEN};

/// Escape text for use in HTML element content and quoted attribute values.
///
/// The stash key delimiters are written as character references, which keeps
/// placeholder keys out of escaped text while rendering the same glyphs.
///
/// # Examples
///
/// ```
/// use chatmark_renderer::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            KEY_OPEN => result.push_str("&#xE000;"),
            KEY_CLOSE => result.push_str("&#xE001;"),
            _ => result.push(c),
        }
    }
    result
}

/// Fenced code block. Content is escaped verbatim, never inline-formatted.
pub(crate) fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
    if let Some(lang) = lang {
        write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(content)
        )
        .unwrap();
    } else {
        write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
    }
}

/// Inline code span.
pub(crate) fn code_span(code: &str) -> String {
    format!("<code>{}</code>", escape_html(code))
}

/// Anchor opening in a new browsing context without referrer or opener.
///
/// `href` must already have passed URL sanitization.
pub(crate) fn anchor(href: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape_html(href),
        escape_html(label)
    )
}

// The block templates below take inline HTML that is already safe.

pub(crate) fn heading(level: u8, inner: &str, out: &mut String) {
    write!(out, "<h{level}>{inner}</h{level}>").unwrap();
}

pub(crate) fn blockquote(inner: &str, out: &mut String) {
    out.push_str("<blockquote>");
    push_with_breaks(inner, out);
    out.push_str("</blockquote>");
}

pub(crate) fn paragraph(inner: &str, out: &mut String) {
    out.push_str("<p>");
    push_with_breaks(inner, out);
    out.push_str("</p>");
}

pub(crate) fn list<I>(ordered: bool, items: I, out: &mut String)
where
    I: IntoIterator<Item = String>,
{
    let tag = if ordered { "ol" } else { "ul" };
    write!(out, "<{tag}>").unwrap();
    for item in items {
        write!(out, "<li>{item}</li>").unwrap();
    }
    write!(out, "</{tag}>").unwrap();
}

/// Append `inner`, turning each newline into `<br>`.
fn push_with_breaks(inner: &str, out: &mut String) {
    for (i, line) in inner.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        out.push_str(line);
    }
}
