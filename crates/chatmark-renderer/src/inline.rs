//! Inline formatting of a single text span.
//!
//! The span runs through a fixed pipeline:
//!
//! 1. links are split out into [`Segment::Link`] (only if the target is accepted)
//! 2. code spans are split out of the remaining text into [`Segment::Code`]
//! 3. segments are flattened: text is escaped, links and code are rendered,
//!    stashed, and replaced by placeholder keys
//! 4. emphasis rules run over the escaped string
//! 5. placeholder keys are swapped back for their HTML
//!
//! Steps 1 and 2 only ever produce segments; escaping happens once, in step 3.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use crate::html::{anchor, code_span, escape_html};
use crate::sanitize::UrlSanitizer;
use crate::stash::TokenStash;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());
static STRONG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
// The `regex` crate has no lookahead; the "not followed by" half of the
// italic rule is checked in `replace_italic`.
static EM_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^*])\*([^*\n]+)\*").unwrap());
static EM_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^_])_([^_\n]+)_").unwrap());
static DEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~([^~]+)~~").unwrap());

/// A piece of an inline span after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    /// Raw user text, escaped during flattening.
    Text(&'a str),
    /// Link whose target passed sanitization.
    Link { label: &'a str, href: Url },
    /// Interior of a backtick code span.
    Code(&'a str),
}

/// Converts a text span into HTML with links, code spans and emphasis.
///
/// # Example
///
/// ```
/// use chatmark_renderer::InlineFormatter;
///
/// let formatter = InlineFormatter::default();
/// assert_eq!(
///     formatter.format("**a** <b> `c`"),
///     "<strong>a</strong> &lt;b&gt; <code>c</code>"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct InlineFormatter {
    sanitizer: UrlSanitizer,
}

impl InlineFormatter {
    /// Create a formatter validating link targets with `sanitizer`.
    #[must_use]
    pub fn new(sanitizer: UrlSanitizer) -> Self {
        Self { sanitizer }
    }

    /// URL sanitizer used for link targets.
    #[must_use]
    pub fn sanitizer(&self) -> &UrlSanitizer {
        &self.sanitizer
    }

    /// Format one logical span (newline-joined if it covers several lines).
    ///
    /// Newlines are preserved; block templates decide how to render them.
    #[must_use]
    pub fn format(&self, text: &str) -> String {
        let segments = extract_code_spans(self.extract_links(text));

        let mut stash = TokenStash::new();
        let escaped = flatten(&segments, &mut stash);
        let formatted = apply_emphasis(&escaped);
        if stash.is_empty() {
            return formatted;
        }
        stash.resolve(&formatted)
    }

    fn extract_links<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in LINK_RE.captures_iter(text) {
            let whole = caps.get(0).unwrap();
            let label = caps.get(1).unwrap().as_str();
            let target = caps.get(2).unwrap().as_str();

            match self.sanitizer.sanitize(target) {
                Ok(href) => {
                    if whole.start() > last {
                        segments.push(Segment::Text(&text[last..whole.start()]));
                    }
                    segments.push(Segment::Link { label, href });
                    last = whole.end();
                }
                Err(reason) => {
                    tracing::debug!(url = target, reason = %reason, "Link target rejected");
                }
            }
        }

        if last < text.len() {
            segments.push(Segment::Text(&text[last..]));
        }
        segments
    }
}

/// Split code spans out of text segments. Other segments pass through.
fn extract_code_spans(segments: Vec<Segment<'_>>) -> Vec<Segment<'_>> {
    let mut out = Vec::with_capacity(segments.len());

    for segment in segments {
        let Segment::Text(text) = segment else {
            out.push(segment);
            continue;
        };

        let mut last = 0;
        for caps in CODE_RE.captures_iter(text) {
            let whole = caps.get(0).unwrap();
            if whole.start() > last {
                out.push(Segment::Text(&text[last..whole.start()]));
            }
            out.push(Segment::Code(caps.get(1).unwrap().as_str()));
            last = whole.end();
        }
        if last < text.len() {
            out.push(Segment::Text(&text[last..]));
        }
    }

    out
}

/// Escape text segments and replace rendered fragments with stash keys.
fn flatten(segments: &[Segment<'_>], stash: &mut TokenStash) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(&escape_html(text)),
            Segment::Link { label, href } => {
                out.push_str(&stash.stash(anchor(href.as_str(), label)));
            }
            Segment::Code(code) => out.push_str(&stash.stash(code_span(code))),
        }
    }
    out
}

/// Strong, italic (asterisk then underscore), then strikethrough.
fn apply_emphasis(escaped: &str) -> String {
    let text = STRONG_RE.replace_all(escaped, "<strong>${1}</strong>");
    let text = replace_italic(&text, &EM_STAR_RE, '*');
    let text = replace_italic(&text, &EM_UNDERSCORE_RE, '_');
    DEL_RE.replace_all(&text, "<del>${1}</del>").into_owned()
}

/// Apply an italic `pattern` whose match must not be followed by `delimiter`.
///
/// `pattern` captures the character before the opening delimiter (or nothing
/// at the start) in group 1 and the emphasized text in group 2.
fn replace_italic(text: &str, pattern: &Regex, delimiter: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(caps) = pattern.captures_at(text, pos) {
        let whole = caps.get(0).unwrap();
        if text[whole.end()..].starts_with(delimiter) {
            pos = whole.start() + next_char_len(&text[whole.start()..]);
            continue;
        }
        out.push_str(&text[copied..whole.start()]);
        push_italic(&caps, &mut out);
        copied = whole.end();
        pos = whole.end();
    }

    out.push_str(&text[copied..]);
    out
}

fn push_italic(caps: &Captures<'_>, out: &mut String) {
    out.push_str(&caps[1]);
    out.push_str("<em>");
    out.push_str(&caps[2]);
    out.push_str("</em>");
}

fn next_char_len(s: &str) -> usize {
    s.chars().next().map_or(1, char::len_utf8)
}
