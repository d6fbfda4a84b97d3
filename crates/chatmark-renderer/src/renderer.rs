//! Markdown renderer: blocks in, safe HTML out.

use url::Url;

use crate::block::{Block, segment};
use crate::html;
use crate::inline::InlineFormatter;
use crate::sanitize::{UrlRejection, UrlSanitizer};
use crate::util::{is_blank, normalize_line_endings};

/// Renders the chat markdown subset to an HTML fragment.
///
/// The renderer holds only read-only configuration, so one instance can be
/// shared across threads and used for any number of documents.
///
/// # Example
///
/// ```
/// use chatmark_renderer::MarkdownRenderer;
/// use url::Url;
///
/// let renderer = MarkdownRenderer::new()
///     .with_base_origin(Url::parse("https://chat.example.com").unwrap())
///     .unwrap();
///
/// assert_eq!(renderer.render("# Hello"), "<h1>Hello</h1>");
/// assert_eq!(
///     renderer.render("[docs](/docs)"),
///     r#"<p><a href="https://chat.example.com/docs" target="_blank" rel="noopener noreferrer">docs</a></p>"#
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct MarkdownRenderer {
    inline: InlineFormatter,
}

impl MarkdownRenderer {
    /// Create a renderer resolving relative links against
    /// [`DEFAULT_BASE_ORIGIN`](crate::DEFAULT_BASE_ORIGIN).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the origin relative link targets are resolved against.
    ///
    /// Only the origin of `origin` is used; a path, query or fragment is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `UrlRejection::Scheme` if `origin` is not an `http` or `https`
    /// URL.
    pub fn with_base_origin(mut self, origin: Url) -> Result<Self, UrlRejection> {
        self.inline = InlineFormatter::new(UrlSanitizer::new(origin)?);
        Ok(self)
    }

    /// Inline formatter used for block text.
    #[must_use]
    pub fn inline(&self) -> &InlineFormatter {
        &self.inline
    }

    /// Render markdown to HTML.
    ///
    /// Never fails: malformed constructs come out as escaped literal text, and
    /// empty or whitespace-only input yields an empty string.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let document = normalize_line_endings(markdown);
        if is_blank(&document) {
            return String::new();
        }

        let mut out = String::with_capacity(document.len() + document.len() / 2);
        for block in segment(&document) {
            self.render_block(&block, &mut out);
        }
        out
    }

    fn render_block(&self, block: &Block, out: &mut String) {
        match block {
            Block::Heading { level, text } => {
                html::heading(*level, &self.inline.format(text), out);
            }
            Block::Fence { language, lines } => {
                html::code_block(language.as_deref(), &lines.join("\n"), out);
            }
            Block::Blockquote { text } => html::blockquote(&self.inline.format(text), out),
            Block::List { ordered, items } => {
                html::list(*ordered, items.iter().map(|item| self.inline.format(item)), out);
            }
            Block::Paragraph { text } => html::paragraph(&self.inline.format(text), out),
        }
    }
}
