//! Safe HTML rendering for assistant chat replies.
//!
//! This crate renders the small markdown dialect used in chat replies
//! (headings, fenced code, blockquotes, flat lists, paragraphs, links, code
//! spans, emphasis and strikethrough) into an HTML fragment that can be
//! inserted into a page as-is. All input is treated as untrusted.
//!
//! # Architecture
//!
//! Rendering happens in two stages:
//! - [`segment`] splits the document into [`Block`]s with a single-pass line
//!   scanner.
//! - [`InlineFormatter`] turns each block's text into HTML. Links (validated by
//!   [`UrlSanitizer`]) and code spans are rendered first and parked in a
//!   [`TokenStash`], so the escaping and emphasis passes that follow never see
//!   generated markup.
//!
//! [`MarkdownRenderer`] ties the two together. Fence content bypasses inline
//! formatting and is only escaped.
//!
//! # Example
//!
//! ```
//! use chatmark_renderer::MarkdownRenderer;
//!
//! let html = MarkdownRenderer::new().render("**Bold** <b>text</b>");
//! assert_eq!(html, "<p><strong>Bold</strong> &lt;b&gt;text&lt;/b&gt;</p>");
//! ```

mod block;
mod html;
mod inline;
mod renderer;
mod sanitize;
mod stash;
mod util;

pub use block::{Block, segment};
pub use html::escape_html;
pub use inline::InlineFormatter;
pub use renderer::MarkdownRenderer;
pub use sanitize::{DEFAULT_BASE_ORIGIN, UrlRejection, UrlSanitizer};
pub use stash::TokenStash;
pub use util::normalize_line_endings;
