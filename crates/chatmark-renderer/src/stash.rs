//! Placeholder table protecting pre-built HTML from later passes.
//!
//! The inline formatter renders links and code spans up front, stashes the
//! finished HTML, and writes an opaque key in its place. Escaping and emphasis
//! then run over text that contains only keys, and [`TokenStash::resolve`]
//! swaps the fragments back in as the last step.

/// Opens a placeholder key (Unicode private use area).
pub(crate) const KEY_OPEN: char = '\u{E000}';
/// Closes a placeholder key.
pub(crate) const KEY_CLOSE: char = '\u{E001}';

/// Call-scoped table of placeholder keys and their HTML fragments.
///
/// Keys have the form `U+E000 <index> U+E001`. [`escape_html`](crate::escape_html)
/// writes both delimiters as character references, so a key can never appear in
/// escaped user text, and keys contain none of the emphasis delimiters.
///
/// # Example
///
/// ```
/// use chatmark_renderer::TokenStash;
///
/// let mut stash = TokenStash::new();
/// let key = stash.stash("<code>x</code>");
/// let text = format!("see {key}");
///
/// assert_eq!(stash.resolve(&text), "see <code>x</code>");
/// ```
#[derive(Debug, Default)]
pub struct TokenStash {
    fragments: Vec<String>,
}

impl TokenStash {
    /// Create an empty stash.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fragment and return its placeholder key.
    pub fn stash(&mut self, html: impl Into<String>) -> String {
        let key = format!("{KEY_OPEN}{}{KEY_CLOSE}", self.fragments.len());
        self.fragments.push(html.into());
        key
    }

    /// Replace every key in `text` with its fragment.
    ///
    /// Runs a single left-to-right pass; substituted fragments are copied as-is
    /// and never scanned for further keys. Text that looks like a key but does
    /// not name a stored fragment is left unchanged.
    ///
    /// Consumes the stash to prevent accidental reuse.
    #[must_use]
    pub fn resolve(self, text: &str) -> String {
        if self.fragments.is_empty() {
            return text.to_owned();
        }

        let capacity = text.len() + self.fragments.iter().map(String::len).sum::<usize>();
        let mut out = String::with_capacity(capacity);
        let mut rest = text;
        while let Some(open) = rest.find(KEY_OPEN) {
            out.push_str(&rest[..open]);
            let after_open = &rest[open + KEY_OPEN.len_utf8()..];
            match self.lookup(after_open) {
                Some((fragment, key_len)) => {
                    out.push_str(fragment);
                    rest = &after_open[key_len..];
                }
                None => {
                    out.push(KEY_OPEN);
                    rest = after_open;
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// Check whether any fragment has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Get the number of stored fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Parse `<index> U+E001` at the start of `s`; return the fragment and the
    /// byte length consumed.
    fn lookup(&self, s: &str) -> Option<(&str, usize)> {
        let close = s.find(KEY_CLOSE)?;
        let digits = &s[..close];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let index: usize = digits.parse().ok()?;
        let fragment = self.fragments.get(index)?;
        Some((fragment, close + KEY_CLOSE.len_utf8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stash() {
        let stash = TokenStash::new();
        assert!(stash.is_empty());
        assert_eq!(stash.resolve("unchanged"), "unchanged");
    }

    #[test]
    fn test_keys_are_unique() {
        let mut stash = TokenStash::new();
        let a = stash.stash("a");
        let b = stash.stash("b");
        assert_ne!(a, b);
        assert_eq!(stash.len(), 2);
    }

    #[test]
    fn test_keys_avoid_markdown_and_html_characters() {
        let mut stash = TokenStash::new();
        for _ in 0..12 {
            let key = stash.stash("x");
            assert!(!key.contains(['*', '_', '~', '`', '[', ']', '(', ')', '<', '>', '&', '"']));
        }
    }

    #[test]
    fn test_resolve_multiple_keys() {
        let mut stash = TokenStash::new();
        let a = stash.stash("<em>A</em>");
        let b = stash.stash("<code>B</code>");
        let text = format!("{b} and {a}");
        assert_eq!(stash.resolve(&text), "<code>B</code> and <em>A</em>");
    }

    #[test]
    fn test_resolve_does_not_rescan_fragments() {
        let mut stash = TokenStash::new();
        // A fragment that itself contains the text of another key.
        let inner_key = format!("{KEY_OPEN}1{KEY_CLOSE}");
        let a = stash.stash(format!("[{inner_key}]"));
        stash.stash("SHOULD NOT APPEAR");
        let out = stash.resolve(&a);
        assert_eq!(out, format!("[{inner_key}]"));
    }

    #[test]
    fn test_resolve_unknown_key_left_unchanged() {
        let mut stash = TokenStash::new();
        stash.stash("x");
        let text = format!("{KEY_OPEN}7{KEY_CLOSE} {KEY_OPEN}oops");
        assert_eq!(stash.resolve(&text), text);
    }

    #[test]
    fn test_resolve_adjacent_keys() {
        let mut stash = TokenStash::new();
        let a = stash.stash("1");
        let b = stash.stash("2");
        let text = format!("{a}{b}{a}");
        assert_eq!(stash.resolve(&text), "121");
    }
}
