//! Shared text helpers.

use std::borrow::Cow;

/// Normalize line terminators: every `\r\n` and lone `\r` becomes `\n`.
///
/// # Examples
///
/// ```
/// use chatmark_renderer::normalize_line_endings;
///
/// assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
/// ```
#[must_use]
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            chars.next_if_eq(&'\n');
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Whether a line contains only whitespace.
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
