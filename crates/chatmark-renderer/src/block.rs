//! Block segmentation.
//!
//! A single pass over the document's lines. Each line is classified once with
//! a fixed priority (fence > heading > blockquote > list item > paragraph
//! text). An open block keeps consuming lines for as long as they match its
//! own continuation rule; any other line closes it and is classified afresh.

use std::sync::LazyLock;

use regex::Regex;

use crate::util::is_blank;

static FENCE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```([A-Za-z0-9_-]+)?\s*$").unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s?").unwrap());
static ORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.\s+").unwrap());
static UNORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+]\s+").unwrap());

/// Any line starting with this closes an open fence.
const FENCE_MARKER: &str = "```";

/// A structural unit of the document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Block {
    /// ATX heading, level 1 to 6.
    Heading { level: u8, text: String },
    /// Fenced code block. Lines are kept verbatim.
    Fence {
        language: Option<String>,
        lines: Vec<String>,
    },
    /// Consecutive `>` lines with markers stripped, joined by newlines.
    Blockquote { text: String },
    /// Consecutive list items of one kind with markers stripped.
    List { ordered: bool, items: Vec<String> },
    /// Consecutive plain lines joined by newlines.
    Paragraph { text: String },
}

/// Classification of a single line.
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    FenceOpen(Option<&'a str>),
    Heading { level: u8, text: &'a str },
    Quote(&'a str),
    ListItem { ordered: bool, text: &'a str },
    Text(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    if is_blank(line) {
        return LineKind::Blank;
    }
    if let Some(caps) = FENCE_OPEN_RE.captures(line) {
        return LineKind::FenceOpen(caps.get(1).map(|m| m.as_str()));
    }
    if let Some(caps) = HEADING_RE.captures(line) {
        #[allow(clippy::cast_possible_truncation)] // at most six hashes
        let level = caps[1].len() as u8;
        return LineKind::Heading {
            level,
            text: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if let Some(marker) = QUOTE_RE.find(line) {
        return LineKind::Quote(&line[marker.end()..]);
    }
    if let Some(marker) = ORDERED_RE.find(line) {
        return LineKind::ListItem {
            ordered: true,
            text: &line[marker.end()..],
        };
    }
    if let Some(marker) = UNORDERED_RE.find(line) {
        return LineKind::ListItem {
            ordered: false,
            text: &line[marker.end()..],
        };
    }
    LineKind::Text(line)
}

/// Scanner state. Every variant except `Scanning` is an open block.
enum State<'a> {
    Scanning,
    Fence {
        language: Option<&'a str>,
        lines: Vec<&'a str>,
        opened_at: usize,
    },
    Blockquote {
        lines: Vec<&'a str>,
    },
    List {
        ordered: bool,
        items: Vec<&'a str>,
    },
    Paragraph {
        lines: Vec<&'a str>,
    },
}

struct Segmenter<'a> {
    state: State<'a>,
    blocks: Vec<Block>,
    line_number: usize,
}

impl<'a> Segmenter<'a> {
    fn new() -> Self {
        Self {
            state: State::Scanning,
            blocks: Vec::new(),
            line_number: 0,
        }
    }

    fn feed(&mut self, line: &'a str) {
        self.line_number += 1;

        // Inside a fence nothing is classified.
        if let State::Fence { lines, .. } = &mut self.state {
            if line.starts_with(FENCE_MARKER) {
                self.close();
            } else {
                lines.push(line);
            }
            return;
        }

        let kind = classify(line);
        let continued = match (&mut self.state, &kind) {
            (State::Blockquote { lines }, LineKind::Quote(text))
            | (State::Paragraph { lines }, LineKind::Text(text)) => {
                lines.push(*text);
                true
            }
            (
                State::List { ordered, items },
                LineKind::ListItem {
                    ordered: item_ordered,
                    text,
                },
            ) if *ordered == *item_ordered => {
                items.push(*text);
                true
            }
            _ => false,
        };

        if !continued {
            self.close();
            self.open(kind);
        }
    }

    fn open(&mut self, kind: LineKind<'a>) {
        self.state = match kind {
            LineKind::Blank => State::Scanning,
            LineKind::FenceOpen(language) => State::Fence {
                language,
                lines: Vec::new(),
                opened_at: self.line_number,
            },
            LineKind::Heading { level, text } => {
                self.blocks.push(Block::Heading {
                    level,
                    text: text.to_owned(),
                });
                State::Scanning
            }
            LineKind::Quote(text) => State::Blockquote { lines: vec![text] },
            LineKind::ListItem { ordered, text } => State::List {
                ordered,
                items: vec![text],
            },
            LineKind::Text(text) => State::Paragraph { lines: vec![text] },
        };
    }

    /// Emit the open block, if any, and return to scanning.
    fn close(&mut self) {
        let block = match std::mem::replace(&mut self.state, State::Scanning) {
            State::Scanning => return,
            State::Fence {
                language, lines, ..
            } => Block::Fence {
                language: language.map(str::to_owned),
                lines: to_owned_lines(&lines),
            },
            State::Blockquote { lines } => Block::Blockquote {
                text: lines.join("\n"),
            },
            State::List { ordered, items } => Block::List {
                ordered,
                items: to_owned_lines(&items),
            },
            State::Paragraph { lines } => Block::Paragraph {
                text: lines.join("\n"),
            },
        };
        self.blocks.push(block);
    }

    fn finish(mut self) -> Vec<Block> {
        if let State::Fence { opened_at, .. } = self.state {
            tracing::debug!(line = opened_at, "Unterminated code fence closed at end of input");
        }
        self.close();
        tracing::debug!(blocks = self.blocks.len(), "Document segmented");
        self.blocks
    }
}

fn to_owned_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|&line| line.to_owned()).collect()
}

/// Split a document into blocks.
///
/// `document` must already use `\n` line endings (see
/// [`normalize_line_endings`](crate::normalize_line_endings)). Blank lines
/// separate blocks and never produce one; together the blocks cover every
/// other line exactly once.
///
/// # Example
///
/// ```
/// use chatmark_renderer::{Block, segment};
///
/// let blocks = segment("# Title\n\n- a\n- b");
/// assert_eq!(
///     blocks,
///     vec![
///         Block::Heading { level: 1, text: "Title".to_owned() },
///         Block::List { ordered: false, items: vec!["a".to_owned(), "b".to_owned()] },
///     ]
/// );
/// ```
#[must_use]
pub fn segment(document: &str) -> Vec<Block> {
    let mut segmenter = Segmenter::new();
    for line in document.split('\n') {
        segmenter.feed(line);
    }
    segmenter.finish()
}
