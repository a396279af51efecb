use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::rope::span::Span;

// The exit case (a quote marker with nothing after it) is tested before the
// generic pattern, since an empty quote line matches both.
static EMPTY_QUOTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^( *)>\s*$").unwrap());
static QUOTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^( *)>").unwrap());

/// Blockquote syntax. All `>` knowledge lives here.
pub struct BlockQuote;

/// A blockquote line split into its parts (line-local byte spans).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockQuoteMatch {
    pub leading_spaces: usize,
    /// Nesting depth (`>>` and `> >` are both 2).
    pub depth: u8,
    /// All `>` prefixes with their following spaces.
    pub marker: Span,
    pub content: Span,
    /// True for a quote marker with nothing after it.
    pub empty: bool,
}

impl BlockQuoteMatch {
    pub fn indent(&self) -> usize {
        self.leading_spaces / 2
    }
}

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';
    pub const CONTINUATION: &'static str = "> ";

    pub fn parse(line: &str) -> Option<BlockQuoteMatch> {
        let (leading, empty) = if let Some(caps) = EMPTY_QUOTE_PATTERN.captures(line) {
            (caps.get(1)?.len(), true)
        } else {
            (QUOTE_PATTERN.captures(line)?.get(1)?.len(), false)
        };
        let (depth, content_start) = Self::strip_prefixes(line);
        Some(BlockQuoteMatch {
            leading_spaces: leading,
            depth,
            marker: Span::new(leading, content_start),
            content: Span::new(content_start, line.len()),
            empty,
        })
    }

    /// Strips blockquote prefixes from a line, returning (depth, byte_offset).
    ///
    /// Handles various forms: `> text`, `>> nested`, `> > spaced nested`.
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut depth = 0u8;

        loop {
            let mut j = i;
            while j < b.len() && b[j] == b' ' {
                j += 1;
            }
            if j < b.len() && b[j] == (Self::PREFIX as u8) {
                depth = depth.saturating_add(1);
                i = j + 1;
                if i < b.len() && b[i] == b' ' {
                    i += 1;
                }
            } else {
                break;
            }
        }
        (depth, i)
    }
}
