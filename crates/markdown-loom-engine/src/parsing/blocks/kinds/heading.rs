use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::rope::span::Span;

// One to six markers and a single separating space. `#foo` is plain text.
static HEADING_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6}) ").unwrap());

/// ATX heading syntax (`#` .. `######`).
pub struct Heading;

/// A heading line split into its parts (line-local byte spans).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingMatch {
    pub level: u8,
    /// The `#` run plus its separating space.
    pub marker: Span,
    /// Heading text after the marker.
    pub content: Span,
}

impl Heading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: u8 = 6;

    pub fn parse(line: &str) -> Option<HeadingMatch> {
        let caps = HEADING_PATTERN.captures(line)?;
        let hashes = caps.get(1)?;
        let marker_end = hashes.end() + 1;
        Some(HeadingMatch {
            level: hashes.len() as u8,
            marker: Span::new(0, marker_end),
            content: Span::new(marker_end, line.len()),
        })
    }
}
