use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::rope::span::Span;

// Checkbox syntax is a textual superset of bullet syntax, so it must be
// tried first. Swapping the order makes every checkbox a bullet.
static CHECKBOX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( *)([-*+]) (\[([ xX])\])(?: |$)").unwrap());
static BULLET_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^( *)([-*+]) ").unwrap());
static ORDERED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( *)(\d{1,9})([.)]) ").unwrap());

/// List item syntax: bullets, ordered items and checkboxes.
pub struct ListItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListItemKind {
    Bullet,
    Ordered { number: u64, delimiter: char },
    Checkbox { checked: bool },
}

/// A list item line split into its parts (line-local byte spans).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItemMatch {
    pub kind: ListItemKind,
    /// Number of leading spaces.
    pub leading_spaces: usize,
    /// Everything between the indentation and the content, trailing space
    /// included (`- `, `12. `, `- [x] `).
    pub marker: Span,
    /// The bullet character or the numeral with its delimiter.
    pub token: Span,
    /// The `[ ]` / `[x]` box for checkbox items.
    pub checkbox: Option<Span>,
    /// Item text after the marker.
    pub content: Span,
}

impl ListItemMatch {
    /// Nesting level: two spaces per level.
    pub fn indent(&self) -> usize {
        self.leading_spaces / ListItem::INDENT_WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl ListItem {
    pub const INDENT_WIDTH: usize = 2;
    pub const INDENT: &'static str = "  ";
    pub const UNCHECKED: &'static str = "- [ ] ";

    /// Parses any list item, checkbox first.
    pub fn parse(line: &str) -> Option<ListItemMatch> {
        Self::parse_checkbox(line)
            .or_else(|| Self::parse_bullet(line))
            .or_else(|| Self::parse_ordered(line))
    }

    pub fn parse_checkbox(line: &str) -> Option<ListItemMatch> {
        let caps = CHECKBOX_PATTERN.captures(line)?;
        let indent = caps.get(1)?;
        let bullet = caps.get(2)?;
        let boxed = caps.get(3)?;
        let state = caps.get(4)?;
        let end = caps.get(0)?.end();
        Some(ListItemMatch {
            kind: ListItemKind::Checkbox {
                checked: state.as_str().eq_ignore_ascii_case("x"),
            },
            leading_spaces: indent.len(),
            marker: Span::new(bullet.start(), end),
            token: Span::new(bullet.start(), bullet.end()),
            checkbox: Some(Span::new(boxed.start(), boxed.end())),
            content: Span::new(end, line.len()),
        })
    }

    pub fn parse_bullet(line: &str) -> Option<ListItemMatch> {
        let caps = BULLET_PATTERN.captures(line)?;
        let indent = caps.get(1)?;
        let bullet = caps.get(2)?;
        let end = caps.get(0)?.end();
        Some(ListItemMatch {
            kind: ListItemKind::Bullet,
            leading_spaces: indent.len(),
            marker: Span::new(bullet.start(), end),
            token: Span::new(bullet.start(), bullet.end()),
            checkbox: None,
            content: Span::new(end, line.len()),
        })
    }

    pub fn parse_ordered(line: &str) -> Option<ListItemMatch> {
        let caps = ORDERED_PATTERN.captures(line)?;
        let indent = caps.get(1)?;
        let digits = caps.get(2)?;
        let delimiter = caps.get(3)?;
        let end = caps.get(0)?.end();
        let number = digits.as_str().parse().ok()?;
        Some(ListItemMatch {
            kind: ListItemKind::Ordered {
                number,
                delimiter: delimiter.as_str().chars().next()?,
            },
            leading_spaces: indent.len(),
            marker: Span::new(digits.start(), end),
            token: Span::new(digits.start(), delimiter.end()),
            checkbox: None,
            content: Span::new(end, line.len()),
        })
    }

    /// Byte span of the numeral alone for ordered items.
    pub fn numeral(m: &ListItemMatch) -> Option<Span> {
        match m.kind {
            ListItemKind::Ordered { .. } => Some(Span::new(m.token.start, m.token.end - 1)),
            _ => None,
        }
    }
}
