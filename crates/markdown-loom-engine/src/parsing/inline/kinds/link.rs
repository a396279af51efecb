use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::{
    inline::{
        cursor::Cursor,
        detect::Detector,
        types::{InlineKind, InlinePayload, InlineSpan},
    },
    rope::span::Span,
};

// Link text must be non-empty; `[](x)` stays plain text. No nested
// brackets, which also keeps `[[page]]` out of this pattern.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]+)\]\(([^()\s]*)\)").unwrap());

/// Wiki-style page link delimiters.
pub struct WikiLink;

impl WikiLink {
    pub const OPEN: &'static [u8; 2] = b"[[";
    pub const CLOSE: &'static [u8; 2] = b"]]";
    pub const ALIAS: u8 = b'|';
}

/// Detects `[text](url)` links and `[[page]]` / `[[page|alias]]` page links.
pub struct LinkDetector;

impl Detector for LinkDetector {
    fn detect(&self, line: &str) -> Vec<InlineSpan> {
        let mut out = Vec::new();

        for caps in LINK_PATTERN.captures_iter(line) {
            let (Some(all), Some(text), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                continue;
            };
            // `![alt](url)` belongs to the image detector.
            if all.start() > 0 && line.as_bytes()[all.start() - 1] == b'!' {
                continue;
            }
            if text.as_str().trim().is_empty() {
                continue;
            }
            out.push(InlineSpan {
                kind: InlineKind::Link,
                full: Span::new(all.start(), all.end()),
                markers: [
                    Span::new(all.start(), text.start()),
                    Span::new(text.end(), all.end()),
                ],
                content: Span::new(text.start(), text.end()),
                payload: InlinePayload::Url(url.as_str().to_string()),
            });
        }

        let mut cur = Cursor::new(line);
        while !cur.eof() {
            if let Some(span) = try_parse_wikilink(&mut cur) {
                out.push(span);
                continue;
            }
            cur.bump();
        }

        out.sort_by_key(|s| s.full.start);
        out
    }
}

/// Attempts to parse a page link starting at the current position.
///
/// Returns `None` if not at `[[`, if the link isn't closed, or if the target
/// or alias is empty. On failure, cursor position is restored.
fn try_parse_wikilink(cur: &mut Cursor<'_>) -> Option<InlineSpan> {
    if !cur.starts_with(WikiLink::OPEN) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump_n(WikiLink::OPEN.len());
    let target_start = cur.pos();

    while !cur.eof() && cur.peek() != Some(WikiLink::ALIAS) && !cur.starts_with(WikiLink::CLOSE) {
        cur.bump();
    }
    let target_end = cur.pos();

    let mut alias = None;
    if cur.peek() == Some(WikiLink::ALIAS) {
        cur.bump();
        let alias_start = cur.pos();
        while !cur.eof() && !cur.starts_with(WikiLink::CLOSE) {
            cur.bump();
        }
        alias = Some(Span::new(alias_start, cur.pos()));
    }

    let target = Span::new(target_start, target_end);
    let shown = alias.unwrap_or(target);
    if !cur.starts_with(WikiLink::CLOSE) || target.is_empty() || shown.is_empty() {
        *cur = saved;
        return None;
    }
    cur.bump_n(WikiLink::CLOSE.len());
    let end = cur.pos();

    Some(InlineSpan {
        kind: InlineKind::PageLink,
        full: Span::new(start, end),
        markers: [
            Span::new(start, shown.start),
            Span::new(shown.end, end),
        ],
        content: shown,
        payload: InlinePayload::Page(cur.s[target.start..target.end].trim().to_string()),
    })
}
