use crate::parsing::rope::span::Span;

use super::{
    cursor::Cursor,
    kinds::{CodeSpan, Emphasis},
    types::{InlineKind, InlineSpan},
};

/// Finds code spans in a line.
///
/// A run of backticks opens a span that closes at the next run of exactly
/// the same length. An unmatched run is literal text.
pub fn parse_code_spans(line: &str) -> Vec<InlineSpan> {
    let mut cur = Cursor::new(line);
    let mut out = vec![];

    while !cur.eof() {
        if let Some(span) = try_parse_code_span(&mut cur) {
            out.push(span);
            continue;
        }
        cur.bump();
    }
    out
}

/// Attempts to parse a code span starting at the current position.
///
/// On failure the whole opening run is consumed, so a longer run is never
/// re-read as a shorter opener.
fn try_parse_code_span(cur: &mut Cursor<'_>) -> Option<InlineSpan> {
    if cur.peek() != Some(CodeSpan::TICK) {
        return None;
    }

    let start = cur.pos();
    let ticks = cur.run_of(CodeSpan::TICK);
    cur.bump_n(ticks);
    let inner_start = cur.pos();

    let mut probe = cur.clone();
    while !probe.eof() {
        if probe.peek() == Some(CodeSpan::TICK) {
            let run = probe.run_of(CodeSpan::TICK);
            if run == ticks {
                let inner_end = probe.pos();
                probe.bump_n(run);
                *cur = probe;
                if inner_end == inner_start {
                    return None;
                }
                return Some(InlineSpan::delimited(
                    InlineKind::Code,
                    Span::new(start, cur.pos()),
                    ticks,
                    ticks,
                ));
            }
            probe.bump_n(run);
        } else {
            probe.bump();
        }
    }
    None
}

/// Parses code spans, bold and underline in a line.
///
/// Code spans are raw zones: emphasis delimiters inside them are ignored.
/// Bold and underline are scanned independently so they may nest inside
/// each other. The result is ordered by start offset.
pub fn parse_emphasis(line: &str) -> Vec<InlineSpan> {
    let mut out = parse_code_spans(line);
    let zones: Vec<Span> = out.iter().map(|s| s.full).collect();

    for (kind, delim) in Emphasis::ALL {
        let mut cur = Cursor::new(line);
        while !cur.eof() {
            if let Some(span) = try_parse_emphasis(&mut cur, kind, delim, &zones) {
                out.push(span);
                continue;
            }
            cur.bump();
        }
    }

    out.sort_by_key(|s| (s.full.start, s.kind));
    out
}

fn in_zone(zones: &[Span], at: usize) -> bool {
    zones.iter().any(|z| at >= z.start && at < z.end)
}

fn try_parse_emphasis(
    cur: &mut Cursor<'_>,
    kind: InlineKind,
    delim: &[u8; 2],
    zones: &[Span],
) -> Option<InlineSpan> {
    if !cur.starts_with(delim) || in_zone(zones, cur.pos()) {
        return None;
    }
    // Underscores inside words (`snake__case`) are not delimiters.
    let intraword = |b: Option<u8>| b.is_some_and(|c| c.is_ascii_alphanumeric());
    if kind == InlineKind::Underline && intraword(cur.prev()) {
        return None;
    }

    let start = cur.pos();
    let mut probe = cur.clone();
    probe.bump_n(delim.len());
    let inner_start = probe.pos();

    loop {
        let close = probe.find(delim)?;
        probe.bump_n(close - probe.pos());
        if in_zone(zones, close) {
            probe.bump();
            continue;
        }
        let after = probe.s.as_bytes().get(close + delim.len()).copied();
        if kind == InlineKind::Underline && intraword(after) {
            probe.bump();
            continue;
        }
        let inner = &probe.s[inner_start..close];
        if inner.trim().is_empty() {
            return None;
        }
        probe.bump_n(delim.len());
        *cur = probe;
        return Some(InlineSpan::delimited(
            kind,
            Span::new(start, cur.pos()),
            delim.len(),
            delim.len(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(line: &str) -> Vec<(InlineKind, Span)> {
        parse_emphasis(line)
            .into_iter()
            .map(|s| (s.kind, s.full))
            .collect()
    }

    #[test]
    fn parse_code_span() {
        let spans = parse_code_spans("`code`");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].full, Span::new(0, 6));
        assert_eq!(spans[0].content, Span::new(1, 5));
    }

    #[test]
    fn double_tick_span_contains_single_tick() {
        let spans = parse_code_spans("``a ` b``");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, Span::new(2, 7));
    }

    #[test]
    fn unclosed_code_span_is_text() {
        assert!(parse_code_spans("`unclosed code").is_empty());
    }

    #[test]
    fn bold_and_underline() {
        assert_eq!(
            kinds("**b** and __u__"),
            vec![
                (InlineKind::Bold, Span::new(0, 5)),
                (InlineKind::Underline, Span::new(10, 15)),
            ]
        );
    }

    #[test]
    fn nested_underline_inside_bold() {
        assert_eq!(
            kinds("**a __b__ c**"),
            vec![
                (InlineKind::Bold, Span::new(0, 13)),
                (InlineKind::Underline, Span::new(4, 9)),
            ]
        );
    }

    #[test]
    fn code_span_suppresses_emphasis() {
        assert_eq!(kinds("`**not bold**`"), vec![(InlineKind::Code, Span::new(0, 14))]);
    }

    #[test]
    fn empty_markers_are_not_bold() {
        assert!(kinds("****").is_empty());
        assert!(kinds("**  **").is_empty());
    }

    #[test]
    fn snake_case_is_not_underline() {
        assert!(kinds("my__snake__case").is_empty());
    }

    #[test]
    fn unclosed_bold_is_text() {
        assert!(kinds("**open ended").is_empty());
    }
}
