//! # Decoration Builder
//!
//! A pure function from (snapshot, viewport, selection, fence table,
//! latest section titles) to a [`DecorationSet`].
//!
//! Cost follows the viewport. Lines outside it are only read to find the
//! extent of a blockquote run that crosses a viewport edge; fence extents
//! come from the [`FenceTracker`] side table.
//!
//! Each construct renders raw while the primary caret touches its full span
//! (syntax included) and rendered otherwise. Raw keeps the literal syntax
//! visible with a `RawSyntax` mark; rendered hides it or swaps it for a
//! widget.

use crate::editing::{selection::Selection, snapshot::DocSnapshot};
use crate::parsing::blocks::{
    BlockLine, FenceContext, FenceRange, FenceTracker, MarkdownLineClassifier,
    kinds::{BlockQuote, CodeFence, ListItemKind},
};
use crate::parsing::inline::{
    Detector, InlineKind, InlinePayload, InlineSpan, kinds::SectionTitleDetector, scan_line,
};
use crate::parsing::rope::{LineRef, Span};
use crate::render::{
    decoration::{
        Construct, DecorationSet, DecorationSetBuilder, LineStyle, MarkStyle, Widget,
    },
    section_titles::SectionTitles,
    viewport::Viewport,
};

/// Everything one recompute reads.
#[derive(Debug, Clone, Copy)]
pub struct DecorationInput<'a> {
    pub snapshot: &'a DocSnapshot,
    pub viewport: Viewport,
    pub selection: &'a Selection,
    /// Must describe `snapshot`'s revision.
    pub fences: &'a FenceTracker,
    /// The most recent debounced scan, possibly from an older version.
    pub section_titles: Option<&'a SectionTitles>,
}

/// The primary caret, the only one that flips constructs to raw.
#[derive(Debug, Clone, Copy)]
struct Caret(Option<usize>);

impl Caret {
    fn inside(self, span: Span) -> bool {
        self.0.is_some_and(|at| span.touches(at))
    }
}

pub fn build_decorations(input: &DecorationInput<'_>) -> DecorationSet {
    let snapshot = input.snapshot;
    let vp = input.viewport.clamp(snapshot.line_count());
    let caret = Caret(input.selection.head());
    let mut out = DecorationSetBuilder::new();

    for fence in input.fences.overlapping(vp.first_line, vp.last_line) {
        out.push(fence_construct(snapshot, fence, vp, caret));
    }

    let mut quoted_through = 0;
    for line in snapshot.lines(vp.first_line, vp.last_line) {
        if input.fences.fence_containing(line.number).is_some() {
            continue;
        }
        let block = MarkdownLineClassifier.classify(&line.text, FenceContext::Outside);
        match block {
            BlockLine::Blockquote(_) if line.number > quoted_through => {
                let (construct, last) = quote_run(input, &line, vp, caret);
                quoted_through = last;
                out.push(construct);
            }
            BlockLine::Blockquote(_) => {}
            _ => {
                out.push(block_construct(&line, &block, caret));
            }
        }
        if block == BlockLine::HorizontalRule {
            continue;
        }
        for span in scan_line(&line.text) {
            out.push(inline_construct(span.shifted(line.from), caret));
        }
    }

    if let Some(titles) = input
        .section_titles
        .filter(|t| t.revision.document == snapshot.id())
    {
        let current = titles.revision == snapshot.revision();
        let total = titles.total();
        for title in titles.between(vp.first_line, vp.last_line) {
            // Line numbers from an older version only count where the
            // line still reads as a title.
            if !current && !still_a_title(input, title.line) {
                continue;
            }
            let mut construct = Construct::new();
            construct.line(
                snapshot.line_start(title.line),
                LineStyle::SectionTitle {
                    ordinal: title.ordinal,
                    total,
                },
            );
            out.push(construct);
        }
    }

    let dropped = out.dropped();
    let set = out.finish();
    log::trace!(
        "decorated lines {}..={} of v{}: {} decorations, {dropped} constructs dropped",
        vp.first_line,
        vp.last_line,
        snapshot.version(),
        set.len()
    );
    set
}

fn still_a_title(input: &DecorationInput<'_>, line: usize) -> bool {
    input.fences.fence_containing(line).is_none()
        && input
            .snapshot
            .line(line)
            .is_some_and(|l| !SectionTitleDetector.detect(&l.text).is_empty())
}

fn fence_construct(
    snapshot: &DocSnapshot,
    fence: &FenceRange,
    vp: Viewport,
    caret: Caret,
) -> Construct {
    let last = fence.last_line(snapshot.line_count());
    let full = Span::new(
        snapshot.line_start(fence.start_line),
        snapshot.line(last).map_or(snapshot.len(), |l| l.to),
    );
    let raw = caret.inside(full);
    let mut construct = Construct::new();

    let markers = [Some(fence.start_line), fence.end_line];
    for line in markers.into_iter().flatten().filter_map(|n| snapshot.line(n)) {
        construct.line(line.from, LineStyle::FenceMarker);
        if let Some(sig) = CodeFence::sig(&line.text) {
            if !raw {
                construct.hide(sig.marker.shift(line.from));
            }
            construct.mark(sig.info.shift(line.from), MarkStyle::FenceInfo);
        }
    }

    let body_first = (fence.start_line + 1).max(vp.first_line);
    let body_last = fence.end_line.map_or(last, |end| end - 1).min(vp.last_line);
    for n in body_first..=body_last {
        construct.line(snapshot.line_start(n), LineStyle::FenceBody);
    }
    construct
}

/// Decorates the whole blockquote run containing `line`, returning the
/// run's last line. Line styling is clipped to the viewport but the
/// raw/rendered decision covers the full run.
fn quote_run(
    input: &DecorationInput<'_>,
    line: &LineRef,
    vp: Viewport,
    caret: Caret,
) -> (Construct, usize) {
    let snapshot = input.snapshot;
    let is_quote = |n: usize| {
        input.fences.fence_containing(n).is_none()
            && snapshot
                .line(n)
                .is_some_and(|l| BlockQuote::parse(&l.text).is_some())
    };

    let mut first = line.number;
    while first > 1 && is_quote(first - 1) {
        first -= 1;
    }
    let mut last = line.number;
    while is_quote(last + 1) {
        last += 1;
    }

    let full = Span::new(
        snapshot.line_start(first),
        snapshot.line(last).map_or(snapshot.len(), |l| l.to),
    );
    let raw = caret.inside(full);
    let mut construct = Construct::new();
    for l in snapshot.lines(first.max(vp.first_line), last.min(vp.last_line)) {
        let Some(quote) = BlockQuote::parse(&l.text) else {
            continue;
        };
        construct.line(l.from, LineStyle::Blockquote { depth: quote.depth });
        if !raw {
            construct.hide(quote.marker.shift(l.from));
        }
    }
    (construct, last)
}

fn block_construct(line: &LineRef, block: &BlockLine, caret: Caret) -> Construct {
    let mut construct = Construct::new();
    let at = |span: Span| span.shift(line.from);

    match block {
        BlockLine::Heading(h) => {
            construct.line(line.from, LineStyle::Heading { level: h.level });
            if caret.inside(line.span()) {
                construct.mark(at(h.marker), MarkStyle::RawSyntax);
            } else {
                construct.hide(at(h.marker));
            }
        }
        BlockLine::HorizontalRule => {
            construct.line(line.from, LineStyle::HorizontalRule);
            if caret.inside(line.span()) {
                construct.mark(line.span(), MarkStyle::RawSyntax);
            } else {
                construct.replace(line.span(), Widget::HorizontalRule);
            }
        }
        BlockLine::ListItem(item) => {
            let marker = at(item.marker);
            let raw = caret.inside(marker);
            construct.line(line.from, LineStyle::ListItem { indent: item.indent() });
            match item.kind {
                ListItemKind::Bullet if raw => {
                    construct.mark(marker, MarkStyle::RawSyntax);
                }
                ListItemKind::Bullet => {
                    construct.replace(marker, Widget::Bullet { indent: item.indent() });
                }
                ListItemKind::Checkbox { checked } => {
                    if raw {
                        construct.mark(marker, MarkStyle::RawSyntax);
                    } else {
                        construct.replace(
                            marker,
                            Widget::Checkbox {
                                checked,
                                line: line.number,
                            },
                        );
                    }
                    if checked {
                        construct.mark(at(item.content), MarkStyle::Done);
                    }
                }
                ListItemKind::Ordered { .. } => {
                    let style = if raw {
                        MarkStyle::RawSyntax
                    } else {
                        MarkStyle::ListNumber
                    };
                    construct.mark(at(item.token), style);
                }
            }
        }
        BlockLine::Blockquote(_)
        | BlockLine::FenceOpen(_)
        | BlockLine::FenceClose(_)
        | BlockLine::Plain => {}
    }
    construct
}

fn inline_construct(span: InlineSpan, caret: Caret) -> Construct {
    let raw = caret.inside(span.full);
    let mut construct = Construct::new();

    match (span.kind, &span.payload) {
        (InlineKind::Image, InlinePayload::Image { alt, url }) if !raw => {
            construct.replace(
                span.full,
                Widget::Image {
                    alt: alt.clone(),
                    url: url.clone(),
                },
            );
        }
        (InlineKind::Date, &InlinePayload::Date { year, month, day }) if !raw => {
            construct.replace(span.full, Widget::Date { year, month, day });
        }
        (InlineKind::Image | InlineKind::Date, _) => {
            construct.mark(span.full, MarkStyle::RawSyntax);
        }
        (InlineKind::Mention | InlineKind::Email, _) => {
            let style = if raw {
                MarkStyle::RawSyntax
            } else {
                MarkStyle::for_inline(span.kind)
            };
            construct.mark(span.full, style);
        }
        _ => {
            for marker in span.visible_markers() {
                if raw {
                    construct.mark(marker, MarkStyle::RawSyntax);
                } else {
                    construct.hide(marker);
                }
            }
            construct.mark(span.content, MarkStyle::for_inline(span.kind));
        }
    }
    construct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Document, Transaction};
    use crate::render::decoration::DecorationKind;
    use crate::render::section_titles::scan_section_titles;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn build_in(text: &str, cursor: Option<usize>, viewport: Viewport) -> DecorationSet {
        let snapshot = Document::from_text(text).snapshot();
        let fences = FenceTracker::scan(&snapshot);
        let selection = cursor.map_or_else(Selection::none, Selection::cursor);
        build_decorations(&DecorationInput {
            snapshot: &snapshot,
            viewport,
            selection: &selection,
            fences: &fences,
            section_titles: None,
        })
    }

    fn build(text: &str, cursor: Option<usize>) -> DecorationSet {
        build_in(text, cursor, Viewport::new(1, 10_000))
    }

    fn parts(set: &DecorationSet) -> Vec<(usize, usize, DecorationKind)> {
        set.iter().map(|d| (d.from, d.to, d.kind.clone())).collect()
    }

    use DecorationKind::{Hide, Line, Mark, Replace};

    #[test]
    fn heading_hides_marker_when_caret_is_away() {
        assert_eq!(
            parts(&build("# Title", None)),
            vec![
                (0, 0, Line(LineStyle::Heading { level: 1 })),
                (0, 2, Hide),
            ]
        );
        assert_eq!(
            parts(&build("# Title", Some(3))),
            vec![
                (0, 0, Line(LineStyle::Heading { level: 1 })),
                (0, 2, Mark(MarkStyle::RawSyntax)),
            ]
        );
    }

    #[test]
    fn bold_flips_raw_when_caret_enters() {
        let rendered = vec![
            (2, 4, Hide),
            (4, 5, Mark(MarkStyle::Bold)),
            (5, 7, Hide),
        ];
        let raw = vec![
            (2, 4, Mark(MarkStyle::RawSyntax)),
            (4, 5, Mark(MarkStyle::Bold)),
            (5, 7, Mark(MarkStyle::RawSyntax)),
        ];
        let text = "a **b** c";
        assert_eq!(parts(&build(text, Some(0))), rendered);
        assert_eq!(parts(&build(text, Some(3))), raw);
        // Both ends of the construct count as inside.
        assert_eq!(parts(&build(text, Some(7))), raw);
        assert_eq!(parts(&build(text, Some(8))), rendered);
    }

    #[test]
    fn only_primary_head_counts() {
        use crate::editing::SelectionRange;
        let snapshot = Document::from_text("**a** **b**").snapshot();
        let fences = FenceTracker::scan(&snapshot);
        let selection = Selection::new(
            vec![SelectionRange::cursor(1), SelectionRange::cursor(11)],
            1,
        );
        let set = build_decorations(&DecorationInput {
            snapshot: &snapshot,
            viewport: Viewport::new(1, 1),
            selection: &selection,
            fences: &fences,
            section_titles: None,
        });
        let hidden: Vec<_> = set.iter().filter(|d| d.kind == Hide).map(|d| d.from).collect();
        assert_eq!(hidden, vec![0, 3]);
    }

    #[test]
    fn checked_checkbox_becomes_widget() {
        assert_eq!(
            parts(&build("- [x] done", None)),
            vec![
                (0, 0, Line(LineStyle::ListItem { indent: 0 })),
                (
                    0,
                    6,
                    Replace(Widget::Checkbox {
                        checked: true,
                        line: 1
                    })
                ),
                (6, 10, Mark(MarkStyle::Done)),
            ]
        );
    }

    #[test]
    fn bullet_marker_is_raw_under_caret() {
        assert_eq!(
            parts(&build("- a", Some(1))),
            vec![
                (0, 0, Line(LineStyle::ListItem { indent: 0 })),
                (0, 2, Mark(MarkStyle::RawSyntax)),
            ]
        );
        assert_eq!(
            parts(&build("  - a", Some(5)))[1],
            (2, 4, Replace(Widget::Bullet { indent: 1 }))
        );
    }

    #[test]
    fn horizontal_rule_widget() {
        assert_eq!(
            parts(&build("---", None)),
            vec![
                (0, 0, Line(LineStyle::HorizontalRule)),
                (0, 3, Replace(Widget::HorizontalRule)),
            ]
        );
    }

    #[test]
    fn image_and_date_widgets() {
        let set = build("see ![alt](p.png) 2024-02-29", None);
        assert_eq!(
            parts(&set),
            vec![
                (
                    4,
                    17,
                    Replace(Widget::Image {
                        alt: "alt".into(),
                        url: "p.png".into()
                    })
                ),
                (
                    18,
                    28,
                    Replace(Widget::Date {
                        year: 2024,
                        month: 2,
                        day: 29
                    })
                ),
            ]
        );
    }

    #[test]
    fn nothing_but_line_styling_inside_fences() {
        let text = "```\n**x** @y\n```\nafter **b**";
        let set = build(text, None);
        let inside: Vec<_> = set
            .iter()
            .filter(|d| d.from > 3 && d.from < 12)
            .map(|d| d.kind.clone())
            .collect();
        assert_eq!(inside, vec![Line(LineStyle::FenceBody)]);
        assert!(set.iter().any(|d| d.kind == Mark(MarkStyle::Bold)));
    }

    #[test]
    fn open_fence_swallows_the_rest() {
        let set = build("text\n```\n# not heading\n- [ ] no", None);
        let styles: Vec<_> = set
            .iter()
            .filter_map(|d| match d.kind {
                Line(style) => Some(style),
                _ => None,
            })
            .collect();
        assert_eq!(
            styles,
            vec![LineStyle::FenceMarker, LineStyle::FenceBody, LineStyle::FenceBody]
        );
    }

    #[test]
    fn cost_follows_viewport() {
        let text = vec!["**b**"; 1000].join("\n");
        let set = build_in(&text, None, Viewport::new(10, 12));
        assert_eq!(set.len(), 9);
    }

    #[test]
    fn fence_markers_emitted_and_body_clipped() {
        let text = format!("```rust\n{}```", "x\n".repeat(98));
        let set = build_in(&text, None, Viewport::new(50, 52));
        let markers = set
            .iter()
            .filter(|d| d.kind == Line(LineStyle::FenceMarker))
            .count();
        let body = set
            .iter()
            .filter(|d| d.kind == Line(LineStyle::FenceBody))
            .count();
        assert_eq!((markers, body), (2, 3));
        assert!(set.iter().any(|d| d.kind == Mark(MarkStyle::FenceInfo)));
    }

    #[test]
    fn blockquote_run_decided_as_a_whole() {
        let text = "> a\n> b\n> c";
        let vp = Viewport::new(2, 2);
        assert_eq!(
            parts(&build_in(text, Some(1), vp)),
            vec![(4, 4, Line(LineStyle::Blockquote { depth: 1 }))]
        );
        assert_eq!(
            parts(&build_in(text, None, vp)),
            vec![
                (4, 4, Line(LineStyle::Blockquote { depth: 1 })),
                (4, 6, Hide),
            ]
        );
    }

    #[test]
    fn section_titles_filtered_to_viewport() {
        let snapshot = Document::from_text("**A**\ntext\n**B**").snapshot();
        let fences = FenceTracker::scan(&snapshot);
        let titles = scan_section_titles(&snapshot);
        let selection = Selection::none();
        let set = build_decorations(&DecorationInput {
            snapshot: &snapshot,
            viewport: Viewport::new(2, 3),
            selection: &selection,
            fences: &fences,
            section_titles: Some(&titles),
        });
        let lines: Vec<_> = set
            .iter()
            .filter_map(|d| match d.kind {
                Line(LineStyle::SectionTitle { ordinal, total }) => Some((d.from, ordinal, total)),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec![(11, 2, 2)]);
    }

    #[test]
    fn stale_titles_only_style_lines_that_still_read_as_titles() {
        let mut doc = Document::from_text("**A**\ntext\n**B**");
        let titles = scan_section_titles(&doc.snapshot());
        doc.apply(Transaction::insert(0, "new\n")).unwrap();
        let snapshot = doc.snapshot();
        let fences = FenceTracker::scan(&snapshot);
        let selection = Selection::none();
        let set = build_decorations(&DecorationInput {
            snapshot: &snapshot,
            viewport: Viewport::new(1, 10),
            selection: &selection,
            fences: &fences,
            section_titles: Some(&titles),
        });
        let styled: Vec<_> = set
            .iter()
            .filter(|d| matches!(d.kind, Line(LineStyle::SectionTitle { .. })))
            .map(|d| snapshot.line_number_at(d.from))
            .collect();
        // Old line 1 now holds "new" and old line 3 holds "text".
        assert_eq!(styled, Vec::<usize>::new());
    }

    #[rstest]
    #[case("![a](b) [c](d) [[p|q]]")]
    #[case("**[x](y)** __u__ `**`")]
    #[case("2024-01-02 @me a@b.io")]
    #[case("- [ ] **a** 2024-02-30 [e](f)")]
    #[case("# **Title** with `code` and ![i](j)")]
    #[case("> quote **b**\n> more\n\n1. one\n2. two\n---")]
    fn replace_ranges_never_overlap(#[case] text: &str) {
        for cursor in (0..=text.len()).map(Some).chain([None]) {
            let set = build(text, cursor);
            assert!(set.is_consistent(), "cursor {cursor:?}: {:#?}", set);
        }
    }
}
