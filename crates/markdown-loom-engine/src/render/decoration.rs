//! The decoration model handed to the rendering surface.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::parsing::inline::InlineKind;
use crate::parsing::rope::Span;

/// Styling for a whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LineStyle {
    Heading { level: u8 },
    HorizontalRule,
    ListItem { indent: usize },
    Blockquote { depth: u8 },
    FenceMarker,
    FenceBody,
    /// A standalone bold line, numbered among all such lines.
    SectionTitle { ordinal: usize, total: usize },
}

/// Character styling for a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MarkStyle {
    /// Literal syntax shown while the caret is inside its construct.
    RawSyntax,
    Code,
    Bold,
    Underline,
    Link,
    PageLink,
    Mention,
    Email,
    ListNumber,
    FenceInfo,
    /// Text of a checked checkbox item.
    Done,
}

impl MarkStyle {
    pub fn for_inline(kind: InlineKind) -> MarkStyle {
        match kind {
            InlineKind::Code => MarkStyle::Code,
            InlineKind::Bold | InlineKind::SectionTitle => MarkStyle::Bold,
            InlineKind::Underline => MarkStyle::Underline,
            InlineKind::Link => MarkStyle::Link,
            InlineKind::PageLink => MarkStyle::PageLink,
            InlineKind::Mention => MarkStyle::Mention,
            InlineKind::Email => MarkStyle::Email,
            InlineKind::Image | InlineKind::Date => MarkStyle::RawSyntax,
        }
    }
}

/// An inline element drawn in place of hidden text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Widget {
    Bullet { indent: usize },
    /// Carries its line so a click can toggle exactly that line.
    Checkbox { checked: bool, line: usize },
    HorizontalRule,
    Image { alt: String, url: String },
    Date { year: u16, month: u8, day: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DecorationKind {
    /// Zero-width at the start of the line it styles.
    Line(LineStyle),
    /// Text drawn with zero width.
    Hide,
    Replace(Widget),
    Mark(MarkStyle),
}

impl DecorationKind {
    /// Tie-break at equal `from`: line styling, then replacements, then
    /// marks.
    pub fn rank(&self) -> u8 {
        match self {
            DecorationKind::Line(_) => 0,
            DecorationKind::Hide | DecorationKind::Replace(_) => 1,
            DecorationKind::Mark(_) => 2,
        }
    }

    /// Hide and replace take text out of the layout, so they may never
    /// overlap.
    pub fn is_replacing(&self) -> bool {
        self.rank() == 1
    }
}

/// Which construct instance a decoration belongs to, unique within one
/// decoration set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ConstructId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub kind: DecorationKind,
    pub construct: ConstructId,
}

impl Decoration {
    pub fn span(&self) -> Span {
        Span::new(self.from, self.to)
    }

    fn sort_key(&self) -> (usize, u8, usize, &DecorationKind) {
        (self.from, self.kind.rank(), self.to, &self.kind)
    }
}

/// Decorations for one update, ordered by `(from, rank, to, style)` with
/// no overlapping replace-kind ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecorationSet {
    items: Vec<Decoration>,
}

impl DecorationSet {
    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Decorations starting inside `[from, to]`.
    pub fn starting_between(&self, from: usize, to: usize) -> &[Decoration] {
        let lo = self.items.partition_point(|d| d.from < from);
        let hi = self.items.partition_point(|d| d.from <= to);
        &self.items[lo..hi]
    }

    /// Checks the ordering and non-overlap contracts.
    pub fn is_consistent(&self) -> bool {
        let sorted = self
            .items
            .windows(2)
            .all(|w| w[0].sort_key() < w[1].sort_key());
        let mut last_end = 0;
        let disjoint = self.items.iter().filter(|d| d.kind.is_replacing()).all(|d| {
            let ok = d.from >= last_end;
            last_end = last_end.max(d.to);
            ok
        });
        sorted && disjoint
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Decorations of one construct, accepted or rejected as a unit.
#[derive(Debug, Default)]
pub struct Construct {
    parts: Vec<(Span, DecorationKind)>,
}

impl Construct {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, line_start: usize, style: LineStyle) -> &mut Self {
        self.parts
            .push((Span::new(line_start, line_start), DecorationKind::Line(style)));
        self
    }

    pub fn hide(&mut self, span: Span) -> &mut Self {
        if !span.is_empty() {
            self.parts.push((span, DecorationKind::Hide));
        }
        self
    }

    pub fn replace(&mut self, span: Span, widget: Widget) -> &mut Self {
        self.parts.push((span, DecorationKind::Replace(widget)));
        self
    }

    pub fn mark(&mut self, span: Span, style: MarkStyle) -> &mut Self {
        if !span.is_empty() {
            self.parts.push((span, DecorationKind::Mark(style)));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Collects constructs and enforces the set's contracts.
///
/// A construct whose replace-kind ranges collide with one already accepted
/// is dropped whole, so its text renders plain.
#[derive(Debug, Default)]
pub struct DecorationSetBuilder {
    items: Vec<Decoration>,
    /// Accepted replace-kind ranges, start -> end. Never overlapping.
    taken: BTreeMap<usize, usize>,
    next_id: u32,
    dropped: usize,
}

impl DecorationSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the construct was dropped.
    pub fn push(&mut self, construct: Construct) -> bool {
        if construct.is_empty() {
            return true;
        }
        let replacing: Vec<Span> = construct
            .parts
            .iter()
            .filter(|(_, kind)| kind.is_replacing())
            .map(|(span, _)| *span)
            .collect();
        if replacing.iter().any(|s| self.collides(*s)) {
            self.dropped += 1;
            log::trace!("dropped construct with colliding ranges {replacing:?}");
            return false;
        }

        let id = ConstructId(self.next_id);
        self.next_id += 1;
        for span in replacing {
            self.taken.insert(span.start, span.end);
        }
        self.items
            .extend(construct.parts.into_iter().map(|(span, kind)| Decoration {
                from: span.start,
                to: span.end,
                kind,
                construct: id,
            }));
        true
    }

    fn collides(&self, span: Span) -> bool {
        // Accepted ranges are disjoint, so only the last one starting
        // before `span.end` can reach into it.
        self.taken
            .range(..span.end)
            .next_back()
            .is_some_and(|(_, &end)| end > span.start)
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn finish(mut self) -> DecorationSet {
        self.items.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.items
            .dedup_by(|b, a| a.from == b.from && a.to == b.to && a.kind == b.kind);
        DecorationSet { items: self.items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hide(from: usize, to: usize) -> Construct {
        let mut c = Construct::new();
        c.hide(Span::new(from, to));
        c
    }

    #[test]
    fn orders_by_from_then_rank() {
        let mut b = DecorationSetBuilder::new();
        let mut c = Construct::new();
        c.mark(Span::new(2, 5), MarkStyle::Bold)
            .hide(Span::new(0, 2))
            .line(0, LineStyle::Heading { level: 1 });
        b.push(c);
        let set = b.finish();
        let kinds: Vec<_> = set.iter().map(|d| (d.from, d.kind.rank())).collect();
        assert_eq!(kinds, vec![(0, 0), (0, 1), (2, 2)]);
        assert!(set.is_consistent());
    }

    #[test]
    fn colliding_construct_is_dropped_whole() {
        let mut b = DecorationSetBuilder::new();
        assert!(b.push(hide(0, 4)));
        let mut late = Construct::new();
        late.hide(Span::new(6, 7))
            .hide(Span::new(3, 5))
            .mark(Span::new(5, 6), MarkStyle::Link);
        assert!(!b.push(late));
        assert_eq!(b.dropped(), 1);
        let set = b.finish();
        assert_eq!(set.len(), 1);
        assert!(set.is_consistent());
    }

    #[test]
    fn touching_ranges_do_not_collide() {
        let mut b = DecorationSetBuilder::new();
        assert!(b.push(hide(0, 2)));
        assert!(b.push(hide(2, 4)));
        assert!(b.push(hide(6, 8)));
        assert!(b.push(hide(4, 6)));
        assert!(!b.push(hide(5, 7)));
        assert!(b.finish().is_consistent());
    }

    #[test]
    fn marks_may_overlap() {
        let mut b = DecorationSetBuilder::new();
        let mut outer = Construct::new();
        outer.mark(Span::new(0, 10), MarkStyle::Bold);
        let mut inner = Construct::new();
        inner.mark(Span::new(2, 4), MarkStyle::Underline);
        assert!(b.push(outer));
        assert!(b.push(inner));
        assert_eq!(b.finish().len(), 2);
    }

    #[test]
    fn empty_ranges_are_not_decorated() {
        let mut c = Construct::new();
        c.hide(Span::new(3, 3)).mark(Span::new(1, 1), MarkStyle::Bold);
        assert!(c.is_empty());
    }

    #[test]
    fn starting_between_slices_by_offset() {
        let mut b = DecorationSetBuilder::new();
        b.push(hide(0, 1));
        b.push(hide(5, 6));
        b.push(hide(9, 10));
        let set = b.finish();
        let froms: Vec<_> = set.starting_between(1, 9).iter().map(|d| d.from).collect();
        assert_eq!(froms, vec![5, 9]);
    }
}
