use serde::Serialize;
use xi_rope::Rope;

use crate::editing::error::EngineError;
use crate::parsing::rope::Span;

/// One selected range. `head` is where the caret is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionRange {
    pub anchor: usize,
    pub head: usize,
}

impl SelectionRange {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(at: usize) -> Self {
        Self::new(at, at)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn span(&self) -> Span {
        Span::new(self.from(), self.to())
    }
}

/// The set of selected ranges. Only the primary range's head decides
/// whether constructs render raw; commands act on every range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    ranges: Vec<SelectionRange>,
    primary: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self::cursor(0)
    }
}

impl Selection {
    /// A selection with a primary index. An out-of-range index falls back
    /// to the last range.
    pub fn new(ranges: Vec<SelectionRange>, primary: usize) -> Self {
        let primary = primary.min(ranges.len().saturating_sub(1));
        Self { ranges, primary }
    }

    pub fn single(range: SelectionRange) -> Self {
        Self::new(vec![range], 0)
    }

    pub fn cursor(at: usize) -> Self {
        Self::single(SelectionRange::cursor(at))
    }

    /// No selection at all: the editor is not focused.
    pub fn none() -> Self {
        Self::new(Vec::new(), 0)
    }

    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    pub fn primary_index(&self) -> usize {
        self.primary
    }

    pub fn primary(&self) -> Option<SelectionRange> {
        self.ranges.get(self.primary).copied()
    }

    /// Head of the primary range: the one caret that flips constructs raw.
    pub fn head(&self) -> Option<usize> {
        self.primary().map(|r| r.head)
    }

    /// The caret position when this is exactly one empty range.
    pub fn single_cursor(&self) -> Option<usize> {
        match self.ranges.as_slice() {
            [r] if r.is_empty() => Some(r.head),
            _ => None,
        }
    }

    pub fn map(&self, f: impl Fn(usize) -> usize) -> Self {
        Self {
            ranges: self
                .ranges
                .iter()
                .map(|r| SelectionRange::new(f(r.anchor), f(r.head)))
                .collect(),
            primary: self.primary,
        }
    }

    /// Every anchor and head must lie inside `rope` on a char boundary.
    pub(crate) fn validate(&self, rope: &Rope) -> Result<(), EngineError> {
        let len = rope.len();
        for offset in self.ranges.iter().flat_map(|r| [r.anchor, r.head]) {
            if offset > len {
                return Err(EngineError::SelectionOutOfBounds { offset, len });
            }
            if !rope.is_codepoint_boundary(offset) {
                return Err(EngineError::NotCharBoundary { offset });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_head_drives_rendering() {
        let sel = Selection::new(
            vec![SelectionRange::new(0, 3), SelectionRange::cursor(10)],
            1,
        );
        assert_eq!(sel.head(), Some(10));
        assert_eq!(sel.single_cursor(), None);
    }

    #[test]
    fn out_of_range_primary_is_clamped() {
        let sel = Selection::new(vec![SelectionRange::cursor(1)], 5);
        assert_eq!(sel.primary_index(), 0);
        assert_eq!(Selection::none().head(), None);
    }

    #[test]
    fn backwards_range_orders_from_to() {
        let r = SelectionRange::new(8, 2);
        assert_eq!((r.from(), r.to()), (2, 8));
        assert_eq!(r.span(), Span::new(2, 8));
    }

    #[test]
    fn validate_rejects_offsets_past_end() {
        let rope = Rope::from("abc");
        assert!(Selection::cursor(4).validate(&rope).is_err());
        assert!(Selection::cursor(3).validate(&rope).is_ok());
    }

    #[test]
    fn validate_rejects_offsets_inside_a_char() {
        let rope = Rope::from("- héllo");
        assert!(matches!(
            Selection::cursor(4).validate(&rope),
            Err(EngineError::NotCharBoundary { offset: 4 })
        ));
        assert!(matches!(
            Selection::new(vec![SelectionRange::new(3, 4)], 0).validate(&rope),
            Err(EngineError::NotCharBoundary { offset: 4 })
        ));
        assert!(Selection::cursor(5).validate(&rope).is_ok());
    }
}
