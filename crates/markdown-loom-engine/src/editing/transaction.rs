use std::ops::Range;

use xi_rope::{Delta, Rope, RopeInfo, delta::Builder};

use crate::editing::{error::EngineError, selection::Selection};

/// Replace `range` of the pre-transaction text with `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub range: Range<usize>,
    pub insert: String,
}

impl Change {
    pub fn new(range: Range<usize>, insert: impl Into<String>) -> Self {
        Self {
            range,
            insert: insert.into(),
        }
    }

    fn is_noop(&self) -> bool {
        self.range.is_empty() && self.insert.is_empty()
    }
}

/// One atomic edit: a set of changes against the same text, plus the
/// selection to leave behind.
///
/// Changes are sorted and non-overlapping, expressed in offsets of the text
/// before the transaction. A transaction is one undo step however many
/// changes it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    changes: Vec<Change>,
    selection: Option<Selection>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self::from_changes(vec![Change::new(range, text)])
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self::replace(range, "")
    }

    pub fn from_changes(changes: Vec<Change>) -> Self {
        Self {
            changes: changes.into_iter().filter(|c| !c.is_noop()).collect(),
            selection: None,
        }
    }

    /// Sets the selection explicitly instead of mapping the old one.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// True when no text changes (the selection may still move).
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Maps an offset in the old text to the new text.
    ///
    /// A position at an insertion point ends up after the inserted text; a
    /// position inside a replaced range lands at the end of its replacement.
    pub fn map_offset(&self, pos: usize) -> usize {
        let (mut added, mut removed) = (0, 0);
        for change in &self.changes {
            if pos < change.range.start {
                break;
            }
            if pos >= change.range.end {
                added += change.insert.len();
                removed += change.range.len();
                continue;
            }
            return change.range.start + added - removed + change.insert.len();
        }
        pos + added - removed
    }

    pub fn map_selection(&self, selection: &Selection) -> Selection {
        selection.map(|o| self.map_offset(o))
    }

    /// Length of the text after applying this transaction to `len` bytes.
    pub fn new_len(&self, len: usize) -> usize {
        self.changes
            .iter()
            .fold(len, |acc, c| acc + c.insert.len() - c.range.len())
    }

    /// Where each change's inserted text sits in the new text.
    pub fn changed_ranges(&self) -> Vec<Range<usize>> {
        let mut shift: isize = 0;
        self.changes
            .iter()
            .map(|c| {
                let start = c.range.start.saturating_add_signed(shift);
                shift += c.insert.len() as isize - c.range.len() as isize;
                start..start + c.insert.len()
            })
            .collect()
    }

    pub(crate) fn validate(&self, rope: &Rope) -> Result<(), EngineError> {
        let len = rope.len();
        let mut last_end = 0;
        for change in &self.changes {
            let Range { start, end } = change.range;
            if start > end || end > len {
                return Err(EngineError::ChangeOutOfBounds { start, end, len });
            }
            if start < last_end {
                return Err(EngineError::OverlappingChanges { at: start });
            }
            for offset in [start, end] {
                if !rope.is_codepoint_boundary(offset) {
                    return Err(EngineError::NotCharBoundary { offset });
                }
            }
            last_end = end;
        }
        Ok(())
    }

    /// The transaction that restores `rope` after this one has been applied
    /// to it. Must be called on a validated transaction, before applying.
    pub(crate) fn invert(&self, rope: &Rope) -> Transaction {
        let changes = self
            .changed_ranges()
            .into_iter()
            .zip(&self.changes)
            .map(|(new_range, c)| Change::new(new_range, rope.slice_to_cow(c.range.clone())))
            .collect();
        Transaction {
            changes,
            selection: None,
        }
    }

    pub(crate) fn to_delta(&self, len: usize) -> Delta<RopeInfo> {
        let mut builder = Builder::new(len);
        for change in &self.changes {
            builder.replace(change.range.clone(), Rope::from(change.insert.as_str()));
        }
        builder.build()
    }
}
