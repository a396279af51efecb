use std::ops::Range;

use crate::editing::selection::Selection;

/// Result of applying a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Inserted ranges in the new text. Deletions show up as empty ranges.
    pub changed: Vec<Range<usize>>,
    /// Line of the first change in the new text, or one past the last line
    /// when only the selection moved.
    pub first_changed_line: usize,
    pub new_selection: Selection,
    pub version: u64,
}

impl Patch {
    pub fn text_changed(&self) -> bool {
        !self.changed.is_empty()
    }
}
