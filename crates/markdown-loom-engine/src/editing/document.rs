use std::fmt;

use xi_rope::Rope;

use crate::editing::{
    error::EngineError,
    history::{History, Step},
    patch::Patch,
    selection::Selection,
    snapshot::{DocSnapshot, DocumentId, Revision},
    transaction::Transaction,
};
use crate::parsing::rope::{line_count, line_number_at};

/// An open markdown document.
///
/// The rope is the single source of truth: text only changes through
/// [`Document::apply`], every applied transaction bumps `version`, and saving
/// writes the rope bytes back verbatim.
///
/// ```rust
/// # use markdown_loom_engine::editing::{Document, Transaction};
/// let mut doc = Document::from_text("- item");
/// let patch = doc.apply(Transaction::insert(0, "  ")).unwrap();
/// assert_eq!(doc.text(), "  - item");
/// assert_eq!(patch.version, 1);
///
/// doc.undo().unwrap();
/// assert_eq!(doc.text(), "- item");
/// ```
#[derive(Clone)]
pub struct Document {
    id: DocumentId,
    buffer: Rope,
    version: u64,
    selection: Selection,
    history: History,
}

impl Document {
    /// A new document with the caret at the end of the text.
    pub fn from_text(text: &str) -> Self {
        Self {
            id: DocumentId::new(),
            buffer: Rope::from(text),
            version: 0,
            selection: Selection::cursor(text.len()),
            history: History::default(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        Ok(Self::from_text(std::str::from_utf8(bytes)?))
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn revision(&self) -> Revision {
        Revision {
            document: self.id,
            version: self.version,
        }
    }

    pub fn snapshot(&self) -> DocSnapshot {
        DocSnapshot::new(self.id, self.version, self.buffer.clone())
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.text().into_bytes()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EngineError> {
        selection.validate(&self.buffer)?;
        self.selection = selection;
        Ok(())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Applies a transaction as one undo step.
    ///
    /// Rejected transactions leave the document untouched. A transaction
    /// without changes only moves the selection and is not recorded.
    pub fn apply(&mut self, tx: Transaction) -> Result<Patch, EngineError> {
        tx.validate(&self.buffer)
            .inspect_err(|e| log::warn!("rejected transaction on v{}: {e}", self.version))?;
        let inverse = tx.invert(&self.buffer).with_selection(self.selection.clone());
        let patch = self.commit(&tx)?;
        if patch.text_changed() {
            self.history.record(Step {
                forward: tx.with_selection(patch.new_selection.clone()),
                inverse,
            });
        }
        Ok(patch)
    }

    /// Reverts the latest step. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<Patch>, EngineError> {
        let Some(step) = self.history.pop_undo() else {
            return Ok(None);
        };
        match self.commit(&step.inverse) {
            Ok(patch) => {
                self.history.push_redo(step);
                Ok(Some(patch))
            }
            Err(e) => {
                self.history.push_undo(step);
                Err(e)
            }
        }
    }

    /// Reapplies the latest undone step. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<Option<Patch>, EngineError> {
        let Some(step) = self.history.pop_redo() else {
            return Ok(None);
        };
        match self.commit(&step.forward) {
            Ok(patch) => {
                self.history.push_undo(step);
                Ok(Some(patch))
            }
            Err(e) => {
                self.history.push_redo(step);
                Err(e)
            }
        }
    }

    fn commit(&mut self, tx: &Transaction) -> Result<Patch, EngineError> {
        tx.validate(&self.buffer)?;
        let selection = match tx.selection() {
            Some(selection) => selection.clone(),
            None => tx.map_selection(&self.selection),
        };
        let buffer = if tx.is_empty() {
            self.buffer.clone()
        } else {
            tx.to_delta(self.buffer.len()).apply(&self.buffer)
        };
        selection.validate(&buffer)?;

        if !tx.is_empty() {
            self.buffer = buffer;
            self.version += 1;
        }
        self.selection = selection.clone();

        let changed = tx.changed_ranges();
        let first_changed_line = changed
            .first()
            .map_or(line_count(&self.buffer) + 1, |r| {
                line_number_at(&self.buffer, r.start)
            });
        log::trace!(
            "applied {} change(s), now v{} from line {first_changed_line}",
            changed.len(),
            self.version
        );

        Ok(Patch {
            changed,
            first_changed_line,
            new_selection: selection,
            version: self.version,
        })
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("len", &self.buffer.len())
            .field("selection", &self.selection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{selection::SelectionRange, transaction::Change};
    use pretty_assertions::assert_eq;

    #[test]
    fn from_bytes_round_trips() {
        let text = "# Title\r\n\n- a\n- b\n\n```rust\nfn main() {}\n```\n";
        let doc = Document::from_bytes(text.as_bytes()).unwrap();
        assert_eq!(doc.to_bytes(), text.as_bytes());
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.selection(), &Selection::cursor(text.len()));
    }

    #[test]
    fn from_bytes_rejects_invalid_utf8() {
        let result = Document::from_bytes(&[0xFF, 0xFE, 0xFD]);
        assert!(matches!(result, Err(EngineError::InvalidUtf8(_))));
    }

    #[test]
    fn apply_reports_changed_lines() {
        let mut doc = Document::from_text("one\ntwo\nthree");
        let patch = doc.apply(Transaction::replace(4..7, "TWO")).unwrap();
        assert_eq!(doc.text(), "one\nTWO\nthree");
        assert_eq!(patch.changed, vec![4..7]);
        assert_eq!(patch.first_changed_line, 2);
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn multi_change_transaction_is_one_undo_step() {
        let mut doc = Document::from_text("a\nb\nc");
        let tx = Transaction::from_changes(vec![
            Change::new(0..0, "- "),
            Change::new(2..2, "- "),
            Change::new(4..4, "- "),
        ]);
        doc.apply(tx).unwrap();
        assert_eq!(doc.text(), "- a\n- b\n- c");

        doc.undo().unwrap();
        assert_eq!(doc.text(), "a\nb\nc");
        assert!(!doc.history().can_undo());

        doc.redo().unwrap();
        assert_eq!(doc.text(), "- a\n- b\n- c");
    }

    #[test]
    fn undo_restores_selection() {
        let mut doc = Document::from_text("abc");
        doc.set_selection(Selection::cursor(1)).unwrap();
        doc.apply(Transaction::insert(1, "XY")).unwrap();
        assert_eq!(doc.selection(), &Selection::cursor(3));
        doc.undo().unwrap();
        assert_eq!(doc.selection(), &Selection::cursor(1));
    }

    #[test]
    fn undo_on_empty_history_is_none() {
        let mut doc = Document::from_text("x");
        assert_eq!(doc.undo().unwrap(), None);
        assert_eq!(doc.redo().unwrap(), None);
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut doc = Document::from_text("x");
        doc.apply(Transaction::insert(1, "y")).unwrap();
        doc.undo().unwrap();
        doc.apply(Transaction::insert(0, "z")).unwrap();
        assert!(!doc.history().can_redo());
    }

    #[test]
    fn rejected_transaction_leaves_document_alone() {
        let mut doc = Document::from_text("abc");
        assert!(doc.apply(Transaction::delete(1..10)).is_err());
        assert_eq!(doc.text(), "abc");
        assert_eq!(doc.version(), 0);

        let bad_selection = Transaction::insert(0, "x")
            .with_selection(Selection::single(SelectionRange::new(0, 99)));
        assert!(doc.apply(bad_selection).is_err());
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn selection_inside_a_char_is_rejected() {
        let mut doc = Document::from_text("- héllo");
        doc.set_selection(Selection::cursor(5)).unwrap();
        assert!(matches!(
            doc.set_selection(Selection::cursor(4)),
            Err(EngineError::NotCharBoundary { offset: 4 })
        ));
        assert_eq!(doc.selection(), &Selection::cursor(5));

        let split = Transaction::insert(0, "x").with_selection(Selection::cursor(5));
        assert!(matches!(
            doc.apply(split),
            Err(EngineError::NotCharBoundary { offset: 5 })
        ));
        assert_eq!(doc.text(), "- héllo");
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn selection_only_transaction_keeps_version() {
        let mut doc = Document::from_text("abc");
        let patch = doc
            .apply(Transaction::new().with_selection(Selection::cursor(1)))
            .unwrap();
        assert!(!patch.text_changed());
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.selection().head(), Some(1));
        assert!(!doc.history().can_undo());
    }

    #[test]
    fn unicode_offsets_are_bytes() {
        let mut doc = Document::from_text("世界");
        doc.apply(Transaction::insert(3, "-")).unwrap();
        assert_eq!(doc.text(), "世-界");
    }
}
