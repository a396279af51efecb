use std::ops::Range;

use crate::editing::{
    document::Document,
    error::EngineError,
    lists,
    patch::Patch,
    selection::Selection,
    snapshot::DocSnapshot,
    transaction::Transaction,
};

/// Edits a host can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Tab on list items.
    Indent,
    /// Shift-Tab on list items.
    Unindent,
    ToggleCheckbox,
    /// A click on a checkbox widget.
    ToggleCheckboxAt { line: usize },
    Renumber { line: usize },
    /// Enter inside a list item or blockquote.
    ContinueMarkup,
    Undo,
    Redo,
    /// Plain typing, deleting and pasting.
    Replace { range: Range<usize>, text: String },
}

impl Cmd {
    /// Compiles the command into a transaction against `snapshot`.
    ///
    /// `None` means the command does not apply here. Undo and redo replay
    /// history rather than compiling and always return `None`.
    pub fn compile(&self, snapshot: &DocSnapshot, selection: &Selection) -> Option<Transaction> {
        match self {
            Cmd::Indent => lists::indent(snapshot, selection),
            Cmd::Unindent => lists::unindent(snapshot, selection),
            Cmd::ToggleCheckbox => lists::toggle_checkbox(snapshot, selection),
            Cmd::ToggleCheckboxAt { line } => lists::toggle_checkbox_line(snapshot, *line),
            Cmd::Renumber { line } => lists::renumber_at(snapshot, *line),
            Cmd::ContinueMarkup => lists::continue_markup(snapshot, selection),
            Cmd::Replace { range, text } => Some(Transaction::replace(range.clone(), text.as_str())),
            Cmd::Undo | Cmd::Redo => None,
        }
    }
}

impl Document {
    /// Runs a command as one atomic step. `Ok(None)` means not handled.
    pub fn execute(&mut self, cmd: &Cmd) -> Result<Option<Patch>, EngineError> {
        match cmd {
            Cmd::Undo => self.undo(),
            Cmd::Redo => self.redo(),
            _ => match cmd.compile(&self.snapshot(), self.selection()) {
                Some(tx) => self.apply(tx).map(Some),
                None => Ok(None),
            },
        }
    }
}
