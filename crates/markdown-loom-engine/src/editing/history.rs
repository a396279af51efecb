use crate::editing::transaction::Transaction;

/// Steps kept on the undo stack before the oldest is dropped.
pub const HISTORY_LIMIT: usize = 500;

/// One undoable edit: the transaction as applied and the one that reverts it.
#[derive(Debug, Clone)]
pub(crate) struct Step {
    pub forward: Transaction,
    pub inverse: Transaction,
}

/// Undo and redo stacks. Every applied transaction is exactly one step.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<Step>,
    redo: Vec<Step>,
}

impl History {
    /// A fresh edit: pushes the step and forgets anything redoable.
    pub(crate) fn record(&mut self, step: Step) {
        self.undo.push(step);
        self.redo.clear();
        if self.undo.len() > HISTORY_LIMIT {
            self.undo.remove(0);
        }
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Step> {
        self.undo.pop()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Step> {
        self.redo.pop()
    }

    pub(crate) fn push_undo(&mut self, step: Step) {
        self.undo.push(step);
    }

    pub(crate) fn push_redo(&mut self, step: Step) {
        self.redo.push(step);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
