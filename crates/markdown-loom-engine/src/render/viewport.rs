use serde::Serialize;

/// The contiguous, inclusive, 1-indexed line range currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Viewport {
    pub first_line: usize,
    pub last_line: usize,
}

impl Viewport {
    pub fn new(first_line: usize, last_line: usize) -> Self {
        let first_line = first_line.max(1);
        Self {
            first_line,
            last_line: last_line.max(first_line),
        }
    }

    /// A viewport `height` lines tall starting at `first_line`.
    pub fn from_top(first_line: usize, height: usize) -> Self {
        let first_line = first_line.max(1);
        Self::new(first_line, first_line + height.saturating_sub(1))
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.first_line && line <= self.last_line
    }

    /// The viewport cut to a document of `line_count` lines.
    pub fn clamp(&self, line_count: usize) -> Self {
        let last = self.last_line.min(line_count.max(1));
        Self::new(self.first_line.min(last), last)
    }

    pub fn height(&self) -> usize {
        self.last_line - self.first_line + 1
    }
}

/// What changed since the last update cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateFlags {
    pub doc_changed: bool,
    pub viewport_changed: bool,
    pub selection_changed: bool,
}

impl UpdateFlags {
    pub const DOC: Self = Self {
        doc_changed: true,
        viewport_changed: false,
        selection_changed: false,
    };
    pub const VIEWPORT: Self = Self {
        doc_changed: false,
        viewport_changed: true,
        selection_changed: false,
    };
    pub const SELECTION: Self = Self {
        doc_changed: false,
        viewport_changed: false,
        selection_changed: true,
    };

    pub fn union(self, other: Self) -> Self {
        Self {
            doc_changed: self.doc_changed || other.doc_changed,
            viewport_changed: self.viewport_changed || other.viewport_changed,
            selection_changed: self.selection_changed || other.selection_changed,
        }
    }

    /// Any of the three triggers a recompute. Selection-only changes are
    /// never skipped.
    pub fn needs_recompute(&self) -> bool {
        self.doc_changed || self.viewport_changed || self.selection_changed
    }
}
