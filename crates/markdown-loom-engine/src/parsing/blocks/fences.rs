//! # Code Fence Tracker
//!
//! A side table of fenced code block line ranges, keyed to the document
//! revision it was computed from. The decoration builder consults it instead
//! of rescanning from the top of the document on every keystroke, and the
//! paste heuristics use it to tell whether a position is already in code.
//!
//! Ranges are non-overlapping and ordered by start line. An unclosed fence
//! runs to the end of the document.

use serde::Serialize;

use crate::editing::snapshot::{DocSnapshot, Revision};

use super::classify::FenceContext;
use super::kinds::{CodeFence, FenceKind};

/// Lines of one fenced code block, markers included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FenceRange {
    /// Line of the opening delimiter (1-indexed).
    pub start_line: usize,
    /// Line of the closing delimiter, `None` while the fence is open.
    pub end_line: Option<usize>,
    pub kind: FenceKind,
}

impl FenceRange {
    pub fn is_open(&self) -> bool {
        self.end_line.is_none()
    }

    /// True for any line from the opener through the closer.
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && self.end_line.is_none_or(|end| line <= end)
    }

    /// True strictly between the delimiters.
    pub fn is_interior(&self, line: usize) -> bool {
        line > self.start_line && self.end_line.is_none_or(|end| line < end)
    }

    /// Last line covered, given the document's line count.
    pub fn last_line(&self, line_count: usize) -> usize {
        self.end_line.unwrap_or(line_count)
    }
}

#[derive(Debug, Default, Clone)]
pub struct FenceTracker {
    revision: Option<Revision>,
    ranges: Vec<FenceRange>,
}

impl FenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tracker for a snapshot in one go.
    pub fn scan(snapshot: &DocSnapshot) -> Self {
        let mut tracker = Self::new();
        tracker.refresh(snapshot, None);
        tracker
    }

    /// The revision these ranges describe.
    pub fn revision(&self) -> Option<Revision> {
        self.revision
    }

    pub fn ranges(&self) -> &[FenceRange] {
        &self.ranges
    }

    /// Brings the table up to date with `snapshot`. Returns false when it
    /// already was.
    ///
    /// `first_changed_line` lets the tracker keep every fence that closed
    /// before the edit and rescan only from there. Without it (or for a
    /// different document) the whole text is rescanned.
    pub fn refresh(&mut self, snapshot: &DocSnapshot, first_changed_line: Option<usize>) -> bool {
        let revision = snapshot.revision();
        if self.revision == Some(revision) {
            return false;
        }

        let same_document = self
            .revision
            .is_some_and(|r| r.document == revision.document);
        let resume_line = match first_changed_line {
            Some(changed) if same_document => {
                self.ranges
                    .retain(|r| r.end_line.is_some_and(|end| end < changed));
                self.ranges
                    .last()
                    .and_then(|r| r.end_line)
                    .map_or(1, |end| end + 1)
            }
            _ => {
                self.ranges.clear();
                1
            }
        };

        let kept = self.ranges.len();
        self.scan_from(snapshot, resume_line);
        log::debug!(
            "fence table refreshed for v{} from line {resume_line}: kept {kept}, total {}",
            revision.version,
            self.ranges.len()
        );
        self.revision = Some(revision);
        true
    }

    fn scan_from(&mut self, snapshot: &DocSnapshot, first_line: usize) {
        let rope = snapshot.rope();
        let start_offset = snapshot.line_start(first_line);
        let mut open: Option<(usize, FenceKind)> = None;

        for (i, text) in rope.lines(start_offset..rope.len()).enumerate() {
            let line = first_line + i;
            let Some(sig) = CodeFence::sig(&text) else {
                continue;
            };
            match open {
                None => open = Some((line, sig.kind)),
                Some((start_line, kind)) if CodeFence::closes(kind, Some(sig)) => {
                    self.ranges.push(FenceRange {
                        start_line,
                        end_line: Some(line),
                        kind,
                    });
                    open = None;
                }
                Some(_) => {}
            }
        }

        if let Some((start_line, kind)) = open {
            self.ranges.push(FenceRange {
                start_line,
                end_line: None,
                kind,
            });
        }
    }

    /// The fence whose lines (markers included) contain `line`.
    pub fn fence_containing(&self, line: usize) -> Option<&FenceRange> {
        let idx = self.ranges.partition_point(|r| r.start_line <= line);
        let candidate = self.ranges.get(idx.checked_sub(1)?)?;
        candidate.contains_line(line).then_some(candidate)
    }

    /// True when `line` is fence content (between the delimiters).
    pub fn is_inside(&self, line: usize) -> bool {
        self.fence_containing(line)
            .is_some_and(|r| r.is_interior(line))
    }

    /// True when a character offset falls on a fence content line.
    pub fn contains_offset(&self, snapshot: &DocSnapshot, offset: usize) -> bool {
        self.is_inside(snapshot.line_number_at(offset))
    }

    /// Fence membership to feed the line classifier. The closing line is
    /// classified from inside so it reads as a closer.
    pub fn context_for(&self, line: usize) -> FenceContext {
        match self.fence_containing(line) {
            Some(r) if line > r.start_line => FenceContext::Inside(r.kind),
            _ => FenceContext::Outside,
        }
    }

    /// Fences overlapping the inclusive line range.
    pub fn overlapping(&self, first: usize, last: usize) -> impl Iterator<Item = &FenceRange> {
        let line_count = usize::MAX;
        let skip = self
            .ranges
            .partition_point(|r| r.last_line(line_count) < first);
        self.ranges[skip..]
            .iter()
            .take_while(move |r| r.start_line <= last)
    }
}
