//! Immutable views of a document at one revision.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;
use xi_rope::Rope;

use crate::parsing::rope::{self, LineRef, Span};

/// Identity of one open document. A new id means every cache keyed on the
/// old one is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A document identity plus the version of its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Revision {
    pub document: DocumentId,
    pub version: u64,
}

/// The text of a document at one revision.
///
/// Cloning is cheap: the rope is shared.
#[derive(Clone)]
pub struct DocSnapshot {
    id: DocumentId,
    version: u64,
    rope: Rope,
}

impl fmt::Debug for DocSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocSnapshot")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("len", &self.rope.len())
            .finish()
    }
}

impl DocSnapshot {
    pub(crate) fn new(id: DocumentId, version: u64, rope: Rope) -> Self {
        Self { id, version, rope }
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

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    pub fn line_count(&self) -> usize {
        rope::line_count(&self.rope)
    }

    /// 1-indexed line lookup.
    pub fn line(&self, number: usize) -> Option<LineRef> {
        rope::line_ref(&self.rope, number)
    }

    /// Offset of the first byte of `line`. Past the end this is the length
    /// of the document.
    pub fn line_start(&self, line: usize) -> usize {
        self.rope
            .offset_of_line(line.saturating_sub(1).min(self.line_count()))
    }

    pub fn line_number_at(&self, offset: usize) -> usize {
        rope::line_number_at(&self.rope, offset)
    }

    pub fn line_at(&self, offset: usize) -> LineRef {
        rope::line_at(&self.rope, offset)
    }

    /// Lines in the inclusive range, clipped to the document.
    pub fn lines(&self, first: usize, last: usize) -> impl Iterator<Item = LineRef> + '_ {
        rope::lines_between(&self.rope, first, last)
    }

    pub fn slice(&self, span: Span) -> String {
        rope::slice_to_string(&self.rope, span)
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }
}
