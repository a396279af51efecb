//! Folded-heading memory.
//!
//! Line numbers shift as a page is edited, so folded headings are
//! remembered by identity instead: `"{level}:{text}#{occurrence}"`, where
//! `occurrence` counts earlier headings with the same level and text.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use relative_path::{RelativePath, RelativePathBuf};
use serde::{Deserialize, Serialize};

use crate::editing::snapshot::DocSnapshot;
use crate::parsing::blocks::{FenceTracker, kinds::Heading};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldMemory {
    #[serde(default)]
    pages: BTreeMap<RelativePathBuf, BTreeSet<String>>,
}

impl FoldMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers the heading on `line` as folded. Returns false when the
    /// line is not a heading.
    pub fn record_folded(&mut self, page: &RelativePath, snapshot: &DocSnapshot, line: usize) -> bool {
        let Some(id) = heading_id(snapshot, line) else {
            return false;
        };
        self.pages.entry(page.to_relative_path_buf()).or_default().insert(id)
    }

    pub fn record_expanded(&mut self, page: &RelativePath, snapshot: &DocSnapshot, line: usize) -> bool {
        let Some(id) = heading_id(snapshot, line) else {
            return false;
        };
        let Some(ids) = self.pages.get_mut(page) else {
            return false;
        };
        let removed = ids.remove(&id);
        if ids.is_empty() {
            self.pages.remove(page);
        }
        removed
    }

    /// Current lines of the remembered headings, in document order.
    /// Identifiers that no longer match a heading are ignored.
    pub fn folded_lines(&self, page: &RelativePath, snapshot: &DocSnapshot) -> Vec<usize> {
        let Some(ids) = self.pages.get(page) else {
            return Vec::new();
        };
        heading_ids(snapshot)
            .into_iter()
            .filter(|(_, id)| ids.contains(id))
            .map(|(line, _)| line)
            .collect()
    }

    pub fn forget_page(&mut self, page: &RelativePath) {
        self.pages.remove(page);
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Identifier of the heading on `line`, if it is one.
pub fn heading_id(snapshot: &DocSnapshot, line: usize) -> Option<String> {
    heading_ids(snapshot)
        .into_iter()
        .find(|(n, _)| *n == line)
        .map(|(_, id)| id)
}

fn heading_ids(snapshot: &DocSnapshot) -> Vec<(usize, String)> {
    let fences = FenceTracker::scan(snapshot);
    let mut seen: HashMap<(u8, String), usize> = HashMap::new();
    let mut out = Vec::new();

    for line in snapshot.lines(1, snapshot.line_count()) {
        if fences.fence_containing(line.number).is_some() {
            continue;
        }
        let Some(h) = Heading::parse(&line.text) else {
            continue;
        };
        let text = line.text[h.content.start..h.content.end].trim().to_string();
        let occurrence = seen.entry((h.level, text.clone())).or_default();
        out.push((line.number, format!("{}:{text}#{occurrence}", h.level)));
        *occurrence += 1;
    }
    out
}
