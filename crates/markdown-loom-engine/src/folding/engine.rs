use std::collections::HashMap;

use serde::Serialize;

use crate::editing::snapshot::{DocSnapshot, Revision};
use crate::parsing::blocks::{FenceTracker, kinds::Heading};

/// Documents longer than this get no folds at all.
pub const DEFAULT_MAX_LINES: usize = 10_000;

/// The collapsible part of a heading's section.
///
/// `from` is the end of the heading line, so the heading itself stays
/// visible; `to` is the end of `last_line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoldRange {
    pub heading_line: usize,
    pub level: u8,
    pub from: usize,
    pub to: usize,
    pub last_line: usize,
}

/// Heading-subtree fold queries, memoized per revision.
#[derive(Debug, Clone)]
pub struct FoldEngine {
    max_lines: usize,
    key: Option<Revision>,
    cache: HashMap<usize, Option<FoldRange>>,
}

impl Default for FoldEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl FoldEngine {
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines,
            key: None,
            cache: HashMap::new(),
        }
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// The fold range of the heading on `line`, or `None` when the line is
    /// not a heading, the section is empty, or the document is over the
    /// size limit.
    pub fn fold_range(
        &mut self,
        snapshot: &DocSnapshot,
        fences: &FenceTracker,
        line: usize,
    ) -> Option<FoldRange> {
        if snapshot.line_count() > self.max_lines {
            return None;
        }
        self.sync(snapshot);
        if let Some(hit) = self.cache.get(&line) {
            return *hit;
        }
        let range = compute(snapshot, fences, line);
        self.cache.insert(line, range);
        range
    }

    /// Every heading that has something to fold, in document order.
    ///
    /// One pass with a stack of open sections; fills the cache for all
    /// headings on the way.
    pub fn foldable_headings(
        &mut self,
        snapshot: &DocSnapshot,
        fences: &FenceTracker,
    ) -> Vec<FoldRange> {
        let count = snapshot.line_count();
        if count > self.max_lines {
            return Vec::new();
        }
        self.sync(snapshot);

        let mut open: Vec<(usize, u8)> = Vec::new();
        let mut closed: Vec<(usize, u8, usize)> = Vec::new();
        for (number, level) in headings(snapshot, fences, 1) {
            while let Some(&(start, lvl)) = open.last() {
                if lvl < level {
                    break;
                }
                open.pop();
                closed.push((start, lvl, number - 1));
            }
            open.push((number, level));
        }
        closed.extend(open.into_iter().map(|(start, lvl)| (start, lvl, count)));
        closed.sort_unstable();

        let mut out = Vec::new();
        for (start, level, last) in closed {
            let range = make_range(snapshot, start, level, last);
            self.cache.insert(start, range);
            out.extend(range);
        }
        out
    }

    fn sync(&mut self, snapshot: &DocSnapshot) {
        let key = snapshot.revision();
        if self.key != Some(key) {
            if !self.cache.is_empty() {
                log::debug!("fold cache cleared ({} entries)", self.cache.len());
            }
            self.cache.clear();
            self.key = Some(key);
        }
    }
}

/// Headings at or after `from_line`, skipping anything inside a fence.
fn headings<'a>(
    snapshot: &'a DocSnapshot,
    fences: &'a FenceTracker,
    from_line: usize,
) -> impl Iterator<Item = (usize, u8)> + 'a {
    snapshot
        .lines(from_line, snapshot.line_count())
        .filter(move |l| fences.fence_containing(l.number).is_none())
        .filter_map(|l| Heading::parse(&l.text).map(|h| (l.number, h.level)))
}

fn compute(snapshot: &DocSnapshot, fences: &FenceTracker, line: usize) -> Option<FoldRange> {
    if fences.fence_containing(line).is_some() {
        return None;
    }
    let level = Heading::parse(&snapshot.line(line)?.text)?.level;
    let last = headings(snapshot, fences, line + 1)
        .find(|&(_, lvl)| lvl <= level)
        .map_or(snapshot.line_count(), |(n, _)| n - 1);
    make_range(snapshot, line, level, last)
}

fn make_range(snapshot: &DocSnapshot, line: usize, level: u8, last: usize) -> Option<FoldRange> {
    if last <= line {
        return None;
    }
    Some(FoldRange {
        heading_line: line,
        level,
        from: snapshot.line(line)?.to,
        to: snapshot.line(last)?.to,
        last_line: last,
    })
}
