//! # Editor Surface
//!
//! The host-facing side of the engine. A host owns one `EditorSurface` per
//! open page, feeds it edits, selection and viewport changes, and reads
//! back decorations, fold ranges and fence ranges.
//!
//! Every state change runs one synchronous update cycle:
//!
//! 1. on a document change, refresh the fence table from the first changed
//!    line and restart the section-title debounce
//! 2. rebuild the decoration set for the viewport
//!
//! The host also calls [`EditorSurface::poll_timers`] from its event loop
//! so the debounced section-title scan can run. After
//! [`EditorSurface::teardown`] edits and selection changes are refused with
//! [`EngineError::TornDown`], and every other entry point is a no-op.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::editing::{Cmd, DocSnapshot, Document, EngineError, Patch, Selection, Transaction};
use crate::folding::{DEFAULT_MAX_LINES, FoldEngine, FoldRange};
use crate::parsing::blocks::{FenceRange, FenceTracker};
use crate::render::{
    DEFAULT_DEBOUNCE, DecorationInput, DecorationSet, Liveness, SectionTitleScanner,
    SectionTitles, SharedTitles, UpdateFlags, Viewport, build_decorations,
};

/// Tunables the host passes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Documents longer than this have no folds.
    pub fold_line_limit: usize,
    /// Quiet period before the section-title scan.
    pub section_title_debounce: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            fold_line_limit: DEFAULT_MAX_LINES,
            section_title_debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Where the surface gets the time from.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock(Rc<Cell<Instant>>);

impl Default for ManualClock {
    fn default() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

pub struct EditorSurface<C: Clock = SystemClock> {
    doc: Document,
    viewport: Viewport,
    fences: FenceTracker,
    folds: FoldEngine,
    titles: SharedTitles,
    scanner: SectionTitleScanner,
    liveness: Liveness,
    decorations: DecorationSet,
    /// Earliest line touched since the fence table was last refreshed.
    changed_from: Option<usize>,
    clock: C,
}

impl EditorSurface<SystemClock> {
    pub fn new(doc: Document, viewport: Viewport, options: EngineOptions) -> Self {
        Self::with_clock(doc, viewport, options, SystemClock)
    }
}

impl<C: Clock> EditorSurface<C> {
    pub fn with_clock(doc: Document, viewport: Viewport, options: EngineOptions, clock: C) -> Self {
        let liveness = Liveness::new();
        let titles = SharedTitles::default();
        let scanner =
            SectionTitleScanner::new(options.section_title_debounce, liveness.clone(), titles.clone());
        let mut surface = Self {
            doc,
            viewport,
            fences: FenceTracker::new(),
            folds: FoldEngine::new(options.fold_line_limit),
            titles,
            scanner,
            liveness,
            decorations: DecorationSet::default(),
            changed_from: None,
            clock,
        };
        surface.update(UpdateFlags::DOC);
        surface
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn snapshot(&self) -> DocSnapshot {
        self.doc.snapshot()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    /// The most recently published section titles.
    pub fn section_titles(&self) -> Option<SectionTitles> {
        self.titles.borrow().clone()
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn is_live(&self) -> bool {
        self.liveness.is_alive()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if !self.is_live() || viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.update(UpdateFlags::VIEWPORT);
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EngineError> {
        self.ensure_live()?;
        self.doc.set_selection(selection)?;
        self.update(UpdateFlags::SELECTION);
        Ok(())
    }

    pub fn apply(&mut self, tx: Transaction) -> Result<Patch, EngineError> {
        self.ensure_live()?;
        let patch = self.doc.apply(tx)?;
        self.absorb(&patch);
        Ok(patch)
    }

    /// Runs a host command. `Ok(false)` means not handled, so the host
    /// should fall back to its default behavior for the key.
    pub fn dispatch(&mut self, cmd: &Cmd) -> Result<bool, EngineError> {
        if !self.is_live() {
            return Ok(false);
        }
        match self.doc.execute(cmd)? {
            Some(patch) => {
                self.absorb(&patch);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn ensure_live(&self) -> Result<(), EngineError> {
        if self.is_live() {
            Ok(())
        } else {
            Err(EngineError::TornDown)
        }
    }

    fn absorb(&mut self, patch: &Patch) {
        if patch.text_changed() {
            let line = patch.first_changed_line;
            self.changed_from = Some(self.changed_from.map_or(line, |l| l.min(line)));
            self.update(UpdateFlags::DOC.union(UpdateFlags::SELECTION));
        } else {
            self.update(UpdateFlags::SELECTION);
        }
    }

    /// Runs one update cycle.
    pub fn update(&mut self, flags: UpdateFlags) {
        if !self.is_live() || !flags.needs_recompute() {
            return;
        }
        let snapshot = self.doc.snapshot();
        if flags.doc_changed {
            self.fences.refresh(&snapshot, self.changed_from.take());
            self.scanner.schedule(snapshot.clone(), self.clock.now());
        }
        self.recompute(&snapshot);
        log::debug!(
            "update {flags:?}: {} decorations for lines {}..={}",
            self.decorations.len(),
            self.viewport.first_line,
            self.viewport.last_line
        );
    }

    /// Runs the section-title scan if its quiet period is over. Returns
    /// true when decorations changed as a result.
    pub fn poll_timers(&mut self) -> bool {
        if !self.scanner.poll(self.clock.now()) {
            return false;
        }
        let snapshot = self.doc.snapshot();
        self.recompute(&snapshot);
        true
    }

    pub fn has_pending_timers(&self) -> bool {
        self.is_live() && self.scanner.is_pending()
    }

    fn recompute(&mut self, snapshot: &DocSnapshot) {
        let titles = self.titles.borrow();
        self.decorations = build_decorations(&DecorationInput {
            snapshot,
            viewport: self.viewport,
            selection: self.doc.selection(),
            fences: &self.fences,
            section_titles: titles.as_ref(),
        });
    }

    pub fn fold_range(&mut self, line: usize) -> Option<FoldRange> {
        let snapshot = self.doc.snapshot();
        self.folds.fold_range(&snapshot, &self.fences, line)
    }

    pub fn foldable_headings(&mut self) -> Vec<FoldRange> {
        let snapshot = self.doc.snapshot();
        self.folds.foldable_headings(&snapshot, &self.fences)
    }

    /// Current fenced code blocks, for paste handling and similar
    /// collaborators.
    pub fn fence_ranges(&self) -> &[FenceRange] {
        self.fences.ranges()
    }

    pub fn is_inside_code(&self, offset: usize) -> bool {
        self.fences.contains_offset(&self.doc.snapshot(), offset)
    }

    /// Detaches the surface. Pending timers that fire later change nothing.
    pub fn teardown(&mut self) {
        self.liveness.revoke();
        log::debug!("surface for {} torn down", self.doc.id());
    }

    /// Hands the document back to the host.
    pub fn into_document(mut self) -> Document {
        self.teardown();
        self.doc
    }
}
