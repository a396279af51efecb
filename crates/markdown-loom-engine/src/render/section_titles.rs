//! # Section Titles
//!
//! Standalone bold lines are numbered across the whole document ("2 of 5"),
//! which needs a full scan. That is too slow for every keystroke, so this is
//! the one detector that runs on a debounce instead of inside the update
//! cycle.
//!
//! The scanner publishes into render state it shares with its surface. A
//! surface that has been torn down revokes its [`Liveness`]; a timer that
//! fires afterwards finds the flag cleared and does nothing.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::editing::snapshot::{DocSnapshot, Revision};
use crate::parsing::blocks::FenceTracker;
use crate::parsing::inline::{Detector, kinds::SectionTitleDetector};
use crate::parsing::rope::Span;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// One standalone section-title line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionTitle {
    pub line: usize,
    /// Document offsets of the bold text, markers included.
    pub span: Span,
    /// 1-based position among all titles.
    pub ordinal: usize,
}

/// The result of one whole-document scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionTitles {
    pub revision: Revision,
    pub titles: Vec<SectionTitle>,
}

impl SectionTitles {
    pub fn total(&self) -> usize {
        self.titles.len()
    }

    /// Titles on lines in the inclusive range.
    pub fn between(&self, first: usize, last: usize) -> &[SectionTitle] {
        let lo = self.titles.partition_point(|t| t.line < first);
        let hi = self.titles.partition_point(|t| t.line <= last);
        &self.titles[lo..hi]
    }
}

/// Scans every line outside code fences for section titles.
pub fn scan_section_titles(snapshot: &DocSnapshot) -> SectionTitles {
    let fences = FenceTracker::scan(snapshot);
    let mut titles = Vec::new();

    for line in snapshot.lines(1, snapshot.line_count()) {
        if fences.fence_containing(line.number).is_some() {
            continue;
        }
        for span in SectionTitleDetector.detect(&line.text) {
            titles.push(SectionTitle {
                line: line.number,
                span: span.full.shift(line.from),
                ordinal: titles.len() + 1,
            });
        }
    }

    SectionTitles {
        revision: snapshot.revision(),
        titles,
    }
}

/// Shared flag saying the owning surface is still alive.
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Rc::new(Cell::new(true)))
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn revoke(&self) {
        self.0.set(false);
    }
}

/// Render state shared between a surface and its scanner.
pub type SharedTitles = Rc<RefCell<Option<SectionTitles>>>;

/// A restartable quiet-period timer. Time comes from the caller.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    due: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    /// Starts the timer, or restarts it if it was already running.
    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// True exactly once per schedule, when the quiet period has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }
}

pub struct SectionTitleScanner {
    debounce: Debounce,
    pending: Option<DocSnapshot>,
    liveness: Liveness,
    target: SharedTitles,
}

impl SectionTitleScanner {
    pub fn new(delay: Duration, liveness: Liveness, target: SharedTitles) -> Self {
        Self {
            debounce: Debounce::new(delay),
            pending: None,
            liveness,
            target,
        }
    }

    /// Queues a scan of `snapshot`, replacing any queued one.
    pub fn schedule(&mut self, snapshot: DocSnapshot, now: Instant) {
        self.pending = Some(snapshot);
        self.debounce.schedule(now);
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Runs the queued scan if its quiet period is over. Returns true when
    /// new titles were published.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.debounce.fire(now) {
            return false;
        }
        let Some(snapshot) = self.pending.take() else {
            return false;
        };
        if !self.liveness.is_alive() {
            log::debug!("section title scan skipped: surface torn down");
            return false;
        }

        let titles = scan_section_titles(&snapshot);
        log::debug!(
            "section titles for v{}: {} found",
            snapshot.version(),
            titles.total()
        );
        *self.target.borrow_mut() = Some(titles);
        true
    }

    pub fn cancel(&mut self) {
        self.debounce.cancel();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Document;
    use pretty_assertions::assert_eq;

    fn scanner() -> (SectionTitleScanner, Liveness, SharedTitles) {
        let liveness = Liveness::new();
        let shared = SharedTitles::default();
        let scanner = SectionTitleScanner::new(DEFAULT_DEBOUNCE, liveness.clone(), shared.clone());
        (scanner, liveness, shared)
    }

    #[test]
    fn numbers_titles_outside_fences() {
        let doc = Document::from_text("**One**\ntext\n```\n**Not**\n```\n  **Two**\n**a** b");
        let result = scan_section_titles(&doc.snapshot());
        let lines: Vec<_> = result.titles.iter().map(|t| (t.line, t.ordinal)).collect();
        assert_eq!(lines, vec![(1, 1), (6, 2)]);
        assert_eq!(result.titles[1].span, Span::new(31, 38));
        assert_eq!(result.between(2, 10).len(), 1);
    }

    #[test]
    fn debounce_fires_once_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debounce::new(Duration::from_millis(200));
        d.schedule(t0);
        assert!(!d.fire(t0 + Duration::from_millis(199)));
        d.schedule(t0 + Duration::from_millis(150));
        assert!(!d.fire(t0 + Duration::from_millis(300)));
        assert!(d.fire(t0 + Duration::from_millis(350)));
        assert!(!d.fire(t0 + Duration::from_millis(400)));
    }

    #[test]
    fn poll_publishes_when_due() {
        let (mut scanner, _live, shared) = scanner();
        let t0 = Instant::now();
        scanner.schedule(Document::from_text("**T**").snapshot(), t0);
        assert!(!scanner.poll(t0));
        assert!(shared.borrow().is_none());
        assert!(scanner.poll(t0 + DEFAULT_DEBOUNCE));
        assert_eq!(shared.borrow().as_ref().map(SectionTitles::total), Some(1));
    }

    #[test]
    fn poll_after_teardown_is_a_noop() {
        let (mut scanner, live, shared) = scanner();
        let t0 = Instant::now();
        scanner.schedule(Document::from_text("**T**").snapshot(), t0);
        live.revoke();
        assert!(!scanner.poll(t0 + DEFAULT_DEBOUNCE));
        assert!(shared.borrow().is_none());
    }
}
