use super::{
    kinds::{DateDetector, EmailDetector, ImageDetector, LinkDetector, MentionDetector},
    parser::parse_emphasis,
    types::{InlineKind, InlineSpan},
};

/// A single-purpose inline scanner.
///
/// Every detector takes one line of text and returns line-local spans. The
/// decoration builder handles all of them the same way (raw when the caret
/// touches the span, rendered otherwise), so adding a detector never means
/// touching the builder.
pub trait Detector: Sync {
    fn detect(&self, line: &str) -> Vec<InlineSpan>;
}

/// Detectors run on every visible line on every update.
pub static LINE_DETECTORS: [&dyn Detector; 5] = [
    &LinkDetector,
    &ImageDetector,
    &MentionDetector,
    &DateDetector,
    &EmailDetector,
];

/// Runs the emphasis parser and every line detector over one line.
///
/// Code spans are raw zones: any other span that intersects one is dropped.
/// Spans come back line-local, ordered by start offset then kind.
pub fn scan_line(line: &str) -> Vec<InlineSpan> {
    let mut spans = parse_emphasis(line);
    let zones: Vec<_> = spans
        .iter()
        .filter(|s| s.kind == InlineKind::Code)
        .map(|s| s.full)
        .collect();

    for detector in LINE_DETECTORS {
        spans.extend(
            detector
                .detect(line)
                .into_iter()
                .filter(|s| !zones.iter().any(|z| z.overlaps(s.full))),
        );
    }

    spans.sort_by_key(|s| (s.full.start, s.kind));
    spans
}
