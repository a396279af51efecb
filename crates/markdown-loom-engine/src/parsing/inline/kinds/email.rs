use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::{
    inline::{
        detect::Detector,
        types::{InlineKind, InlinePayload, InlineSpan},
    },
    rope::span::Span,
};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

/// Detects bare email addresses.
pub struct EmailDetector;

impl Detector for EmailDetector {
    fn detect(&self, line: &str) -> Vec<InlineSpan> {
        EMAIL_PATTERN
            .find_iter(line)
            .map(|m| {
                InlineSpan::bare(
                    InlineKind::Email,
                    Span::new(m.start(), m.end()),
                    InlinePayload::Email(m.as_str().to_string()),
                )
            })
            .collect()
    }
}
