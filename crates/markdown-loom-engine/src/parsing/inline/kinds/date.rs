use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::{
    inline::{
        detect::Detector,
        types::{InlineKind, InlinePayload, InlineSpan},
    },
    rope::span::Span,
};

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

/// Detects ISO calendar dates (`2024-03-09`). Rendered dates become a date
/// widget; the host decides how to format it.
pub struct DateDetector;

impl DateDetector {
    fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }
}

impl Detector for DateDetector {
    fn detect(&self, line: &str) -> Vec<InlineSpan> {
        DATE_PATTERN
            .captures_iter(line)
            .filter_map(|caps| {
                let all = caps.get(0)?;
                let year: u16 = caps.get(1)?.as_str().parse().ok()?;
                let month: u8 = caps.get(2)?.as_str().parse().ok()?;
                let day: u8 = caps.get(3)?.as_str().parse().ok()?;
                if !(1..=12).contains(&month) || day == 0 || day > Self::days_in_month(year, month) {
                    return None;
                }
                Some(InlineSpan::bare(
                    InlineKind::Date,
                    Span::new(all.start(), all.end()),
                    InlinePayload::Date { year, month, day },
                ))
            })
            .collect()
    }
}
