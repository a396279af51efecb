use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::{
    inline::{
        detect::Detector,
        types::{InlineKind, InlinePayload, InlineSpan},
    },
    rope::span::Span,
};

static MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_][A-Za-z0-9_.\-]*").unwrap());

/// Detects `@name` mentions. The `@` must start the line or follow
/// whitespace or an opening bracket, which keeps email addresses out.
pub struct MentionDetector;

impl MentionDetector {
    fn at_boundary(line: &str, at: usize) -> bool {
        match line[..at].chars().next_back() {
            None => true,
            Some(c) => c.is_whitespace() || matches!(c, '(' | '[' | '{' | '"' | '\''),
        }
    }
}

impl Detector for MentionDetector {
    fn detect(&self, line: &str) -> Vec<InlineSpan> {
        MENTION_PATTERN
            .find_iter(line)
            .filter(|m| Self::at_boundary(line, m.start()))
            .filter_map(|m| {
                // Sentence punctuation is not part of the name.
                let name = m.as_str()[1..].trim_end_matches(['.', '-']);
                if name.is_empty() {
                    return None;
                }
                let full = Span::new(m.start(), m.start() + 1 + name.len());
                Some(InlineSpan::bare(
                    InlineKind::Mention,
                    full,
                    InlinePayload::Mention(name.to_string()),
                ))
            })
            .collect()
    }
}
