use crate::parsing::{
    inline::{
        detect::Detector,
        parser::parse_emphasis,
        types::{InlineKind, InlineSpan},
    },
    rope::span::Span,
};

/// Detects standalone section-title lines: lines whose trimmed text is
/// exactly one bold span, used as lightweight headings in notes.
pub struct SectionTitleDetector;

impl Detector for SectionTitleDetector {
    fn detect(&self, line: &str) -> Vec<InlineSpan> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return vec![];
        }
        let lead = line.len() - line.trim_start().len();
        let spans = parse_emphasis(trimmed);
        match spans.as_slice() {
            [bold] if bold.kind == InlineKind::Bold && bold.full == Span::new(0, trimmed.len()) => {
                let mut title = bold.clone().shifted(lead);
                title.kind = InlineKind::SectionTitle;
                vec![title]
            }
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("**Agenda**", true)]
    #[case("  **Agenda**  ", true)]
    #[case("**Agenda** today", false)]
    #[case("**a** **b**", false)]
    #[case("__Agenda__", false)]
    #[case("", false)]
    fn standalone_bold_lines(#[case] line: &str, #[case] is_title: bool) {
        assert_eq!(!SectionTitleDetector.detect(line).is_empty(), is_title);
    }

    #[test]
    fn title_spans_are_line_local() {
        let spans = SectionTitleDetector.detect("  **Plan**");
        assert_eq!(spans[0].full, Span::new(2, 10));
        assert_eq!(spans[0].content, Span::new(4, 8));
    }
}
