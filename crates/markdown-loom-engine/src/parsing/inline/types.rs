use serde::Serialize;

use crate::parsing::rope::span::Span;

/// Which inline construct a span is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum InlineKind {
    /// A code span. This is a raw zone: nothing else is matched inside.
    Code,
    Bold,
    Underline,
    /// `[text](url)`
    Link,
    /// `[[page]]` or `[[page|alias]]`
    PageLink,
    /// `@name`
    Mention,
    /// `![alt](url)`
    Image,
    /// `YYYY-MM-DD`
    Date,
    Email,
    /// A line made of nothing but one bold span.
    SectionTitle,
}

/// Extra data a widget or host needs for a construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InlinePayload {
    None,
    Url(String),
    Page(String),
    Mention(String),
    Image { alt: String, url: String },
    Date { year: u16, month: u8, day: u8 },
    Email(String),
}

/// One matched inline construct, with line-local byte spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineSpan {
    pub kind: InlineKind,
    /// The whole construct including its syntax.
    pub full: Span,
    /// Syntax hidden in rendered mode. Unused slots are empty spans.
    pub markers: [Span; 2],
    /// The text that gets styled.
    pub content: Span,
    pub payload: InlinePayload,
}

impl InlineSpan {
    /// A construct with no syntax of its own (mentions, dates, emails).
    pub fn bare(kind: InlineKind, full: Span, payload: InlinePayload) -> Self {
        let at = Span::new(full.start, full.start);
        Self {
            kind,
            full,
            markers: [at, at],
            content: full,
            payload,
        }
    }

    /// A construct wrapped by an opening and a closing marker.
    pub fn delimited(kind: InlineKind, full: Span, open: usize, close: usize) -> Self {
        Self {
            kind,
            full,
            markers: [
                Span::new(full.start, full.start + open),
                Span::new(full.end - close, full.end),
            ],
            content: Span::new(full.start + open, full.end - close),
            payload: InlinePayload::None,
        }
    }

    /// Moves every span by `base`, turning line-local spans into document
    /// offsets.
    pub fn shifted(mut self, base: usize) -> Self {
        self.full = self.full.shift(base);
        self.content = self.content.shift(base);
        self.markers = self.markers.map(|m| m.shift(base));
        self
    }

    /// Marker spans that actually cover text.
    pub fn visible_markers(&self) -> impl Iterator<Item = Span> + '_ {
        self.markers.iter().copied().filter(|m| !m.is_empty())
    }
}
