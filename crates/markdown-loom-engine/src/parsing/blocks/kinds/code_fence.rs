use serde::Serialize;

use crate::parsing::rope::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

/// A line that looks like a fence delimiter (line-local byte spans).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceSig {
    pub kind: FenceKind,
    /// The backtick or tilde run.
    pub marker: Span,
    /// Info string after the marker (language name), possibly empty.
    pub info: Span,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";
    /// Fences may be indented by up to three spaces.
    pub const MAX_INDENT: usize = 3;

    pub fn sig(line: &str) -> Option<FenceSig> {
        let t = line.trim_end_matches(['\r', '\n']);
        let indent = t.len() - t.trim_start_matches(' ').len();
        if indent > Self::MAX_INDENT {
            return None;
        }
        let rest = &t[indent..];
        let (kind, ch) = if rest.starts_with(Self::BACKTICKS) {
            (FenceKind::Backticks, '`')
        } else if rest.starts_with(Self::TILDES) {
            (FenceKind::Tildes, '~')
        } else {
            return None;
        };
        let run = rest.len() - rest.trim_start_matches(ch).len();
        let marker = Span::new(indent, indent + run);
        let info_text = &t[marker.end..];
        let info_start = marker.end + (info_text.len() - info_text.trim_start().len());
        let info_end = marker.end + info_text.trim_end().len();
        Some(FenceSig {
            kind,
            marker,
            info: Span::new(info_start, info_end.max(info_start)),
        })
    }

    pub fn closes(kind: FenceKind, sig: Option<FenceSig>) -> bool {
        sig.is_some_and(|s| s.kind == kind)
    }
}
