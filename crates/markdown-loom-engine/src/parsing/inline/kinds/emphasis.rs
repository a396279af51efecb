use crate::parsing::inline::types::InlineKind;

/// Paired-delimiter emphasis: `**bold**` and `__underline__`.
pub struct Emphasis;

impl Emphasis {
    pub const BOLD: &'static [u8; 2] = b"**";
    pub const UNDERLINE: &'static [u8; 2] = b"__";

    /// Delimiters in the order they are scanned.
    pub const ALL: [(InlineKind, &'static [u8; 2]); 2] = [
        (InlineKind::Bold, Self::BOLD),
        (InlineKind::Underline, Self::UNDERLINE),
    ];
}
