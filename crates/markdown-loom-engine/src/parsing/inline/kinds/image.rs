use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::{
    inline::{
        detect::Detector,
        types::{InlineKind, InlinePayload, InlineSpan},
    },
    rope::span::Span,
};

// Alt text may be empty, the source may not.
static IMAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\[\]]*)\]\(([^()\s]+)\)").unwrap());

/// Detects inline images `![alt](url)`. In rendered mode the whole
/// construct is replaced by an image widget.
pub struct ImageDetector;

impl Detector for ImageDetector {
    fn detect(&self, line: &str) -> Vec<InlineSpan> {
        IMAGE_PATTERN
            .captures_iter(line)
            .filter_map(|caps| {
                let all = caps.get(0)?;
                let alt = caps.get(1)?;
                let url = caps.get(2)?;
                Some(InlineSpan {
                    kind: InlineKind::Image,
                    full: Span::new(all.start(), all.end()),
                    markers: [
                        Span::new(all.start(), alt.start()),
                        Span::new(alt.end(), all.end()),
                    ],
                    content: Span::new(alt.start(), alt.end()),
                    payload: InlinePayload::Image {
                        alt: alt.as_str().to_string(),
                        url: url.as_str().to_string(),
                    },
                })
            })
            .collect()
    }
}
