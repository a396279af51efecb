use super::kinds::{
    BlockQuote, BlockQuoteMatch, CodeFence, FenceKind, FenceSig, Heading, HeadingMatch, ListItem,
    ListItemKind, ListItemMatch, ThematicBreak,
};

/// Whether the line being classified sits inside an open code fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceContext {
    Outside,
    /// Inside a fence opened with this delimiter kind.
    Inside(FenceKind),
}

/// The block kind of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading { level: u8 },
    HorizontalRule,
    CheckboxItem { indent: usize, checked: bool },
    BulletItem { indent: usize },
    OrderedItem { indent: usize, number: u64 },
    Blockquote { indent: usize },
    FenceOpen,
    FenceClose,
    Plain,
}

/// A classified line carrying the line-local spans of its syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLine {
    Heading(HeadingMatch),
    HorizontalRule,
    ListItem(ListItemMatch),
    Blockquote(BlockQuoteMatch),
    FenceOpen(FenceSig),
    FenceClose(FenceSig),
    Plain,
}

impl BlockLine {
    pub fn kind(&self) -> LineKind {
        match self {
            BlockLine::Heading(h) => LineKind::Heading { level: h.level },
            BlockLine::HorizontalRule => LineKind::HorizontalRule,
            BlockLine::ListItem(m) => match m.kind {
                ListItemKind::Checkbox { checked } => LineKind::CheckboxItem {
                    indent: m.indent(),
                    checked,
                },
                ListItemKind::Bullet => LineKind::BulletItem { indent: m.indent() },
                ListItemKind::Ordered { number, .. } => LineKind::OrderedItem {
                    indent: m.indent(),
                    number,
                },
            },
            BlockLine::Blockquote(q) => LineKind::Blockquote { indent: q.indent() },
            BlockLine::FenceOpen(_) => LineKind::FenceOpen,
            BlockLine::FenceClose(_) => LineKind::FenceClose,
            BlockLine::Plain => LineKind::Plain,
        }
    }
}

/// Classifies single lines into block kinds using only local facts plus
/// fence membership.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    /// Classifies a line.
    ///
    /// Inside a fence only the matching closing delimiter is recognised.
    /// Outside, precedence is: fence opener, heading, horizontal rule,
    /// checkbox, bullet, ordered item, blockquote, plain. The rule is tested
    /// before bullets because `- - -` also reads as a bullet.
    pub fn classify(&self, text: &str, ctx: FenceContext) -> BlockLine {
        let sig = CodeFence::sig(text);
        if let FenceContext::Inside(kind) = ctx {
            return match sig {
                Some(s) if CodeFence::closes(kind, sig) => BlockLine::FenceClose(s),
                _ => BlockLine::Plain,
            };
        }
        if let Some(s) = sig {
            return BlockLine::FenceOpen(s);
        }
        if let Some(h) = Heading::parse(text) {
            return BlockLine::Heading(h);
        }
        if ThematicBreak::matches(text) {
            return BlockLine::HorizontalRule;
        }
        if let Some(m) = ListItem::parse(text) {
            return BlockLine::ListItem(m);
        }
        if let Some(q) = BlockQuote::parse(text) {
            return BlockLine::Blockquote(q);
        }
        BlockLine::Plain
    }

    pub fn kind(&self, text: &str, ctx: FenceContext) -> LineKind {
        self.classify(text, ctx).kind()
    }
}
