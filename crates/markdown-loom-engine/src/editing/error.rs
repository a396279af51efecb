/// Errors raised when text enters the engine or a transaction is rejected.
///
/// Recompute paths (classification, decorations, folding) never fail; only
/// the edges where outside data comes in do.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("change {start}..{end} is out of bounds for a document of {len} bytes")]
    ChangeOutOfBounds { start: usize, end: usize, len: usize },
    #[error("change at {at} overlaps or precedes the previous change")]
    OverlappingChanges { at: usize },
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
    #[error("selection offset {offset} is out of bounds for a document of {len} bytes")]
    SelectionOutOfBounds { offset: usize, len: usize },
    #[error("the editor surface has been torn down")]
    TornDown,
}
