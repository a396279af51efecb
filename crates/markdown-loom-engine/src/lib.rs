//! # markdown-loom-engine
//!
//! Incremental decoration and structural editing for plain-text markdown.
//! The text is never rewritten behind the user's back: everything visual is
//! a [`render::DecorationSet`] computed for the visible lines, and every
//! edit is an explicit [`editing::Transaction`].
//!
//! Most hosts only need [`EditorSurface`]:
//!
//! ```
//! use markdown_loom_engine::{Cmd, Document, EditorSurface, EngineOptions, Selection, Viewport};
//!
//! let mut surface = EditorSurface::new(
//!     Document::from_text("- [ ] task"),
//!     Viewport::new(1, 40),
//!     EngineOptions::default(),
//! );
//! surface.set_selection(Selection::cursor(8)).unwrap();
//! assert!(surface.dispatch(&Cmd::ToggleCheckbox).unwrap());
//! assert_eq!(surface.document().text(), "- [x] task");
//! ```

pub mod editing;
pub mod folding;
pub mod io;
pub mod parsing;
pub mod render;
pub mod surface;

pub use editing::{
    Change, Cmd, DocSnapshot, Document, DocumentId, EngineError, Patch, Revision, Selection,
    SelectionRange, Transaction,
};
pub use folding::{FoldEngine, FoldMemory, FoldRange};
pub use io::{IoError, list_pages, read_document, read_page, validate_notes_dir, write_document, write_page};
pub use parsing::blocks::{FenceRange, FenceTracker};
pub use render::{Decoration, DecorationKind, DecorationSet, LineStyle, MarkStyle, Viewport, Widget};
pub use surface::{Clock, EditorSurface, EngineOptions, ManualClock, SystemClock};
