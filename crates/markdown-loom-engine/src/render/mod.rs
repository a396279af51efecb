//! # Render
//!
//! Turns a document snapshot into decorations for the host surface.
//!
//! - **`decoration`**: `Decoration`, `DecorationSet` and the builder that
//!   keeps the set ordered and free of overlapping replacements
//! - **`builder`**: `build_decorations`, the per-update recompute
//! - **`viewport`**: `Viewport` and `UpdateFlags`
//! - **`section_titles`**: the debounced whole-document sibling
//!
//! Decorations are derived state. Nothing here outlives one update cycle
//! except the latest published section titles.

pub mod builder;
pub mod decoration;
pub mod section_titles;
pub mod viewport;

pub use builder::{DecorationInput, build_decorations};
pub use decoration::{
    ConstructId, Decoration, DecorationKind, DecorationSet, LineStyle, MarkStyle, Widget,
};
pub use section_titles::{
    DEFAULT_DEBOUNCE, Debounce, Liveness, SectionTitle, SectionTitleScanner, SectionTitles,
    SharedTitles, scan_section_titles,
};
pub use viewport::{UpdateFlags, Viewport};
