//! # Block Parsing
//!
//! Line-at-a-time block classification. There is no block tree: every
//! consumer (decorations, list commands, folding) asks about the lines it
//! needs and nothing else, so cost follows the visible range rather than the
//! document.
//!
//! ## Modules
//!
//! - **`kinds`**: syntax owners (`Heading`, `ListItem`, `BlockQuote`,
//!   `CodeFence`, `ThematicBreak`) with their patterns and line-local spans
//! - **`classify`**: `MarkdownLineClassifier` picks one `BlockLine` per line
//! - **`fences`**: `FenceTracker`, the revision-keyed table of code fences
//!
//! ## Key Invariants
//!
//! - Fenced code is a raw zone: nothing inside is classified except the
//!   matching closer
//! - Checkbox items are recognised before bullets

pub mod classify;
pub mod fences;
pub mod kinds;

pub use classify::{BlockLine, FenceContext, LineKind, MarkdownLineClassifier};
pub use fences::{FenceRange, FenceTracker};
