//! # Inline Parsing
//!
//! Stateless, line-local inline scanners.
//!
//! ## Architecture
//!
//! - A byte cursor parser handles paired delimiters: code spans, `**bold**`
//!   and `__underline__`
//! - A family of `Detector`s handles everything else (links, page links,
//!   images, mentions, dates, emails), each with the same
//!   `detect(line) -> spans` contract
//! - `scan_line` merges both and applies raw-zone precedence
//!
//! ## Modules
//!
//! - **`types`**: `InlineSpan`, `InlineKind`, `InlinePayload`
//! - **`kinds`**: syntax owners and detector implementations
//! - **`cursor`**: byte `Cursor` for delimiter scanning
//! - **`parser`**: code span and emphasis scanning
//! - **`detect`**: the `Detector` trait, the per-keystroke registry and
//!   `scan_line`
//!
//! ## Raw Zone Precedence
//!
//! Code spans win: `` `**x** @y` `` is one code span and nothing else.

pub mod cursor;
pub mod detect;
pub mod kinds;
pub mod parser;
pub mod types;

pub use detect::{Detector, LINE_DETECTORS, scan_line};
pub use parser::{parse_code_spans, parse_emphasis};
pub use types::{InlineKind, InlinePayload, InlineSpan};
