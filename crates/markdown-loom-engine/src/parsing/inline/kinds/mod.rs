//! # Inline Kinds
//!
//! Inline syntax owners. Delimiter constants and patterns live here, not in
//! the scanners that use them.
//!
//! - **`CodeSpan`**, **`Emphasis`**: scanned by the cursor parser
//! - **`LinkDetector`**, **`ImageDetector`**, **`MentionDetector`**,
//!   **`DateDetector`**, **`EmailDetector`**: the per-keystroke detector family
//! - **`SectionTitleDetector`**: same contract, but only run by the debounced
//!   whole-document scan

pub mod code_span;
pub mod date;
pub mod email;
pub mod emphasis;
pub mod image;
pub mod link;
pub mod mention;
pub mod section_title;

pub use code_span::CodeSpan;
pub use date::DateDetector;
pub use email::EmailDetector;
pub use emphasis::Emphasis;
pub use image::ImageDetector;
pub use link::{LinkDetector, WikiLink};
pub use mention::MentionDetector;
pub use section_title::SectionTitleDetector;
