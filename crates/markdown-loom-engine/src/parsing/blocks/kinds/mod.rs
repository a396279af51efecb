//! Block-level syntax kinds. Each kind owns its delimiters and patterns;
//! the classifier only decides precedence.

pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod list_item;
pub mod thematic_break;

pub use block_quote::{BlockQuote, BlockQuoteMatch};
pub use code_fence::{CodeFence, FenceKind, FenceSig};
pub use heading::{Heading, HeadingMatch};
pub use list_item::{ListItem, ListItemKind, ListItemMatch};
pub use thematic_break::ThematicBreak;
