//! # Folding
//!
//! - **`engine`**: `FoldEngine`, heading-subtree ranges cached per revision
//!   and switched off above a line limit
//! - **`memory`**: `FoldMemory`, which headings a user folded on which page

pub mod engine;
pub mod memory;

pub use engine::{DEFAULT_MAX_LINES, FoldEngine, FoldRange};
pub use memory::{FoldMemory, heading_id};
