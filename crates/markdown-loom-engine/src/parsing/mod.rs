//! # Parsing
//!
//! Everything the engine knows about markdown syntax.
//!
//! - **`rope`**: byte spans and line lookups over an `xi_rope::Rope`
//! - **`blocks`**: per-line classification and the code fence table
//! - **`inline`**: line-local inline scanners
//!
//! Nothing here builds a tree of the whole document. Callers classify the
//! lines they need when they need them.

pub mod blocks;
pub mod inline;
pub mod rope;
