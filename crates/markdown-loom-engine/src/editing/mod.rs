//! # Editing
//!
//! The document model and everything that changes it.
//!
//! - **`document`**: `Document`, an `xi_rope::Rope` buffer with a version,
//!   a selection and undo history
//! - **`snapshot`**: `DocSnapshot`, the immutable (id, version, rope) view
//!   every recompute reads from
//! - **`transaction`**: `Transaction` and `Change`, compiled to one xi-rope
//!   delta per edit
//! - **`selection`**: `Selection` and `SelectionRange`
//! - **`history`**: undo/redo stacks of inverse transactions
//! - **`lists`**: list structural commands
//! - **`commands`**: the `Cmd` vocabulary and `Document::execute`
//! - **`patch`**: what an applied edit changed
//!
//! Text is stored and saved byte for byte; nothing is ever regenerated
//! from a parsed model.

pub mod commands;
pub mod document;
pub mod error;
pub mod history;
pub mod lists;
pub mod patch;
pub mod selection;
pub mod snapshot;
pub mod transaction;

pub use commands::Cmd;
pub use document::Document;
pub use error::EngineError;
pub use history::History;
pub use patch::Patch;
pub use selection::{Selection, SelectionRange};
pub use snapshot::{DocSnapshot, DocumentId, Revision};
pub use transaction::{Change, Transaction};
