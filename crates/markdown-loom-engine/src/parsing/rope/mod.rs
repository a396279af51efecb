pub mod lines;
pub mod slice;
pub mod span;

pub use lines::{LineRef, line_at, line_count, line_number_at, line_ref, lines_between};
pub use slice::slice_to_string;
pub use span::Span;
