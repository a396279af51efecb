use xi_rope::Rope;

use super::span::Span;

/// Extracts the text for a span from the rope as an owned String.
///
/// Spans past the end of the rope are clamped rather than panicking, since a
/// host may hand us a stale range right after an edit.
pub fn slice_to_string(rope: &Rope, sp: Span) -> String {
    let len = rope.len();
    let start = sp.start.min(len);
    let end = sp.end.min(len).max(start);
    rope.slice_to_cow(start..end).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_clamps_past_end() {
        let rope = Rope::from("hello");
        assert_eq!(slice_to_string(&rope, Span::new(3, 40)), "lo");
        assert_eq!(slice_to_string(&rope, Span::new(40, 50)), "");
    }

    #[test]
    fn slice_multibyte_text() {
        let rope = Rope::from("héllo");
        assert_eq!(slice_to_string(&rope, Span::new(0, 3)), "hé");
    }
}
