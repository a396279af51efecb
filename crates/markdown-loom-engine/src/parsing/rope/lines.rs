use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line in the rope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    /// 1-indexed line number.
    pub number: usize,
    /// Offset of the first byte of the line.
    pub from: usize,
    /// Offset just past the last content byte (line break excluded).
    pub to: usize,
    /// The line text without its line break.
    pub text: String,
}

impl LineRef {
    /// Content span of the line, excluding the line break.
    pub fn span(&self) -> Span {
        Span {
            start: self.from,
            end: self.to,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Number of lines in the rope. A trailing newline opens one more (empty)
/// line, the way an editor shows it.
pub fn line_count(rope: &Rope) -> usize {
    rope.line_of_offset(rope.len()) + 1
}

/// Looks up a 1-indexed line. Returns `None` past the last line.
pub fn line_ref(rope: &Rope, number: usize) -> Option<LineRef> {
    if number == 0 || number > line_count(rope) {
        return None;
    }
    let from = rope.offset_of_line(number - 1);
    let next = rope.offset_of_line(number).min(rope.len());
    let raw = rope.slice_to_cow(from..next);
    let text = raw.trim_end_matches('\n').trim_end_matches('\r').to_string();
    Some(LineRef {
        number,
        from,
        to: from + text.len(),
        text,
    })
}

/// Returns the 1-indexed line containing `offset` (clamped to the rope).
pub fn line_number_at(rope: &Rope, offset: usize) -> usize {
    rope.line_of_offset(offset.min(rope.len())) + 1
}

/// Returns the line containing `offset` (clamped to the rope).
pub fn line_at(rope: &Rope, offset: usize) -> LineRef {
    let number = line_number_at(rope, offset);
    line_ref(rope, number).unwrap_or(LineRef {
        number,
        from: rope.len(),
        to: rope.len(),
        text: String::new(),
    })
}

/// Returns an iterator over the inclusive 1-indexed line range, clipped to
/// the rope.
pub fn lines_between(rope: &Rope, first: usize, last: usize) -> impl Iterator<Item = LineRef> + '_ {
    let last = last.min(line_count(rope));
    (first.max(1)..=last).filter_map(move |n| line_ref(rope, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_trailing_empty_line() {
        assert_eq!(line_count(&Rope::from("a\nb")), 2);
        assert_eq!(line_count(&Rope::from("a\nb\n")), 3);
        assert_eq!(line_count(&Rope::from("")), 1);
    }

    #[test]
    fn line_ref_excludes_line_break() {
        let rope = Rope::from("# A\r\nbody\n");
        let first = line_ref(&rope, 1).unwrap();
        assert_eq!(first.text, "# A");
        assert_eq!((first.from, first.to), (0, 3));

        let second = line_ref(&rope, 2).unwrap();
        assert_eq!(second.text, "body");
        assert_eq!((second.from, second.to), (5, 9));

        let third = line_ref(&rope, 3).unwrap();
        assert_eq!(third.text, "");
        assert_eq!((third.from, third.to), (10, 10));

        assert!(line_ref(&rope, 4).is_none());
        assert!(line_ref(&rope, 0).is_none());
    }

    #[test]
    fn line_at_maps_offsets() {
        let rope = Rope::from("one\ntwo\nthree");
        assert_eq!(line_at(&rope, 0).number, 1);
        assert_eq!(line_at(&rope, 3).number, 1);
        assert_eq!(line_at(&rope, 4).number, 2);
        assert_eq!(line_at(&rope, 100).number, 3);
    }

    #[test]
    fn lines_between_clips_to_document() {
        let rope = Rope::from("a\nb\nc");
        let texts: Vec<_> = lines_between(&rope, 2, 10).map(|l| l.text).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }
}
