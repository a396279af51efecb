/// A byte cursor over one line of text.
///
/// Scanners only ever look at ASCII delimiters, so stepping byte by byte is
/// safe: every span the cursor hands out starts and ends on an ASCII byte or
/// the line boundary, which are always char boundaries.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The line being scanned.
    pub s: &'a str,
    /// Current index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// The byte just before the cursor.
    pub fn prev(&self) -> Option<u8> {
        self.i
            .checked_sub(1)
            .and_then(|p| self.s.as_bytes().get(p).copied())
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s
            .as_bytes()
            .get(self.i..)
            .is_some_and(|rest| rest.starts_with(pat))
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Advances by `n` bytes, stopping at the end of the line.
    pub fn bump_n(&mut self, n: usize) {
        self.i = (self.i + n).min(self.s.len());
    }

    /// Length of the run of `b` starting at the cursor.
    pub fn run_of(&self, b: u8) -> usize {
        self.s.as_bytes()[self.i.min(self.s.len())..]
            .iter()
            .take_while(|&&c| c == b)
            .count()
    }

    /// Index of the next occurrence of `pat` at or after the cursor.
    pub fn find(&self, pat: &[u8]) -> Option<usize> {
        let rest = self.s.as_bytes().get(self.i..)?;
        if pat.is_empty() || rest.len() < pat.len() {
            return None;
        }
        rest.windows(pat.len())
            .position(|w| w == pat)
            .map(|p| self.i + p)
    }
}
