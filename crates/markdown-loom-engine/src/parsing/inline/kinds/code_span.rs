/// Code span inline type with owned delimiter constant.
///
/// Code spans are raw zones: no other inline construct is matched inside
/// them. The closing run must be exactly as long as the opening one.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';
}
