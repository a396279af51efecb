use std::sync::LazyLock;

use regex::Regex;

// Three or more of the same rule character, whitespace allowed around and
// between them. The regex crate has no backreferences, hence one arm each.
static RULE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,})$").unwrap());

/// Horizontal rule (`---`, `***`, `___`).
pub struct ThematicBreak;

impl ThematicBreak {
    pub fn matches(line: &str) -> bool {
        RULE_PATTERN.is_match(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("---", true)]
    #[case("***", true)]
    #[case("___", true)]
    #[case("  - - -  ", true)]
    #[case("-----", true)]
    #[case("--", false)]
    #[case("-*-", false)]
    #[case("--- text", false)]
    fn rule_detection(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(ThematicBreak::matches(line), expected);
    }
}
