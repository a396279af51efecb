//! End-to-end behavior through the public `EditorSurface` API.

use markdown_loom_engine::{
    Cmd, DecorationKind, Document, EditorSurface, EngineOptions, LineStyle, ManualClock,
    MarkStyle, Selection, SelectionRange, Transaction, Viewport,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

fn surface_with(text: &str, options: EngineOptions) -> EditorSurface<ManualClock> {
    EditorSurface::with_clock(
        Document::from_text(text),
        Viewport::new(1, 200),
        options,
        ManualClock::default(),
    )
}

fn surface(text: &str) -> EditorSurface<ManualClock> {
    surface_with(text, EngineOptions::default())
}

fn select_all(s: &mut EditorSurface<ManualClock>) {
    let len = s.document().len();
    s.set_selection(Selection::single(SelectionRange::new(0, len)))
        .unwrap();
}

#[rstest]
#[case("- [ ] open")]
#[case("- [x] done")]
#[case("  * [x] nested")]
#[case("- [ ]")]
fn checkbox_toggle_twice_restores_text(#[case] text: &str) {
    let mut s = surface(text);
    s.set_selection(Selection::cursor(text.len())).unwrap();
    assert!(s.dispatch(&Cmd::ToggleCheckbox).unwrap());
    assert_ne!(s.document().text(), text);
    assert!(s.dispatch(&Cmd::ToggleCheckbox).unwrap());
    assert_eq!(s.document().text(), text);
}

#[test]
fn multi_line_toggle() {
    let mut s = surface("Plain text\n- Bullet item\n- [ ] Unchecked\n- [x] Checked");
    select_all(&mut s);
    assert!(s.dispatch(&Cmd::ToggleCheckbox).unwrap());
    assert_eq!(
        s.document().text(),
        "- [ ] Plain text\n- [ ] Bullet item\n- [x] Unchecked\n- [ ] Checked"
    );
}

#[test]
fn indent_then_unindent_round_trips() {
    let original = "- a\n  - b\n- [ ] c\nplain\n1. one\n2. two";
    let mut s = surface(original);
    select_all(&mut s);
    assert!(s.dispatch(&Cmd::Indent).unwrap());
    assert_eq!(
        s.document().text(),
        "  - a\n    - b\n  - [ ] c\nplain\n  1. one\n  2. two"
    );
    assert!(s.dispatch(&Cmd::Unindent).unwrap());
    assert_eq!(s.document().text(), original);
}

#[test]
fn renumber_after_deleting_middle_item() {
    let mut s = surface("1. A\n2. B\n3. C");
    s.apply(Transaction::delete(5..10)).unwrap();
    assert_eq!(s.document().text(), "1. A\n3. C");
    assert!(s.dispatch(&Cmd::Renumber { line: 1 }).unwrap());
    assert_eq!(s.document().text(), "1. A\n2. C");
    assert!(!s.dispatch(&Cmd::Renumber { line: 1 }).unwrap());
}

#[test]
fn structural_command_is_one_undo_step() {
    let mut s = surface("Plain text\n- [ ] a\n- b");
    select_all(&mut s);
    s.dispatch(&Cmd::ToggleCheckbox).unwrap();
    assert!(s.dispatch(&Cmd::Undo).unwrap());
    assert_eq!(s.document().text(), "Plain text\n- [ ] a\n- b");
    assert!(!s.dispatch(&Cmd::Undo).unwrap());
    assert!(s.dispatch(&Cmd::Redo).unwrap());
    assert_eq!(s.document().text(), "- [ ] Plain text\n- [x] a\n- [ ] b");
}

#[test]
fn enter_continues_and_exits_lists() {
    let mut s = surface("1. one\n2. two");
    s.set_selection(Selection::cursor(6)).unwrap();
    assert!(s.dispatch(&Cmd::ContinueMarkup).unwrap());
    assert_eq!(s.document().text(), "1. one\n2. \n3. two");

    assert!(s.dispatch(&Cmd::ContinueMarkup).unwrap());
    assert_eq!(s.document().text(), "1. one\n\n3. two");
}

#[test]
fn replace_ranges_never_overlap_at_any_cursor() {
    let text = fixture("journal");
    let mut s = surface(&text);
    for at in (0..=text.len()).filter(|&i| text.is_char_boundary(i)) {
        s.set_selection(Selection::cursor(at)).unwrap();
        assert!(s.decorations().is_consistent(), "cursor at {at}");
    }
}

#[test]
fn caret_flips_construct_and_back() {
    let text = "see **bold** here";
    let mut s = surface(text);
    let bold_hidden = |s: &EditorSurface<ManualClock>| {
        s.decorations()
            .iter()
            .filter(|d| d.kind == DecorationKind::Hide)
            .count()
    };

    s.set_selection(Selection::cursor(0)).unwrap();
    assert_eq!(bold_hidden(&s), 2);
    s.set_selection(Selection::cursor(6)).unwrap();
    assert_eq!(bold_hidden(&s), 0);
    s.set_selection(Selection::cursor(text.len())).unwrap();
    assert_eq!(bold_hidden(&s), 2);
}

#[test]
fn nothing_decorated_inside_open_fence() {
    let text = "# Title\n```\n# h\n- [ ] x **b** @m 2024-01-01\n> q";
    let fence_body_start = text.find("# h").unwrap();
    let mut s = surface(text);
    s.set_selection(Selection::cursor(0)).unwrap();

    for d in s.decorations() {
        if d.from >= fence_body_start {
            assert_eq!(d.kind, DecorationKind::Line(LineStyle::FenceBody), "{d:?}");
        }
    }
    assert!(s.is_inside_code(fence_body_start + 1));
    assert!(!s.is_inside_code(2));
}

#[test]
fn fixture_fences_reported_to_collaborators() {
    let s = surface(&fixture("journal"));
    let fences: Vec<_> = s
        .fence_ranges()
        .iter()
        .map(|f| (f.start_line, f.end_line))
        .collect();
    assert_eq!(fences, vec![(24, Some(27)), (35, None)]);
    assert!(
        !s.decorations()
            .iter()
            .any(|d| d.kind == DecorationKind::Line(LineStyle::Heading { level: 1 }) && d.from > 10)
    );
}

#[test]
fn fold_boundaries() {
    let mut s = surface("# A\nx\n# B");
    assert_eq!(s.fold_range(1).map(|r| (r.from, r.to)), Some((3, 5)));

    let text = "# A\n## B\nx\n## C";
    let mut s = surface(text);
    assert_eq!(s.fold_range(1).map(|r| r.to), Some(text.len()));

    let mut s = surface("# A\n# B");
    assert_eq!(s.fold_range(1), None);
}

#[test]
fn fold_limit_boundary() {
    let options = EngineOptions {
        fold_line_limit: 100,
        ..EngineOptions::default()
    };
    let at_limit = format!("# A{}", "\nline".repeat(99));
    let mut s = surface_with(&at_limit, options);
    assert!(s.fold_range(1).is_some());

    s.apply(Transaction::insert(at_limit.len(), "\nextra"))
        .unwrap();
    for line in 1..=101 {
        assert_eq!(s.fold_range(line), None);
    }
}

#[test]
fn checked_items_are_styled_done() {
    let s = surface("- [x] shipped");
    let done: Vec<_> = s
        .decorations()
        .iter()
        .filter(|d| d.kind == DecorationKind::Mark(MarkStyle::Done))
        .map(|d| (d.from, d.to))
        .collect();
    assert_eq!(done, vec![(6, 13)]);
}
