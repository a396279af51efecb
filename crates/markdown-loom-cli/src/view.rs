//! Turns engine decorations into ratatui lines. One document line is one
//! terminal row; hidden text is skipped and widgets are drawn as glyphs.

use markdown_loom_engine::{
    Decoration, DecorationKind, DecorationSet, FoldRange, LineStyle, MarkStyle, Widget,
    parsing::rope::LineRef,
};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Which document lines fill `height` rows starting at `first`, skipping
/// the bodies of folded sections.
pub fn display_lines(line_count: usize, first: usize, height: usize, folded: &[FoldRange]) -> Vec<usize> {
    (first.max(1)..=line_count)
        .filter(|&n| !is_folded_away(n, folded))
        .take(height)
        .collect()
}

pub fn is_folded_away(line: usize, folded: &[FoldRange]) -> bool {
    folded
        .iter()
        .any(|f| line > f.heading_line && line <= f.last_line)
}

/// A rendered row and the column the caret sits in, if it is on this line.
pub struct Row {
    pub line: Line<'static>,
    pub caret_col: Option<u16>,
}

pub fn render_line(line: &LineRef, decorations: &DecorationSet, caret: Option<usize>, folded: bool) -> Row {
    let here = decorations.starting_between(line.from, line.to);

    let mut base = Style::default();
    let mut prefix = String::new();
    let mut suffix = String::new();
    for d in here {
        if let DecorationKind::Line(style) = d.kind {
            line_style(style, &mut base, &mut prefix, &mut suffix);
        }
    }
    if folded {
        suffix.push_str(" ⋯");
    }

    let mut out = Vec::new();
    let mut col = prefix.chars().count();
    if !prefix.is_empty() {
        out.push(Span::styled(prefix, base.fg(Color::DarkGray)));
    }

    let mut caret_col = None;
    let mut run = String::new();
    let mut run_style = base;
    for (i, ch) in line.text.char_indices() {
        let at = line.from + i;
        if caret == Some(at) {
            caret_col = Some(col);
        }
        if let Some(skip) = here.iter().find(|d| d.kind.is_replacing() && at >= d.from && at < d.to) {
            if let (true, DecorationKind::Replace(widget)) = (at == skip.from, &skip.kind) {
                flush(&mut out, &mut run, run_style);
                let glyph = glyph(widget);
                col += glyph.chars().count();
                out.push(Span::styled(glyph, widget_style(widget)));
            }
            continue;
        }
        let style = marks_at(here, at).fold(base, |s, m| s.patch(mark_style(m)));
        if style != run_style {
            flush(&mut out, &mut run, run_style);
            run_style = style;
        }
        run.push(ch);
        col += 1;
    }
    if caret == Some(line.to) {
        caret_col = Some(col);
    }
    flush(&mut out, &mut run, run_style);
    if !suffix.is_empty() {
        out.push(Span::styled(suffix, Style::default().fg(Color::DarkGray)));
    }

    Row {
        line: Line::from(out),
        caret_col: caret_col.map(|c| u16::try_from(c).unwrap_or(u16::MAX)),
    }
}

fn flush(out: &mut Vec<Span<'static>>, run: &mut String, style: Style) {
    if !run.is_empty() {
        out.push(Span::styled(std::mem::take(run), style));
    }
}

fn marks_at(here: &[Decoration], at: usize) -> impl Iterator<Item = MarkStyle> + '_ {
    here.iter().filter_map(move |d| match d.kind {
        DecorationKind::Mark(m) if at >= d.from && at < d.to => Some(m),
        _ => None,
    })
}

fn line_style(style: LineStyle, base: &mut Style, prefix: &mut String, suffix: &mut String) {
    match style {
        LineStyle::Heading { level } => {
            let color = match level {
                1 => Color::Magenta,
                2 => Color::LightMagenta,
                _ => Color::LightBlue,
            };
            *base = base.fg(color).add_modifier(Modifier::BOLD);
        }
        LineStyle::Blockquote { depth } => {
            prefix.push_str(&"│ ".repeat(usize::from(depth)));
            *base = base.add_modifier(Modifier::ITALIC);
        }
        LineStyle::FenceMarker => *base = base.fg(Color::DarkGray),
        LineStyle::FenceBody => *base = base.fg(Color::Green),
        LineStyle::SectionTitle { ordinal, total } => {
            *base = base.add_modifier(Modifier::UNDERLINED);
            suffix.push_str(&format!("  ({ordinal}/{total})"));
        }
        LineStyle::HorizontalRule | LineStyle::ListItem { .. } => {}
    }
}

fn mark_style(mark: MarkStyle) -> Style {
    let style = Style::default();
    match mark {
        MarkStyle::RawSyntax => style.fg(Color::DarkGray),
        MarkStyle::Code => style.fg(Color::Yellow),
        MarkStyle::Bold => style.add_modifier(Modifier::BOLD),
        MarkStyle::Underline => style.add_modifier(Modifier::UNDERLINED),
        MarkStyle::Link => style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        MarkStyle::PageLink => style.fg(Color::Cyan),
        MarkStyle::Mention => style.fg(Color::LightMagenta),
        MarkStyle::Email => style.fg(Color::Blue),
        MarkStyle::ListNumber => style.fg(Color::LightBlue),
        MarkStyle::FenceInfo => style.fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        MarkStyle::Done => style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
    }
}

fn glyph(widget: &Widget) -> String {
    match widget {
        Widget::Bullet { indent } if indent % 2 == 1 => "◦ ".to_string(),
        Widget::Bullet { .. } => "• ".to_string(),
        Widget::Checkbox { checked: true, .. } => "☑ ".to_string(),
        Widget::Checkbox { checked: false, .. } => "☐ ".to_string(),
        Widget::HorizontalRule => "─".repeat(40),
        Widget::Image { alt, .. } => format!("[image: {alt}]"),
        Widget::Date { year, month, day } => format!("{year:04}-{month:02}-{day:02}"),
    }
}

fn widget_style(widget: &Widget) -> Style {
    match widget {
        Widget::Date { .. } => Style::default().fg(Color::LightYellow),
        Widget::Image { .. } => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::DarkGray),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_loom_engine::{
        Document, FenceTracker, Selection, Viewport,
        render::{DecorationInput, build_decorations},
    };
    use pretty_assertions::assert_eq;

    fn rows(text: &str, caret: usize) -> Vec<(String, Option<u16>)> {
        let snapshot = Document::from_text(text).snapshot();
        let fences = FenceTracker::scan(&snapshot);
        let selection = Selection::cursor(caret);
        let set = build_decorations(&DecorationInput {
            snapshot: &snapshot,
            viewport: Viewport::new(1, 100),
            selection: &selection,
            fences: &fences,
            section_titles: None,
        });
        snapshot
            .lines(1, snapshot.line_count())
            .map(|l| {
                let row = render_line(&l, &set, Some(caret), false);
                let text = row.line.spans.iter().map(|s| s.content.as_ref()).collect();
                (text, row.caret_col)
            })
            .collect()
    }

    #[test]
    fn hidden_syntax_is_skipped() {
        assert_eq!(
            rows("# Title\nsee **bold** x", 22),
            vec![("Title".to_string(), None), ("see bold x".to_string(), Some(10))]
        );
    }

    #[test]
    fn raw_construct_shows_syntax_and_caret() {
        assert_eq!(rows("see **bold**", 6), vec![("see **bold**".to_string(), Some(6))]);
    }

    #[test]
    fn widgets_are_glyphs() {
        assert_eq!(
            rows("- [x] done\n- item\n\n", 19),
            vec![
                ("☑ done".to_string(), None),
                ("• item".to_string(), None),
                (String::new(), None),
                (String::new(), Some(0)),
            ]
        );
    }

    #[test]
    fn folded_bodies_are_skipped() {
        let fold = FoldRange {
            heading_line: 2,
            level: 1,
            from: 0,
            to: 0,
            last_line: 4,
        };
        assert_eq!(display_lines(6, 1, 10, &[fold]), vec![1, 2, 5, 6]);
        assert_eq!(display_lines(6, 1, 2, &[fold]), vec![1, 2]);
    }
}
