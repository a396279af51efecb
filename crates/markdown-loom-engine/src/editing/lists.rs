//! # List Structural Commands
//!
//! Indent, unindent, renumber, checkbox toggling and markup continuation.
//! Each command reads a snapshot and the selection and returns one
//! [`Transaction`], or `None` when it does not apply so the host can fall
//! back to its default key handling.
//!
//! Commands collect whole-line rewrites first and only then diff each line
//! against its old text, so a transaction touches the fewest bytes possible
//! (toggling `[ ]` to `[x]` replaces one byte).

use std::collections::{BTreeMap, BTreeSet};

use crate::editing::{
    selection::Selection,
    snapshot::DocSnapshot,
    transaction::{Change, Transaction},
};
use crate::parsing::blocks::kinds::{BlockQuote, ListItem, ListItemKind, ListItemMatch};
use crate::parsing::rope::{LineRef, Span};

/// Adds two spaces in front of every selected list item.
pub fn indent(snapshot: &DocSnapshot, selection: &Selection) -> Option<Transaction> {
    shift_lines(snapshot, selection, Shift::In)
}

/// Removes up to two leading spaces from every selected list item.
pub fn unindent(snapshot: &DocSnapshot, selection: &Selection) -> Option<Transaction> {
    shift_lines(snapshot, selection, Shift::Out)
}

/// Renumbers the ordered list block around `line`.
pub fn renumber_at(snapshot: &DocSnapshot, line: usize) -> Option<Transaction> {
    let mut edits = LineEdits::new(snapshot);
    renumber_block(&mut edits, line);
    edits.into_transaction()
}

/// Toggles checkboxes on every selected line.
///
/// On one line: plain and list items become unchecked checkboxes, unchecked
/// becomes checked and checked becomes unchecked. Over several lines the
/// same transition applies to each non-blank line independently.
pub fn toggle_checkbox(snapshot: &DocSnapshot, selection: &Selection) -> Option<Transaction> {
    let lines = touched_lines(snapshot, selection);
    let multi = lines.len() > 1;
    let mut edits = LineEdits::new(snapshot);
    for line in snapshot_lines(snapshot, &lines) {
        if multi && line.is_blank() {
            continue;
        }
        edits.set(line.number, toggled(&line.text));
    }
    edits.into_transaction()
}

/// Toggles the checkbox on exactly one line, whatever is selected.
pub fn toggle_checkbox_line(snapshot: &DocSnapshot, line: usize) -> Option<Transaction> {
    let line = snapshot.line(line)?;
    let mut edits = LineEdits::new(snapshot);
    edits.set(line.number, toggled(&line.text));
    edits.into_transaction()
}

/// Enter inside a list item or blockquote: split the line and start the
/// next item with the same marker.
///
/// An empty item or quote line is the way out: its marker is removed
/// instead. Plain lines and non-empty selections are not handled.
pub fn continue_markup(snapshot: &DocSnapshot, selection: &Selection) -> Option<Transaction> {
    let at = selection.single_cursor()?;
    let line = snapshot.line_at(at);
    if at > line.to {
        return None;
    }
    let col = at - line.from;

    if let Some(item) = ListItem::parse(&line.text) {
        return continue_list(snapshot, &line, col, &item);
    }
    let quote = BlockQuote::parse(&line.text)?;
    if quote.empty || line.text[quote.content.start..].trim().is_empty() {
        return Some(Transaction::delete(line.from..line.to));
    }
    if col < quote.content.start {
        return None;
    }
    let prefix = format!(
        "{}{}",
        " ".repeat(quote.leading_spaces),
        BlockQuote::CONTINUATION.repeat(usize::from(quote.depth))
    );
    Some(Transaction::insert(at, format!("\n{prefix}")))
}

/// The text of `text` after one checkbox toggle.
pub fn toggled(text: &str) -> String {
    match ListItem::parse(text) {
        Some(ListItemMatch {
            kind: ListItemKind::Checkbox { checked },
            checkbox: Some(bx),
            ..
        }) => {
            let mark = if checked { ' ' } else { 'x' };
            format!("{}[{mark}]{}", &text[..bx.start], &text[bx.end..])
        }
        Some(item) => format!(
            "{}{}{}",
            &text[..item.leading_spaces],
            ListItem::UNCHECKED,
            &text[item.content.start..]
        ),
        None => {
            let lead = text.len() - text.trim_start_matches(' ').len();
            format!("{}{}{}", &text[..lead], ListItem::UNCHECKED, &text[lead..])
        }
    }
}

#[derive(Clone, Copy)]
enum Shift {
    In,
    Out,
}

fn shift_lines(snapshot: &DocSnapshot, selection: &Selection, shift: Shift) -> Option<Transaction> {
    let mut edits = LineEdits::new(snapshot);
    let mut touched = Vec::new();

    for line in snapshot_lines(snapshot, &touched_lines(snapshot, selection)) {
        if ListItem::parse(&line.text).is_none() {
            continue;
        }
        let new_text = match shift {
            Shift::In => format!("{}{}", ListItem::INDENT, line.text),
            Shift::Out => {
                let n = line
                    .text
                    .bytes()
                    .take(ListItem::INDENT_WIDTH)
                    .take_while(|&b| b == b' ')
                    .count();
                if n == 0 {
                    continue;
                }
                line.text[n..].to_string()
            }
        };
        edits.set(line.number, new_text);
        touched.push(line.number);
    }

    if touched.is_empty() {
        return None;
    }

    // Shifting a line changes which level it counts at, for itself and for
    // the ordered items around it.
    let mut done = BTreeSet::new();
    for &line in &touched {
        for seed in [line.saturating_sub(1), line, line + 1] {
            if seed == 0 || done.contains(&seed) {
                continue;
            }
            if let Some((first, last)) = renumber_block(&mut edits, seed) {
                done.extend(first..=last);
            }
        }
    }

    edits.into_transaction()
}

fn continue_list(
    snapshot: &DocSnapshot,
    line: &LineRef,
    col: usize,
    item: &ListItemMatch,
) -> Option<Transaction> {
    if line.text[item.content.start..].trim().is_empty() {
        return Some(Transaction::delete(line.from..line.to));
    }
    if col < item.content.start {
        return None;
    }

    let indent = " ".repeat(item.leading_spaces);
    let token = &line.text[item.token.start..item.token.end];
    let at = line.from + col;

    let ListItemKind::Ordered { number, delimiter } = item.kind else {
        let prefix = match item.kind {
            ListItemKind::Checkbox { .. } => format!("{indent}{token} [ ] "),
            _ => format!("{indent}{token} "),
        };
        return Some(Transaction::insert(at, format!("\n{prefix}")));
    };

    let ordered_prefix = |n: u64| format!("{indent}{n}{delimiter} ");

    // Renumber the block as it will look after the split: the current line
    // cut at the caret, then the new item, then everything below.
    let edits = LineEdits::new(snapshot);
    let (first, last) = ordered_block(&edits, line.number)?;
    let split = line.number - first;
    let mut block: Vec<String> = (first..=last).filter_map(|n| edits.text(n)).collect();
    block[split] = line.text[..col].to_string();
    block.insert(
        split + 1,
        format!("{}{}", ordered_prefix(number + 1), &line.text[col..]),
    );

    let mut new_number = number + 1;
    let mut changes = Vec::new();
    for (idx, numeral, n) in renumber_lines(&block) {
        if idx == split + 1 {
            new_number = n;
            continue;
        }
        let old_line = if idx <= split { first + idx } else { first + idx - 1 };
        let from = snapshot.line_start(old_line);
        changes.push(Change::new(
            from + numeral.start..from + numeral.end,
            n.to_string(),
        ));
    }
    changes.push(Change::new(at..at, format!("\n{}", ordered_prefix(new_number))));
    changes.sort_by_key(|c| c.range.start);
    Some(Transaction::from_changes(changes))
}

/// Inclusive bounds of the run of ordered-item lines containing `seed`.
fn ordered_block(edits: &LineEdits<'_>, seed: usize) -> Option<(usize, usize)> {
    let is_ordered = |n: usize| {
        edits
            .text(n)
            .is_some_and(|t| ListItem::parse_ordered(&t).is_some())
    };
    if !is_ordered(seed) {
        return None;
    }
    let mut first = seed;
    while first > 1 && is_ordered(first - 1) {
        first -= 1;
    }
    let mut last = seed;
    while is_ordered(last + 1) {
        last += 1;
    }
    Some((first, last))
}

/// Renumbers the ordered block around `seed` in place. Returns its bounds.
fn renumber_block(edits: &mut LineEdits<'_>, seed: usize) -> Option<(usize, usize)> {
    let (first, last) = ordered_block(edits, seed)?;
    let block: Vec<String> = (first..=last).filter_map(|n| edits.text(n)).collect();
    for (idx, numeral, n) in renumber_lines(&block) {
        let text = &block[idx];
        edits.set(
            first + idx,
            format!("{}{n}{}", &text[..numeral.start], &text[numeral.end..]),
        );
    }
    Some((first, last))
}

/// Numerals in a contiguous ordered block that need rewriting, as
/// `(index, numeral span, new number)`.
///
/// One counter per indent level, starting at 1. A line at some level bumps
/// that level's counter and resets every deeper level.
fn renumber_lines(block: &[String]) -> Vec<(usize, Span, u64)> {
    let mut counters: BTreeMap<usize, u64> = BTreeMap::new();
    let mut out = Vec::new();

    for (idx, text) in block.iter().enumerate() {
        let Some(item) = ListItem::parse_ordered(text) else {
            continue;
        };
        let level = item.indent();
        counters.retain(|&l, _| l <= level);
        let counter = counters.entry(level).or_insert(1);
        let n = *counter;
        *counter += 1;

        if let Some(numeral) = ListItem::numeral(&item)
            && text[numeral.start..numeral.end] != n.to_string()
        {
            out.push((idx, numeral, n));
        }
    }
    out
}

/// Every line a selection touches, ascending. A range that ends at the very
/// start of a line does not touch that line.
fn touched_lines(snapshot: &DocSnapshot, selection: &Selection) -> Vec<usize> {
    let mut lines = BTreeSet::new();
    for range in selection.ranges() {
        let first = snapshot.line_number_at(range.from());
        let mut last = snapshot.line_number_at(range.to());
        if last > first && snapshot.line_start(last) == range.to() {
            last -= 1;
        }
        lines.extend(first..=last);
    }
    lines.into_iter().collect()
}

fn snapshot_lines<'a>(
    snapshot: &'a DocSnapshot,
    numbers: &'a [usize],
) -> impl Iterator<Item = LineRef> + 'a {
    numbers.iter().filter_map(|&n| snapshot.line(n))
}

/// Whole-line rewrites waiting to become one transaction.
struct LineEdits<'a> {
    snapshot: &'a DocSnapshot,
    pending: BTreeMap<usize, String>,
}

impl<'a> LineEdits<'a> {
    fn new(snapshot: &'a DocSnapshot) -> Self {
        Self {
            snapshot,
            pending: BTreeMap::new(),
        }
    }

    /// Current text of a line, pending rewrites included.
    fn text(&self, line: usize) -> Option<String> {
        match self.pending.get(&line) {
            Some(text) => Some(text.clone()),
            None => self.snapshot.line(line).map(|l| l.text),
        }
    }

    fn set(&mut self, line: usize, text: String) {
        self.pending.insert(line, text);
    }

    fn into_transaction(self) -> Option<Transaction> {
        let changes: Vec<Change> = self
            .pending
            .iter()
            .filter_map(|(&n, new)| {
                let old = self.snapshot.line(n)?;
                minimal_change(old.from, &old.text, new)
            })
            .collect();
        let tx = Transaction::from_changes(changes);
        (!tx.is_empty()).then_some(tx)
    }
}

/// The smallest single replacement turning `old` (starting at `from`) into
/// `new`. Both cut points land on character boundaries.
fn minimal_change(from: usize, old: &str, new: &str) -> Option<Change> {
    if old == new {
        return None;
    }
    let mut prefix = old
        .bytes()
        .zip(new.bytes())
        .take_while(|(a, b)| a == b)
        .count();
    while !old.is_char_boundary(prefix) || !new.is_char_boundary(prefix) {
        prefix -= 1;
    }
    // An indentation change is anchored at the line start, so a caret there
    // moves with the text.
    let indent = |s: &str| s.len() - s.trim_start_matches(' ').len();
    if indent(old) != indent(new) {
        prefix = 0;
    }

    let room = old.len().min(new.len()) - prefix;
    let mut suffix = old
        .bytes()
        .rev()
        .zip(new.bytes().rev())
        .take(room)
        .take_while(|(a, b)| a == b)
        .count();
    while !old.is_char_boundary(old.len() - suffix) || !new.is_char_boundary(new.len() - suffix) {
        suffix -= 1;
    }

    Some(Change::new(
        from + prefix..from + old.len() - suffix,
        &new[prefix..new.len() - suffix],
    ))
}
