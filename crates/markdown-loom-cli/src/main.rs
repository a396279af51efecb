use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markdown_loom_config::{Config, FoldStore};
use markdown_loom_engine::{
    Cmd, DocSnapshot, Document, EditorSurface, EngineOptions, FoldMemory, FoldRange, Selection,
    Viewport, io,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use relative_path::RelativePathBuf;
use std::{
    env,
    fs::File,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
    time::Duration,
};

mod view;

/// Where the open page lives on disk.
enum Target {
    /// A page under the notes directory; folds are remembered for it.
    Page(RelativePathBuf),
    /// Any other markdown file.
    File(PathBuf),
}

struct App {
    notes_path: PathBuf,
    target: Target,
    surface: EditorSurface,
    fold_store: FoldStore,
    fold_memory: FoldMemory,
    /// Folded sections and the document version they were resolved at.
    folded: (u64, Vec<FoldRange>),
    scroll: usize,
    saved_version: u64,
    status: String,
}

impl App {
    fn new(notes_path: PathBuf, target: Target, options: EngineOptions) -> Result<Self> {
        let doc = match &target {
            Target::Page(page) => io::read_page(page, &notes_path)?,
            Target::File(path) => io::read_document(path)?,
        };
        let saved_version = doc.version();
        let fold_store = FoldStore::default();
        let fold_memory = fold_store.load().unwrap_or_else(|e| {
            log::warn!("ignoring unreadable fold store: {e}");
            FoldMemory::default()
        });

        let mut app = Self {
            notes_path,
            target,
            surface: EditorSurface::new(doc, Viewport::new(1, 1), options),
            fold_store,
            fold_memory,
            folded: (u64::MAX, Vec::new()),
            scroll: 1,
            saved_version,
            status: String::new(),
        };
        app.surface.set_selection(Selection::cursor(0))?;
        app.refresh_folds();
        Ok(app)
    }

    fn title(&self) -> String {
        let name = match &self.target {
            Target::Page(page) => page.to_string(),
            Target::File(path) => path.display().to_string(),
        };
        let dirty = if self.is_dirty() { " *" } else { "" };
        format!("{name}{dirty}")
    }

    fn is_dirty(&self) -> bool {
        self.surface.document().version() != self.saved_version
    }

    fn snapshot(&self) -> DocSnapshot {
        self.surface.snapshot()
    }

    fn caret(&self) -> usize {
        self.surface.document().selection().head().unwrap_or(0)
    }

    fn page(&self) -> Option<&RelativePathBuf> {
        match &self.target {
            Target::Page(page) => Some(page),
            Target::File(_) => None,
        }
    }

    /// Re-resolves remembered folds against the current text.
    fn refresh_folds(&mut self) {
        let version = self.surface.document().version();
        if self.folded.0 == version {
            return;
        }
        let snapshot = self.snapshot();
        let lines = match self.page() {
            Some(page) => self.fold_memory.folded_lines(page, &snapshot),
            None => Vec::new(),
        };
        let ranges = lines
            .into_iter()
            .filter_map(|line| self.surface.fold_range(line))
            .collect();
        self.folded = (version, ranges);
    }

    fn toggle_fold(&mut self) {
        let snapshot = self.snapshot();
        let line = snapshot.line_number_at(self.caret());
        let Some(page) = self.page().cloned() else {
            self.status = "Folding needs a page inside the notes folder".to_string();
            return;
        };

        let changed = if self.folded.1.iter().any(|f| f.heading_line == line) {
            self.fold_memory.record_expanded(&page, &snapshot, line)
        } else if self.surface.fold_range(line).is_some() {
            self.fold_memory.record_folded(&page, &snapshot, line)
        } else {
            false
        };
        if !changed {
            self.status = "Nothing to fold here".to_string();
            return;
        }

        self.folded.0 = u64::MAX;
        self.refresh_folds();
        if let Err(e) = self.fold_store.save(&self.fold_memory) {
            log::warn!("could not save folds: {e:#}");
            self.status = format!("Could not save folds: {e}");
        }
    }

    fn save(&mut self) -> Result<()> {
        let doc = self.surface.document();
        match &self.target {
            Target::Page(page) => io::write_page(page, &self.notes_path, doc)?,
            Target::File(path) => io::write_document(path, doc)?,
        }
        self.saved_version = doc.version();
        self.status = format!("Saved {}", self.title());
        Ok(())
    }

    fn run(&mut self, cmd: Cmd) -> bool {
        match self.surface.dispatch(&cmd) {
            Ok(handled) => handled,
            Err(e) => {
                log::warn!("{cmd:?} failed: {e}");
                self.status = e.to_string();
                false
            }
        }
    }

    fn replace_selection(&mut self, text: &str) {
        let Some(range) = self.surface.document().selection().primary().map(|r| r.span()) else {
            return;
        };
        self.run(Cmd::Replace {
            range: range.start..range.end,
            text: text.to_string(),
        });
    }

    fn move_to(&mut self, offset: usize) {
        if let Err(e) = self.surface.set_selection(Selection::cursor(offset)) {
            log::warn!("caret move to {offset} rejected: {e}");
        }
    }

    fn backspace(&mut self) {
        let caret = self.caret();
        let snapshot = self.snapshot();
        let empty = self
            .surface
            .document()
            .selection()
            .primary()
            .is_none_or(|r| r.is_empty());
        if !empty {
            self.replace_selection("");
        } else if let Some(prev) = prev_boundary(&snapshot, caret) {
            self.run(Cmd::Replace {
                range: prev..caret,
                text: String::new(),
            });
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let snapshot = self.snapshot();
        let caret = self.caret();
        self.status.clear();

        match key.code {
            KeyCode::Char('q') if ctrl => return Ok(false),
            KeyCode::Char('s') if ctrl => self.save()?,
            KeyCode::Char('t') if ctrl => {
                self.run(Cmd::ToggleCheckbox);
            }
            KeyCode::Char('f') if ctrl => self.toggle_fold(),
            KeyCode::Char('z') if ctrl => {
                if !self.run(Cmd::Undo) {
                    self.status = "Nothing to undo".to_string();
                }
            }
            KeyCode::Char('y') if ctrl => {
                if !self.run(Cmd::Redo) {
                    self.status = "Nothing to redo".to_string();
                }
            }
            KeyCode::Char(c) if !ctrl => self.replace_selection(c.encode_utf8(&mut [0; 4])),
            KeyCode::Enter => {
                if !self.run(Cmd::ContinueMarkup) {
                    self.replace_selection("\n");
                }
            }
            KeyCode::Tab => {
                self.run(Cmd::Indent);
            }
            KeyCode::BackTab => {
                self.run(Cmd::Unindent);
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Left => {
                if let Some(prev) = prev_boundary(&snapshot, caret) {
                    self.move_to(prev);
                }
            }
            KeyCode::Right => {
                if let Some(next) = next_boundary(&snapshot, caret) {
                    self.move_to(next);
                }
            }
            KeyCode::Home => self.move_to(snapshot.line_at(caret).from),
            KeyCode::End => self.move_to(snapshot.line_at(caret).to),
            KeyCode::Up => self.move_vertically(&snapshot, caret, false),
            KeyCode::Down => self.move_vertically(&snapshot, caret, true),
            _ => {}
        }
        Ok(true)
    }

    fn move_vertically(&mut self, snapshot: &DocSnapshot, caret: usize, down: bool) {
        let here = snapshot.line_at(caret);
        let col = caret - here.from;
        let mut target = here.number;
        loop {
            target = if down { target + 1 } else { target.saturating_sub(1) };
            if target == 0 || target > snapshot.line_count() {
                return;
            }
            if !view::is_folded_away(target, &self.folded.1) {
                break;
            }
        }
        let Some(line) = snapshot.line(target) else {
            return;
        };
        let mut col = col.min(line.text.len());
        while !line.text.is_char_boundary(col) {
            col -= 1;
        }
        self.move_to(line.from + col);
    }

    /// Scrolls so the caret line is on screen, then tells the engine which
    /// lines are visible.
    fn sync_viewport(&mut self, height: usize) -> Vec<usize> {
        self.refresh_folds();
        let snapshot = self.snapshot();
        let caret_line = snapshot.line_number_at(self.caret());
        let count = snapshot.line_count();

        self.scroll = self.scroll.clamp(1, count);
        if caret_line < self.scroll {
            self.scroll = caret_line;
        }
        let mut shown = view::display_lines(count, self.scroll, height, &self.folded.1);
        while shown.last().is_some_and(|&last| last < caret_line) && self.scroll < caret_line {
            self.scroll += 1;
            shown = view::display_lines(count, self.scroll, height, &self.folded.1);
        }

        if let (Some(&first), Some(&last)) = (shown.first(), shown.last()) {
            self.surface.set_viewport(Viewport::new(first, last));
        }
        shown
    }
}

/// The char boundary before `offset`. A line break, `\r\n` included, is
/// one step.
fn prev_boundary(snapshot: &DocSnapshot, offset: usize) -> Option<usize> {
    let line = snapshot.line_at(offset);
    if offset == line.from {
        let prev = line.number.checked_sub(1)?;
        return snapshot.line(prev).map(|l| l.to);
    }
    if offset > line.to {
        return Some(line.to);
    }
    line.text[..offset - line.from]
        .char_indices()
        .next_back()
        .map(|(i, _)| line.from + i)
}

fn next_boundary(snapshot: &DocSnapshot, offset: usize) -> Option<usize> {
    let line = snapshot.line_at(offset);
    if offset >= line.to {
        return (offset < snapshot.len()).then(|| snapshot.line_start(line.number + 1));
    }
    line.text[offset - line.from..]
        .chars()
        .next()
        .map(|c| offset + c.len_utf8())
}

/// Logs go to a file: the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let log_path = Config::config_dir().join("markdown-loom.log");
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(&log_path)
        .with_context(|| format!("creating log file {}", log_path.display()))?;
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn resolve_target(arg: &str, notes_path: &Path) -> Target {
    let path = PathBuf::from(arg);
    if path.is_absolute() {
        match path
            .strip_prefix(notes_path)
            .ok()
            .and_then(|rel| RelativePathBuf::from_path(rel).ok())
        {
            Some(page) => Target::Page(page),
            None => Target::File(path),
        }
    } else {
        Target::Page(RelativePathBuf::from(arg))
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    if let Err(e) = init_logging() {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    log::info!("markdown-loom starting up");

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            let cwd = env::current_dir()?;
            log::info!("no config at {}, using {}", config_path.display(), cwd.display());
            Config::new(cwd)
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = io::validate_notes_dir(&config.notes_path) {
        eprintln!(
            "Error: Notes path '{}' from config file '{}' is invalid: {e}",
            config.notes_path.display(),
            config_path.display()
        );
        process::exit(1);
    }

    let target = match args.as_slice() {
        [_, page] => resolve_target(page, &config.notes_path),
        _ => {
            eprintln!("Usage: {} <page.md>", args[0]);
            if let Ok(pages) = io::list_pages(&config.notes_path) {
                eprintln!("Pages in {}:", config.notes_path.display());
                for page in pages {
                    eprintln!("  {page}");
                }
            }
            process::exit(1);
        }
    };

    let options = EngineOptions {
        fold_line_limit: config.editor.fold_line_limit,
        section_title_debounce: config.editor.section_title_debounce(),
    };
    let mut app = App::new(config.notes_path, target, options)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(Duration::from_millis(50))? {
            app.surface.poll_timers();
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key)?
        {
            app.surface.teardown();
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.area());

    let block = Block::default().borders(Borders::ALL).title(app.title());
    let inner = block.inner(chunks[0]);
    let shown = app.sync_viewport(usize::from(inner.height));

    let snapshot = app.snapshot();
    let caret = app.caret();
    let mut caret_pos = None;
    let mut lines = Vec::with_capacity(shown.len());
    for (row, number) in shown.iter().enumerate() {
        let Some(line) = snapshot.line(*number) else {
            continue;
        };
        let folded = app.folded.1.iter().any(|r| r.heading_line == *number);
        let rendered = view::render_line(&line, app.surface.decorations(), Some(caret), folded);
        if let Some(col) = rendered.caret_col {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            caret_pos = Some(Position::new(inner.x + col, inner.y + row));
        }
        lines.push(rendered.line);
    }

    f.render_widget(Paragraph::new(lines).block(block), chunks[0]);
    if let Some(pos) = caret_pos {
        f.set_cursor_position(pos);
    }

    let help = if app.status.is_empty() {
        "^S save | ^Q quit | Tab/S-Tab indent | ^T checkbox | ^F fold | ^Z/^Y undo/redo".to_string()
    } else {
        app.status.clone()
    };
    let status = Paragraph::new(Line::from(vec![Span::styled(
        help,
        Style::default().fg(Color::DarkGray),
    )]));
    f.render_widget(status, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snap(text: &str) -> DocSnapshot {
        Document::from_text(text).snapshot()
    }

    #[test]
    fn backspace_steps_over_crlf_as_one() {
        let s = snap("a\r\nb");
        assert_eq!(prev_boundary(&s, 3), Some(1));
        assert_eq!(prev_boundary(&s, 2), Some(1));
        assert_eq!(next_boundary(&s, 1), Some(3));
    }

    #[test]
    fn boundaries_respect_multibyte_chars() {
        let s = snap("é\nx");
        assert_eq!(prev_boundary(&s, 2), Some(0));
        assert_eq!(prev_boundary(&s, 3), Some(2));
        assert_eq!(next_boundary(&s, 0), Some(2));
        assert_eq!(prev_boundary(&s, 0), None);
        assert_eq!(next_boundary(&s, 4), None);
    }
}
