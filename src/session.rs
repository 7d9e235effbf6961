//! Interactive TUI annotation session.
//!
//! The session renders an info header, the two sentence panes, and a
//! scrollable pair list colored by annotation status, and maps key presses
//! onto engine calls. List markers color pairs by status: scored gray,
//! skipped yellow, unscored plain.
//!
//! Quitting with `q` or Esc saves first; Ctrl-C leaves without saving. A
//! failed save keeps the session (and the in-memory annotations) alive with
//! the error shown in the message line.

use crate::corpus::{Record, ScoreToken, Status};
use crate::engine;
use crate::store::CorpusStore;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::Path;
use std::time::Duration;

const LIST_LEGEND: &str =
    "[0-5 score] [? skip] [e erase] [w save] [n next] [j jump] [g go to] [q save+quit]";

struct App<'a> {
    store: &'a mut CorpusStore,
    path: &'a Path,
    selected: usize,
    list_state: ListState,
    jump_to_next: bool,
    /// Digits typed so far in go-to-line mode, if active.
    goto_input: Option<String>,
    message: Option<String>,
    dirty: bool,
}

impl<'a> App<'a> {
    fn new(store: &'a mut CorpusStore, path: &'a Path, jump_to_next: bool) -> Self {
        let selected = engine::next_pair_needing_attention(store);
        let mut app = Self {
            store,
            path,
            selected,
            list_state: ListState::default(),
            jump_to_next,
            goto_input: None,
            message: None,
            dirty: false,
        };
        app.sync_state();
        app
    }

    fn sync_state(&mut self) {
        let len = self.store.record_count();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        self.list_state.select(Some(self.selected));
        let max_offset = len.saturating_sub(1);
        if self.list_state.offset() > max_offset {
            *self.list_state.offset_mut() = max_offset;
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.store.record_count() as isize;
        if len == 0 {
            return;
        }
        let mut next = self.selected as isize + delta;
        if next < 0 {
            next = 0;
        } else if next >= len {
            next = len - 1;
        }
        self.selected = next as usize;
        self.sync_state();
    }

    fn move_to_start(&mut self) {
        self.selected = 0;
        self.sync_state();
    }

    fn move_to_end(&mut self) {
        self.selected = self.store.record_count().saturating_sub(1);
        self.sync_state();
    }

    fn assign(&mut self, token: ScoreToken) {
        if let Err(err) = engine::assign_score(self.store, self.selected, token) {
            self.message = Some(err.to_string());
            return;
        }
        self.after_mutation();
    }

    fn erase(&mut self) {
        if let Err(err) = engine::erase_score(self.store, self.selected) {
            self.message = Some(err.to_string());
            return;
        }
        self.after_mutation();
    }

    fn after_mutation(&mut self) {
        self.dirty = true;
        self.message = None;
        if self.jump_to_next {
            self.selected = engine::next_pair_needing_attention(self.store);
        }
        self.sync_state();
    }

    fn jump_to_next_pair(&mut self) {
        self.selected = engine::next_pair_needing_attention(self.store);
        self.sync_state();
    }

    fn save(&mut self) -> bool {
        match self.store.save(self.path) {
            Ok(()) => {
                self.dirty = false;
                self.message = Some("data saved".to_string());
                true
            }
            Err(err) => {
                self.message = Some(format!("save failed: {err}"));
                false
            }
        }
    }

    fn commit_goto(&mut self) {
        let Some(buf) = self.goto_input.take() else {
            return;
        };
        match buf.parse::<usize>() {
            Ok(line) if line >= 1 && line <= self.store.record_count() => {
                self.selected = line - 1;
                self.message = None;
                self.sync_state();
            }
            _ => {
                self.message = Some(format!("no such line: {buf}"));
            }
        }
    }
}

/// Run the annotation session over an already-loaded store, saving back to
/// `path`. Returns once the user quits.
pub fn run(store: &mut CorpusStore, path: &Path, jump_to_next: bool) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(store, path, jump_to_next);
    let result = event_loop(&mut terminal, &mut app);
    cleanup_terminal(&mut terminal)?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<'_>,
) -> Result<()> {
    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            terminal.draw(|frame| render_app(frame, app))?;
            needs_redraw = false;
        }
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                        continue;
                    }
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        // Escape hatch: leave without saving.
                        break;
                    }
                    if app.goto_input.is_some() {
                        handle_goto_key(app, key.code);
                    } else if !handle_key(app, key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
    }
    Ok(())
}

/// Handle one key press in normal mode. Returns false when the session
/// should end.
fn handle_key(app: &mut App<'_>, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => {
            // Quitting saves first. Stay in the session if the save fails
            // so no work is lost.
            if app.save() {
                return false;
            }
        }
        KeyCode::Char(c @ '0'..='5') => app.assign(ScoreToken::Score(c as u8 - b'0')),
        KeyCode::Char('?') => app.assign(ScoreToken::Skip),
        KeyCode::Char('e') => app.erase(),
        KeyCode::Char('w') => {
            app.save();
        }
        KeyCode::Char('n') => app.jump_to_next_pair(),
        KeyCode::Char('j') => {
            app.jump_to_next = !app.jump_to_next;
        }
        KeyCode::Char('g') => {
            app.goto_input = Some(String::new());
        }
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-20),
        KeyCode::PageDown => app.move_selection(20),
        KeyCode::Home => app.move_to_start(),
        KeyCode::End => app.move_to_end(),
        _ => {}
    }
    true
}

fn handle_goto_key(app: &mut App<'_>, code: KeyCode) {
    match code {
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(buf) = app.goto_input.as_mut() {
                buf.push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(buf) = app.goto_input.as_mut() {
                buf.pop();
            }
        }
        KeyCode::Enter => app.commit_goto(),
        KeyCode::Esc => app.goto_input = None,
        _ => {}
    }
}

fn render_app(frame: &mut Frame, app: &mut App<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Percentage(45),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_texts(frame, chunks[1], app);
    render_pair_list(frame, chunks[2], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App<'_>) {
    let counts = app.store.counts();
    let token = app
        .store
        .records()
        .get(app.selected)
        .and_then(|record| record.token);
    let token_label = token.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string());
    let mut lines = vec![
        Line::from(format!(
            "Pair {} of {}   score: {}   jump to next: {}",
            app.selected + 1,
            app.store.record_count(),
            token_label,
            if app.jump_to_next { "on" } else { "off" }
        )),
        Line::from(format!(
            "Scored: {}   Unscored: {}   Skipped: {}",
            counts.scored, counts.unscored, counts.skipped
        )),
    ];
    if let Some(buf) = &app.goto_input {
        lines.push(Line::from(format!("Go to line: {buf}_")));
    } else if let Some(message) = &app.message {
        lines.push(Line::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }
    let title = format!(
        "stsanno: {}{}",
        app.path.display(),
        if app.dirty { " (unsaved)" } else { "" }
    );
    let widget = Paragraph::new(Text::from(lines))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_texts(frame: &mut Frame, area: Rect, app: &App<'_>) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let view = engine::select_pair(app.store, app.selected).ok();
    let (text1, text2) = view
        .map(|view| (view.text1.to_string(), view.text2.to_string()))
        .unwrap_or_default();

    let pane1 = Paragraph::new(Text::raw(text1))
        .block(Block::default().title("Text 1").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(pane1, halves[0]);

    let pane2 = Paragraph::new(Text::raw(text2))
        .block(Block::default().title("Text 2").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(pane2, halves[1]);
}

fn render_pair_list(frame: &mut Frame, area: Rect, app: &mut App<'_>) {
    app.sync_state();
    let items: Vec<ListItem> = app
        .store
        .records()
        .iter()
        .enumerate()
        .map(|(idx, record)| render_pair_item(idx, record))
        .collect();
    let title = format!("Pairs {LIST_LEGEND}");
    let block = Block::default().title(title).borders(Borders::ALL);
    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_pair_item(index: usize, record: &Record) -> ListItem<'static> {
    let mut spans = Vec::new();
    spans.push(status_marker(record));
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        format!("{:>5} | ", index + 1),
        Style::default().fg(Color::Blue),
    ));
    spans.push(Span::raw(format!("{} {}", record.text1, record.text2)));
    ListItem::new(Line::from(spans))
}

fn status_marker(record: &Record) -> Span<'static> {
    match (record.status(), record.token) {
        (Status::Scored, Some(token)) => Span::styled(
            format!("[{token}]"),
            Style::default().fg(Color::Gray),
        ),
        (Status::Skipped, _) => Span::styled("[?]", Style::default().fg(Color::Yellow)),
        _ => Span::styled("[ ]", Style::default().fg(Color::DarkGray)),
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(())
}
