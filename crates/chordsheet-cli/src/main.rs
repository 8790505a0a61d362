use anyhow::Result;
use chordsheet_config::Config;
use chordsheet_engine::render::preview_rows;
use chordsheet_engine::{ChartFile, Document, PreviewRow, SongDocument, io};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{env, io::stdout, path::PathBuf, process};

struct App {
    charts_root: PathBuf,
    files: Vec<ChartFile>,
    file_list_state: ListState,
    /// The chart as loaded from disk; the engine document is the source of
    /// truth for its text.
    document: Option<Document>,
    /// Accumulated transpose offset applied for display and save.
    transpose: i32,
    prefer_sharps: Option<bool>,
    status: String,
}

impl App {
    fn new(charts_root: PathBuf, config: Option<&Config>) -> Result<Self> {
        let files = io::scan_chart_files(&charts_root)?;
        let files = match config {
            Some(config) => files
                .into_iter()
                .filter(|f| {
                    config
                        .matches_chart(f.relative_path().as_str())
                        .unwrap_or(true)
                })
                .collect(),
            None => files,
        };

        let mut app = Self {
            charts_root,
            files,
            file_list_state: ListState::default(),
            document: None,
            transpose: 0,
            prefer_sharps: config.and_then(|c| c.prefer_sharps),
            status: String::new(),
        };

        if !app.files.is_empty() {
            app.file_list_state.select(Some(0));
            app.load_selected();
        }
        Ok(app)
    }

    fn selected_file(&self) -> Option<&ChartFile> {
        self.files.get(self.file_list_state.selected()?)
    }

    fn load_selected(&mut self) {
        self.transpose = 0;
        self.document = None;
        let Some(file) = self.selected_file().cloned() else {
            return;
        };
        match io::read_file(file.relative_path(), &self.charts_root) {
            Ok(content) => match Document::from_bytes(content.as_bytes()) {
                Ok(document) => {
                    self.status = file.display_path().to_string();
                    self.document = Some(document);
                }
                Err(e) => self.status = format!("Error parsing chart: {e}"),
            },
            Err(e) => self.status = format!("Error reading file: {e}"),
        }
    }

    fn next_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => (i + 1) % self.files.len(),
            None => 0,
        };
        self.file_list_state.select(Some(i));
        self.load_selected();
    }

    fn previous_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.files.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.file_list_state.select(Some(i));
        self.load_selected();
    }

    fn adjust_transpose(&mut self, delta: i32) {
        if self.document.is_some() {
            self.transpose += delta;
            self.status = format!("transpose {:+}", self.transpose);
        }
    }

    fn toggle_spelling(&mut self) {
        self.prefer_sharps = match self.prefer_sharps {
            None => Some(true),
            Some(true) => Some(false),
            Some(false) => None,
        };
        self.status = match self.prefer_sharps {
            None => "spelling: follow key".to_string(),
            Some(true) => "spelling: sharps".to_string(),
            Some(false) => "spelling: flats".to_string(),
        };
    }

    /// The document as displayed: the parsed chart with the current
    /// transpose offset applied.
    fn displayed_song(&self) -> Option<SongDocument> {
        let document = self.document.as_ref()?;
        let (song, _) = document.transpose(self.transpose, self.prefer_sharps);
        Some(song)
    }

    /// Writes the displayed chart back as its canonical serialization.
    fn save_displayed(&mut self) {
        let Some(file) = self.selected_file().cloned() else {
            return;
        };
        let Some(document) = self.document.as_ref() else {
            return;
        };
        let (_, text) = document.transpose(self.transpose, self.prefer_sharps);
        match io::write_file(file.relative_path(), &self.charts_root, &text) {
            Ok(()) => {
                self.status = format!("wrote {}", file.display_path());
                // Reload so the buffer matches what is on disk.
                self.load_selected();
            }
            Err(e) => self.status = format!("Error writing file: {e}"),
        }
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            None
        }
    };

    let charts_path = if args.len() == 2 {
        PathBuf::from(&args[1])
    } else if args.len() == 1 {
        match &config {
            Some(config) => config.charts_path.clone(),
            None => {
                eprintln!("Error: No charts path provided and no config file found");
                eprintln!("Usage: {} <charts-folder-path>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [charts-folder-path]", args[0]);
        process::exit(1);
    };

    if let Err(e) = io::validate_charts_dir(&charts_path) {
        eprintln!("Error: Charts path '{}' is invalid: {e}", charts_path.display());
        process::exit(1);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(charts_path, config.as_ref())?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_file(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_file(),
                KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_transpose(1),
                KeyCode::Char('-') => app.adjust_transpose(-1),
                KeyCode::Char('0') => app.adjust_transpose(-app.transpose),
                KeyCode::Char('s') => app.toggle_spelling(),
                KeyCode::Char('w') => app.save_displayed(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(f.area());

    // Chart list panel
    let items: Vec<ListItem> = app
        .files
        .iter()
        .map(|file| ListItem::new(file.display_name().to_string()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Charts"))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, chunks[0], &mut app.file_list_state);

    // Preview panel
    let mut lines: Vec<Line> = Vec::new();
    if let Some(song) = app.displayed_song() {
        if let Some(title) = song.title() {
            lines.push(Line::from(Span::styled(
                title.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }
        for row in preview_rows(&song) {
            match row {
                PreviewRow::SectionHeading { kind, label, .. } => {
                    let text = label.unwrap_or_else(|| kind.clone());
                    lines.push(Line::from(Span::styled(
                        format!("[{text}]"),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )));
                }
                PreviewRow::ChordLyric {
                    chord_row,
                    lyric_row,
                    ..
                } => {
                    if !chord_row.is_empty() {
                        lines.push(Line::from(Span::styled(
                            chord_row,
                            Style::default().fg(Color::Cyan),
                        )));
                    }
                    lines.push(Line::from(lyric_row));
                }
                PreviewRow::Comment { text } => {
                    lines.push(Line::from(Span::styled(
                        format!("#{text}"),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                PreviewRow::Blank => lines.push(Line::from("")),
            }
        }
    } else {
        lines.push(Line::from("No chart selected"));
    }

    let title = if app.transpose != 0 {
        format!("Preview ({:+}) — {}", app.transpose, app.status)
    } else {
        format!("Preview — {}", app.status)
    };
    let preview = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(preview, chunks[1]);

    // Instructions
    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous | ↓/j: Next | "),
        Span::raw("+/-: Transpose | 0: Reset | s: Spelling | w: Write"),
    ]);
    let help = Paragraph::new(vec![help_text]).block(Block::default());

    let bottom_chunk = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());
    f.render_widget(help, bottom_chunk[1]);
}
