use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use notebook_cells_config::Config;
use notebook_cells_engine::{
    CellKind, NotebookEntry, NotebookFile, NotebookIndex, ParsedDocument, ShadowCache,
    carry_forward, io, reload,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use relative_path::RelativePathBuf;
use std::{env, io::stdout, path::PathBuf, process};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Cells,
    Shadow,
}

/// The notebook currently shown in the content panel.
struct OpenNotebook {
    file: NotebookFile,
    text: String,
    document: ParsedDocument,
    /// Stable per-cell labels, carried across reloads by content matching.
    labels: Vec<usize>,
}

struct App {
    config: Config,
    index: NotebookIndex,
    entries: Vec<NotebookEntry>,
    list_state: ListState,
    open: Option<OpenNotebook>,
    shadows: ShadowCache,
    view: View,
    next_label: usize,
    status: String,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let index = io::build_index(&config.notebooks_path, &config.extensions)?;
        let entries = index.notebooks().cloned().collect();

        let mut app = Self {
            config,
            index,
            entries,
            list_state: ListState::default(),
            open: None,
            shadows: ShadowCache::new(),
            view: View::Cells,
            next_label: 0,
            status: String::new(),
        };

        if !app.entries.is_empty() {
            app.list_state.select(Some(0));
            app.open_selection();
        }

        Ok(app)
    }

    fn next_notebook(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.entries.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
        self.open_selection();
    }

    fn previous_notebook(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.entries.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
        self.open_selection();
    }

    fn selected_file(&self) -> Option<NotebookFile> {
        let entry = self.entries.get(self.list_state.selected()?)?;
        RelativePathBuf::from_path(&entry.relative_path)
            .ok()
            .map(NotebookFile::new)
    }

    fn open_selection(&mut self) {
        let Some(file) = self.selected_file() else {
            return;
        };
        match io::read_notebook(file.relative_path(), &self.config.notebooks_path) {
            Ok(text) => {
                let document = notebook_cells_engine::parse_notebook(&text);
                let labels = (0..document.cells.len())
                    .map(|_| self.fresh_label())
                    .collect();
                self.status = format!("Opened {}", file.display_path());
                self.open = Some(OpenNotebook {
                    file,
                    text,
                    document,
                    labels,
                });
            }
            Err(e) => {
                self.status = format!("Error reading file: {e}");
                self.open = None;
            }
        }
    }

    fn fresh_label(&mut self) -> usize {
        self.next_label += 1;
        self.next_label
    }

    /// Rereads the open notebook from disk, keeping labels of unchanged cells.
    fn reload_open(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        let text = match io::read_notebook(open.file.relative_path(), &self.config.notebooks_path) {
            Ok(text) => text,
            Err(e) => {
                self.status = format!("Error reloading: {e}");
                self.open = Some(open);
                return;
            }
        };

        let reloaded = reload(&open.document, &text);
        let labels = carry_forward(&open.labels, &reloaded.matches)
            .into_iter()
            .map(|label| label.unwrap_or_else(|| self.fresh_label()))
            .collect();
        let stats = reloaded.stats;
        self.status = format!(
            "Reloaded: {} kept, {} new, {} removed",
            stats.matched, stats.inserted, stats.deleted
        );
        let path = open.file.relative_path().to_path("");
        self.index.add_notebook(path.clone(), &text);
        if let Some(entry) = self.index.get(&path) {
            self.status
                .push_str(&format!(" ({}, {} cells)", entry.format, entry.cell_count));
        }
        self.entries = self.index.notebooks().cloned().collect();
        self.open = Some(OpenNotebook {
            file: open.file,
            text,
            document: reloaded.document,
            labels,
        });
    }

    /// Writes the open notebook back in its own dialect.
    fn save_open(&mut self) {
        let Some(open) = &self.open else {
            return;
        };
        let path = open.file.relative_path();
        let saved = io::save_document(path, &self.config.notebooks_path, &open.document);
        self.status = match saved {
            Ok(()) => format!("Saved {path}"),
            Err(e) => format!("Error saving: {e:#}"),
        };
    }

    fn persist_shadow(&mut self) {
        let Some(open) = &self.open else {
            return;
        };
        let Some(dir) = self.config.shadow_dir.clone() else {
            self.status = "No shadow_dir configured".to_string();
            return;
        };
        let source = open.file.relative_path().to_path(&self.config.notebooks_path);
        self.status = match self.shadows.persist(&source, &open.text, &dir) {
            Ok(target) => format!("Shadow written to {}", target.display()),
            Err(e) => format!("Error writing shadow: {e:#}"),
        };
    }

    fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Cells => View::Shadow,
            View::Shadow => View::Cells,
        };
    }

    fn content_lines(&mut self) -> Vec<Line<'static>> {
        let Some(open) = &self.open else {
            return vec![Line::from("Select a notebook to view its cells")];
        };
        match self.view {
            View::Cells => render_cells(open),
            View::Shadow => {
                let source = open.file.relative_path().to_path(&self.config.notebooks_path);
                let notebook = self.shadows.get_or_convert(&source, &open.text);
                match serde_json::to_string_pretty(notebook) {
                    Ok(json) => json.lines().map(|l| Line::from(l.to_string())).collect(),
                    Err(e) => vec![Line::from(format!("Error encoding shadow: {e}"))],
                }
            }
        }
    }
}

fn render_cells(open: &OpenNotebook) -> Vec<Line<'static>> {
    let doc = &open.document;
    let mut lines = vec![
        Line::from(format!(
            "{} cells, {} format{}",
            doc.cells.len(),
            doc.format,
            if doc.has_header { ", header" } else { "" }
        )),
        Line::from(""),
    ];

    for (cell, label) in doc.cells.iter().zip(&open.labels) {
        let color = match cell.kind {
            CellKind::Markup => Color::Cyan,
            CellKind::Code => Color::Green,
        };
        let mut header = format!(
            "#{label} [{}] lines {}..{}",
            cell.language, cell.start_line, cell.end_line
        );
        if let Some(title) = &cell.title {
            header.push_str(&format!(" {title}"));
        }
        lines.push(Line::from(Span::styled(
            header,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.extend(cell.source.lines().map(|l| Line::from(format!("  {l}"))));
        lines.push(Line::from(""));
    }

    lines
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    // Determine notebooks path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let loaded = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} <notebooks-folder-path>", args[0]);
            process::exit(1);
        }
    };

    let from_config;
    let config = if args.len() == 2 {
        from_config = false;
        let cli_path = Some(PathBuf::from(&args[1]));
        match loaded {
            Some(config) => config.with_override(cli_path),
            None => Config::new(PathBuf::new()).with_override(cli_path),
        }
    } else if args.len() == 1 {
        from_config = true;
        match loaded {
            Some(config) => config,
            None => {
                eprintln!("Error: No notebooks path provided and no config file found");
                eprintln!("Usage: {} <notebooks-folder-path>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [notebooks-folder-path]", args[0]);
        process::exit(1);
    };
    log::info!("Notebooks path: {}", config.notebooks_path.display());

    if let Err(e) = io::validate_notebooks_dir(&config.notebooks_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Notebooks path '{}'{} is invalid: {e}",
            config.notebooks_path.display(),
            source
        );
        process::exit(1);
    }

    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

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
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_notebook(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_notebook(),
                KeyCode::Tab => app.toggle_view(),
                KeyCode::Char('r') => app.reload_open(),
                KeyCode::Char('w') => app.save_open(),
                KeyCode::Char('s') => app.persist_shadow(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(rows[0]);

    // Notebook list panel
    let items: Vec<ListItem> = app
        .entries
        .iter()
        .map(|entry| {
            let text = format!(
                "{} ({}, {} cells)",
                entry.relative_path.display(),
                entry.format,
                entry.cell_count
            );
            ListItem::new(vec![Line::from(vec![Span::raw(text)])])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Notebooks"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(list, chunks[0], &mut app.list_state);

    // Content panel
    let title = match (&app.open, app.view) {
        (Some(open), View::Cells) => format!("Cells: {}", open.file.display_path()),
        (Some(open), View::Shadow) => format!("Shadow .ipynb: {}", open.file.display_path()),
        (None, _) => "Cells".to_string(),
    };
    let content = Paragraph::new(app.content_lines())
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(content, chunks[1]);

    // Status and key help
    let help = Paragraph::new(vec![
        Line::from(app.status.clone()),
        Line::from(vec![
            Span::raw("q: Quit | "),
            Span::raw("↑/k ↓/j: Select | "),
            Span::raw("Tab: Cells/Shadow | "),
            Span::raw("r: Reload | w: Save | s: Write shadow"),
        ]),
    ]);

    f.render_widget(help, rows[1]);
}
