use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use quote_keeper::{
    CategoryFilter, DefaultSession, KeyValueStore, NoticeLevel, QuoteSession, RemoteQuoteSource,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Upper bound on how long the loop sleeps waiting for a key
const MAX_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    EnterText,
    EnterCategory,
}

pub struct App<P: KeyValueStore, S: KeyValueStore, R: RemoteQuoteSource> {
    pub session: QuoteSession<P, S, R>,
    pub display: String,
    pub mode: Mode,
    pub text_input: String,
    pub category_input: String,
    pub export_path: PathBuf,
    rng: rand::rngs::ThreadRng,
}

impl<P: KeyValueStore, S: KeyValueStore, R: RemoteQuoteSource> App<P, S, R> {
    pub fn new(session: QuoteSession<P, S, R>, export_path: PathBuf) -> Self {
        let mut app = Self {
            session,
            display: String::new(),
            mode: Mode::Browse,
            text_input: String::new(),
            category_input: String::new(),
            export_path,
            rng: rand::thread_rng(),
        };
        app.next_quote();
        app
    }

    pub fn next_quote(&mut self) {
        self.display = match self.session.show_random_quote(&mut self.rng) {
            Ok(Some(quote)) => quote.display(),
            Ok(None) => "No quotes available for this category.".to_string(),
            Err(e) => format!("Error: {}", e),
        };
    }

    pub fn cycle_filter(&mut self, forward: bool) {
        if let Err(e) = self.session.cycle_filter(forward) {
            log::error!("[SESSION] Could not save filter: {}", e);
        }
        self.next_quote();
    }

    pub fn begin_add(&mut self) {
        self.text_input.clear();
        self.category_input.clear();
        self.mode = Mode::EnterText;
    }

    pub fn submit_add(&mut self) {
        let now = Instant::now();
        // Failures already surface as notices
        if self
            .session
            .add_quote(&self.text_input, &self.category_input, now)
            .is_ok()
        {
            self.text_input.clear();
            self.category_input.clear();
        }
        self.mode = Mode::Browse;
    }

    pub fn export(&mut self) {
        let path = self.export_path.clone();
        if let Err(e) = self.session.export_to_file(&path, Instant::now()) {
            log::error!("[SESSION] Export failed: {}", e);
        }
    }

    pub fn import(&mut self) {
        let path = self.export_path.clone();
        if self.session.import_from_file(&path, Instant::now()).is_ok() {
            self.next_quote();
        }
    }

    pub fn sync_now(&mut self) {
        if let Err(e) = self.session.sync_now(Instant::now()) {
            log::error!("[SYNC] Sync failed: {}", e);
        }
    }

    pub fn tick(&mut self) {
        if let Err(e) = self.session.tick(Instant::now()) {
            log::error!("[SYNC] Scheduled sync failed: {}", e);
        }
    }

    fn active_input(&mut self) -> Option<&mut String> {
        match self.mode {
            Mode::Browse => None,
            Mode::EnterText => Some(&mut self.text_input),
            Mode::EnterCategory => Some(&mut self.category_input),
        }
    }
}

pub fn run_ui(app: &mut App<impl KeyValueStore, impl KeyValueStore, impl RemoteQuoteSource>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.session.stop_sync();

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

/// Convenience for the binary: the SQLite-backed session
pub fn run_default(session: DefaultSession, export_path: PathBuf) -> Result<()> {
    let mut app = App::new(session, export_path);
    run_ui(&mut app)
}

fn run_app<B, P, S, R>(terminal: &mut Terminal<B>, app: &mut App<P, S, R>) -> io::Result<()>
where
    B: ratatui::backend::Backend,
    P: KeyValueStore,
    S: KeyValueStore,
    R: RemoteQuoteSource,
{
    loop {
        let now = Instant::now();
        terminal.draw(|f| ui(f, app, now))?;

        let timeout = app
            .session
            .schedule()
            .time_until_due(now)
            .map_or(MAX_POLL, |left| left.min(MAX_POLL));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.mode == Mode::Browse {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('n') | KeyCode::Char(' ') => app.next_quote(),
                        KeyCode::Tab | KeyCode::Right => app.cycle_filter(true),
                        KeyCode::BackTab | KeyCode::Left => app.cycle_filter(false),
                        KeyCode::Char('a') => app.begin_add(),
                        KeyCode::Char('e') => app.export(),
                        KeyCode::Char('i') => app.import(),
                        KeyCode::Char('s') => app.sync_now(),
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Esc => app.mode = Mode::Browse,
                        KeyCode::Enter | KeyCode::Tab if app.mode == Mode::EnterText => {
                            app.mode = Mode::EnterCategory
                        }
                        KeyCode::Enter => app.submit_add(),
                        KeyCode::BackTab => app.mode = Mode::EnterText,
                        KeyCode::Backspace => {
                            if let Some(input) = app.active_input() {
                                input.pop();
                            }
                        }
                        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                            if let Some(input) = app.active_input() {
                                input.push(c);
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        app.tick();
    }
}

fn ui<P: KeyValueStore, S: KeyValueStore, R: RemoteQuoteSource>(
    f: &mut Frame,
    app: &App<P, S, R>,
    now: Instant,
) {
    let adding = app.mode != Mode::Browse;

    let mut constraints = vec![
        Constraint::Length(3), // Category tabs
        Constraint::Min(5),    // Quote display
    ];
    if adding {
        constraints.push(Constraint::Length(6)); // Add form
    }
    constraints.push(Constraint::Length(3)); // Notice banner
    constraints.push(Constraint::Length(3)); // Status bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.size());

    render_header(f, chunks[0], app);
    render_quote(f, chunks[1], app);

    let mut next = 2;
    if adding {
        render_add_form(f, chunks[next], app);
        next += 1;
    }
    render_notice(f, chunks[next], app, now);
    render_status_bar(f, chunks[next + 1], app);
}

fn render_header<P: KeyValueStore, S: KeyValueStore, R: RemoteQuoteSource>(
    f: &mut Frame,
    area: Rect,
    app: &App<P, S, R>,
) {
    let mut filters = vec![CategoryFilter::All];
    filters.extend(
        app.session
            .categories()
            .iter()
            .map(|c| CategoryFilter::Category(c.clone())),
    );

    let mut tab_spans = vec![];
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if filter == app.session.filter() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(filter.label(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Total: {}", app.session.quotes().len()),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_quote<P: KeyValueStore, S: KeyValueStore, R: RemoteQuoteSource>(
    f: &mut Frame,
    area: Rect,
    app: &App<P, S, R>,
) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", app.display),
            Style::default().fg(Color::White).add_modifier(Modifier::ITALIC),
        )),
    ];

    let panel = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Quote "),
    );

    f.render_widget(panel, area);
}

fn render_add_form<P: KeyValueStore, S: KeyValueStore, R: RemoteQuoteSource>(
    f: &mut Frame,
    area: Rect,
    app: &App<P, S, R>,
) {
    let field_style = |active: bool| {
        if active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        }
    };

    let cursor = |active: bool| if active { "▏" } else { "" };
    let on_text = app.mode == Mode::EnterText;
    let on_category = app.mode == Mode::EnterCategory;

    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Quote:    ", field_style(on_text)),
            Span::raw(app.text_input.as_str()),
            Span::raw(cursor(on_text)),
        ]),
        Line::from(vec![
            Span::styled("  Category: ", field_style(on_category)),
            Span::raw(app.category_input.as_str()),
            Span::raw(cursor(on_category)),
        ]),
    ];

    let form = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Add Quote "),
    );

    f.render_widget(form, area);
}

fn render_notice<P: KeyValueStore, S: KeyValueStore, R: RemoteQuoteSource>(
    f: &mut Frame,
    area: Rect,
    app: &App<P, S, R>,
    now: Instant,
) {
    let (text, color) = match app.session.current_notice(now) {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => Color::Cyan,
                NoticeLevel::Success => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            (format!(" {}", notice.message), color)
        }
        None => (String::new(), Color::DarkGray),
    };

    let banner = Paragraph::new(Span::styled(text, Style::default().fg(color))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );

    f.render_widget(banner, area);
}

fn render_status_bar<P: KeyValueStore, S: KeyValueStore, R: RemoteQuoteSource>(
    f: &mut Frame,
    area: Rect,
    app: &App<P, S, R>,
) {
    let hints: &[(&str, &str)] = match app.mode {
        Mode::Browse => &[
            ("n", " Next | "),
            ("Tab/←→", " Category | "),
            ("a", " Add | "),
            ("e", " Export | "),
            ("i", " Import | "),
            ("s", " Sync | "),
        ],
        Mode::EnterText | Mode::EnterCategory => &[
            ("Tab", " Next field | "),
            ("Enter", " Save | "),
            ("Esc", " Cancel"),
        ],
    };

    let mut status_spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(*label));
    }
    if app.mode == Mode::Browse {
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
