mod app;
mod config;
mod dataset;
mod event;
mod logging;
mod speech;
mod store;
mod ui;
mod vocab;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use app::{App, AppScreen, DatasetStatus, InputMode, NoticeLevel};
use config::Config;
use dataset::DatasetSource;
use event::{AppEvent, EventHandler};
use speech::CommandSpeech;
use store::{JsonFileStore, KeyValueStore, MemoryStore};
use ui::components::filter_tabs::FilterTabs;
use ui::components::progress_bar::ProgressBar;
use ui::components::search_bar::SearchBar;
use ui::components::word_detail::WordDetail;
use ui::components::word_list::WordList;
use ui::layout::{BrowseLayout, pack_hint_lines};
use ui::line_input::InputResult;
use vocab::FilterMode;

const PAGE_STEP: isize = 10;

#[derive(Parser)]
#[command(
    name = "vocabview",
    version,
    about = "Terminal vocabulary flashcards with search, progress tracking and speech"
)]
struct Cli {
    #[arg(short, long, help = "Word list: a CSV/JSON path, an http(s) URL or bundled:<name>")]
    dataset: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, value_enum, help = "Filter to start with")]
    filter: Option<FilterMode>,

    #[arg(long, help = "Keep learned flags in memory only and never write config")]
    ephemeral: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = match logging::init(&logging::default_log_dir()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            None
        }
    };
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting vocabview");

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(filter) = cli.filter {
        config.default_filter = filter;
    }
    config.validate();

    let source = cli
        .dataset
        .as_deref()
        .or(config.dataset.as_deref())
        .map(DatasetSource::parse)
        .unwrap_or_default();

    let store: Box<dyn KeyValueStore> = if cli.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        match JsonFileStore::new() {
            Ok(store) => Box::new(store),
            Err(err) => {
                tracing::warn!(error = %err, "data dir unavailable, learned flags will not persist");
                Box::new(MemoryStore::new())
            }
        }
    };
    let speech = CommandSpeech::detect(config.speech_params());

    let mut app = App::new(config, store, Box::new(speech));
    app.persist_config = !cli.ephemeral;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    app.begin_load(source, events.sender());

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref err) = result {
        tracing::error!(error = ?err, "event loop failed");
    }
    tracing::info!("exiting");

    // Terminal is restored; main's error return prints the cause.
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, events),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize(_, _) => {}
            AppEvent::DatasetLoaded { source, result } => app.on_dataset_loaded(source, result),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Browse => match app.input_mode {
            InputMode::Normal => handle_browse_key(app, key),
            InputMode::Search => handle_search_key(app, key),
            InputMode::OpenDataset => handle_open_dataset_key(app, key, events),
        },
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('/') => app.input_mode = InputMode::Search,
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::PageDown => app.move_selection(PAGE_STEP),
        KeyCode::PageUp => app.move_selection(-PAGE_STEP),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char(' ') | KeyCode::Char('m') => app.toggle_selected(),
        KeyCode::Char('s') => app.speak_selected_sentence(),
        KeyCode::Char('w') => app.speak_selected_word(),
        KeyCode::Tab | KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::BackTab => app.cycle_filter_back(),
        KeyCode::Char('1') => app.set_filter(FilterMode::All),
        KeyCode::Char('2') => app.set_filter(FilterMode::Learned),
        KeyCode::Char('3') => app.set_filter(FilterMode::Unlearned),
        KeyCode::Char('o') => app.start_open_dataset(),
        KeyCode::Char('c') => app.go_to_settings(),
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    // Arrows still move through results while typing.
    match key.code {
        KeyCode::Down => app.move_selection(1),
        KeyCode::Up => app.move_selection(-1),
        _ => match app.search.handle(key) {
            InputResult::Changed => app.apply_query(),
            InputResult::Submit | InputResult::Cancel => app.input_mode = InputMode::Normal,
            InputResult::Continue => {}
        },
    }
}

fn handle_open_dataset_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    match app.path_input.handle(key) {
        InputResult::Submit => app.submit_open_dataset(events.sender()),
        InputResult::Cancel => app.input_mode = InputMode::Normal,
        InputResult::Changed | InputResult::Continue => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.leave_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.settings_select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_select_next(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle_backward(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Browse => render_browse(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn footer_hints(app: &App) -> Vec<&'static str> {
    match app.input_mode {
        InputMode::Search => vec![
            "[Enter/Esc] Done",
            "[Ctrl-U] Clear",
            "[↑/↓] Move",
        ],
        InputMode::OpenDataset => vec!["[Tab] Complete", "[Enter] Open", "[Esc] Cancel"],
        InputMode::Normal => vec![
            "[/] Search",
            "[j/k] Move",
            "[Space] Learned",
            "[s] Speak",
            "[w] Word",
            "[Tab] Filter",
            "[o] Open",
            "[c] Settings",
            "[q] Quit",
        ],
    }
}

fn render_browse(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let hint_lines = pack_hint_lines(&footer_hints(app), area.width as usize);
    let layout = BrowseLayout::new(area, hint_lines.len() as u16);

    render_header(frame, app, layout.header);

    let search = SearchBar::new(&app.search, app.input_mode == InputMode::Search, app.theme);
    frame.render_widget(search, layout.search);

    frame.render_widget(FilterTabs::new(&app.vocab, app.theme), layout.tabs);

    let visible = app.visible();
    let list = WordList::new(
        &app.vocab,
        &visible,
        app.selected,
        &app.list_offset,
        app.theme,
    )
    .loading(app.is_loading() && app.vocab.records().is_empty());
    frame.render_widget(list, layout.list);

    let record = visible.get(app.selected).copied();
    let learned = record.is_some_and(|r| app.vocab.is_learned(&r.word));
    let detail =
        WordDetail::new(record, learned, app.theme).speech_available(app.speech.is_available());
    frame.render_widget(detail, layout.detail);

    if let Some(progress_area) = layout.progress {
        frame.render_widget(ProgressBar::new(app.vocab.progress(), app.theme), progress_area);
    }

    render_status(frame, app, layout.status);

    let footer = Paragraph::new(
        hint_lines
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.muted()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout.footer);

    if app.input_mode == InputMode::OpenDataset {
        render_open_dataset(frame, app);
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let progress = app.vocab.progress();

    let dataset = match &app.dataset_status {
        DatasetStatus::Loading(label) => format!("{label} (loading…)"),
        other => other.label().to_string(),
    };
    let info = format!(
        " {dataset} | {}/{} learned ({:.0}%)",
        progress.learned, progress.total, progress.percent
    );

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " vocabview ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_status(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;

    let line = match (&app.notice, &app.dataset_status) {
        (Some(notice), _) => {
            let color = match notice.level {
                NoticeLevel::Info => colors.success(),
                NoticeLevel::Warning => colors.warning(),
                NoticeLevel::Error => colors.error(),
            };
            Line::from(Span::styled(format!(" {}", notice.text), Style::default().fg(color)))
        }
        (None, DatasetStatus::Loading(label)) => Line::from(Span::styled(
            format!(" Loading {label}…"),
            Style::default().fg(colors.muted()),
        )),
        (None, DatasetStatus::Failed(label)) => Line::from(Span::styled(
            format!(" Could not load {label}. Press [o] to open another word list."),
            Style::default().fg(colors.error()),
        )),
        (None, DatasetStatus::Ready(_)) => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_open_dataset(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let popup = ui::layout::centered_rect(60, 20, area);
    frame.render_widget(Clear, popup);

    let block = Block::bordered()
        .title(" Open Word List ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(popup);
    block.render(popup, frame.buffer_mut());

    let (before, cursor, after) = app.path_input.render_parts();
    let text_style = Style::default().fg(colors.fg());
    let cursor_style = Style::default().fg(colors.bg()).bg(colors.accent());
    let mut input = vec![
        Span::styled(" > ", Style::default().fg(colors.accent())),
        Span::styled(before.to_string(), text_style),
    ];
    match cursor {
        Some(ch) => {
            input.push(Span::styled(ch.to_string(), cursor_style));
            input.push(Span::styled(after.to_string(), text_style));
        }
        None => input.push(Span::styled(" ", cursor_style)),
    }

    let mut lines = vec![
        Line::from(Span::styled(
            " CSV or JSON file, http(s) URL, or bundled:<name>",
            Style::default().fg(colors.muted()),
        )),
        Line::from(Span::styled(
            format!(" Bundled: {}", dataset::loader::bundled_names().join(", ")),
            Style::default().fg(colors.muted()),
        )),
        Line::from(""),
        Line::from(input),
    ];
    if app.path_input.completion_error {
        lines.push(Line::from(Span::styled(
            "   No matching files",
            Style::default().fg(colors.error()),
        )));
    }
    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields = app.settings_fields();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_text = format!("{indicator}{label}:");
        let value_text = format!("  < {value} >");

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });

        let value_style = Style::default().fg(if is_selected {
            colors.meaning()
        } else {
            colors.muted()
        });

        let lines = vec![
            Line::from(Span::styled(label_text, label_style)),
            Line::from(Span::styled(value_text, value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let footer_text = if app.speech.is_available() {
        "  [ESC] Save & back  [Enter/arrows] Change value"
    } else {
        "  [ESC] Save & back  [Enter/arrows] Change value  (speech unavailable)"
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}
