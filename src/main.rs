mod app;
mod event;
mod ui;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use quizdeck::bank::{self, TestBank};
use quizdeck::config::Config;
use quizdeck::logging;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use tracing::{error, info};

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::progress_bar::ProgressBar;
use ui::components::quiz_card::QuizCard;
use ui::components::radial_chart::RadialChartView;
use ui::components::summary::SummaryPanel;
use ui::layout::{ScreenLayout, centered_rect, pack_hint_lines, summary_split};

#[derive(Parser)]
#[command(
    name = "quizdeck",
    version,
    about = "Terminal flashcard quiz runner with streak scoring and a radial mastery chart"
)]
struct Cli {
    #[arg(short, long, help = "Question bank JSON file")]
    bank: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Display name for the leaderboard")]
    name: Option<String>,

    #[arg(long, help = "Seed for question and option order")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check a question bank for malformed questions
    Validate {
        /// Bank file; the bundled sample when omitted
        path: Option<PathBuf>,
    },
    /// List bundled themes
    Themes,
}

fn load_bank(path: Option<&PathBuf>) -> Result<TestBank> {
    let bank = match path {
        Some(path) => TestBank::load(path)?,
        None => TestBank::embedded_sample()?,
    };
    Ok(bank)
}

fn run_validate(path: Option<PathBuf>) -> Result<ExitCode> {
    let bank = load_bank(path.as_ref())?;
    let issues = bank::validate(&bank);
    for issue in &issues {
        println!("{issue}");
    }
    let questions: usize = bank.tests.iter().map(|t| t.question_count()).sum();
    println!(
        "{} tests, {questions} questions, {} issue(s)",
        bank.tests.len(),
        issues.len()
    );
    Ok(if issues.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Validate { path }) => return run_validate(path),
        Some(Command::Themes) => {
            for name in ui::theme::Theme::available_themes() {
                println!("{name}");
            }
            return Ok(ExitCode::SUCCESS);
        }
        None => {}
    }

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Warning: ignoring unreadable config: {err}");
            Config::default()
        }
    };
    if let Err(err) = logging::init(&logging::default_log_path(), &config.log_level) {
        eprintln!("Warning: logging disabled: {err}");
    }

    if let Some(name) = cli.name {
        config.display_name = Some(name);
    }
    let bank_path = cli
        .bank
        .or_else(|| config.bank_path.as_ref().map(PathBuf::from));
    let bank = load_bank(bank_path.as_ref()).context("loading question bank")?;
    info!(tests = bank.tests.len(), "question bank loaded");

    let mut app = App::new(config, bank, cli.seed);
    if let Some(theme_name) = cli.theme
        && let Some(theme) = ui::theme::Theme::load(&theme_name)
    {
        app.set_theme(theme);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(%err, "terminal loop failed");
        eprintln!("Error: {err:?}");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::TestSelect => handle_menu_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Summary => handle_summary_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.start_test(app.menu.selected),
        KeyCode::Char(ch @ '1'..='9') => {
            let index = ch as usize - '1' as usize;
            app.menu.selected = index.min(app.menu.items.len().saturating_sub(1));
            app.start_test(index);
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.end_early(),
        KeyCode::Char(ch @ '1'..='9') => app.submit_digit(ch),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(true),
        KeyCode::Enter => app.confirm(),
        KeyCode::Char(' ') => app.advance_now(),
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen != AppScreen::Summary {
        return;
    }
    if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
        app.pointer_moved(mouse.column, mouse.row);
    }
}

fn render(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::TestSelect => render_menu(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Summary => render_summary(frame, app),
    }
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let line = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    let footer = Paragraph::new(Line::from(Span::styled(
        line,
        Style::default().fg(app.theme.colors.text_dim()),
    )));
    frame.render_widget(footer, area);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizdeck ",
            Style::default()
                .fg(colors.bg())
                .bg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {info}"), Style::default().fg(colors.fg())),
    ]))
    .style(Style::default().bg(colors.selected_bg()));
    frame.render_widget(header, area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let layout = ScreenLayout::new(frame.area());
    let name = app.config.player_name().unwrap_or("anonymous");
    render_header(frame, app, layout.header, &format!("Player: {name}"));

    let menu_area = centered_rect(50, 80, layout.body);
    frame.render_widget(&app.menu, menu_area);

    render_footer(
        frame,
        app,
        layout.footer,
        &["[1-9] Start", "[j/k] Move", "[Enter] Start selected", "[q] Quit"],
    );
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let layout = ScreenLayout::new(frame.area());
    let colors = &app.theme.colors;
    let Some(controller) = app.controller.as_ref() else {
        return;
    };
    let state = controller.state();
    let score = state.score();
    let progress = state.progress();

    let streak = if score.streak > 0 {
        format!("Streak {}", score.streak)
    } else if score.lose_streak > 0 {
        format!("Misses {}", score.lose_streak)
    } else {
        "Streak 0".to_string()
    };
    render_header(
        frame,
        app,
        layout.header,
        &format!("{} | Points {} | {streak}", state.test_name, score.points),
    );

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(centered_rect(70, 90, layout.body));

    let bar = ProgressBar::new("Progress", progress.ratio(), app.theme)
        .caption(format!("{}/{}", progress.done, progress.total));
    frame.render_widget(bar, body[0]);

    if let Some(presentation) = state.current() {
        frame.render_widget(QuizCard::new(presentation, app.option_cursor, app.theme), body[1]);
    }

    let status = match (controller.advance_remaining(Instant::now()), &app.notice) {
        (Some(left), _) => format!("Next question in {:.1}s", left.as_secs_f64()),
        (None, Some(notice)) => notice.clone(),
        (None, None) => String::new(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            status,
            Style::default().fg(colors.text_dim()),
        ))),
        body[2],
    );

    let hints: &[&str] = if state.current().is_some_and(|p| p.resolved) {
        &["[Enter/Space] Next", "[Esc] End session"]
    } else {
        &["[1-4] Answer", "[j/k] Move", "[Enter] Submit", "[Esc] End session"]
    };
    render_footer(frame, app, layout.footer, hints);
}

fn render_summary(frame: &mut ratatui::Frame, app: &mut App) {
    let layout = ScreenLayout::new(frame.area());
    let (chart_area, panel_area) = summary_split(layout.body);

    let block = Block::bordered()
        .title(" Topic Mastery ")
        .border_style(Style::default().fg(app.theme.colors.border()));
    let chart_inner = block.inner(chart_area);
    frame.render_widget(block, chart_area);

    app.fit_chart(chart_inner);

    let app = &*app;
    let colors = &app.theme.colors;
    let test_name = app
        .last_snapshot
        .as_ref()
        .map_or("", |s| s.test_name.as_str());
    render_header(frame, app, layout.header, &format!("Results: {test_name}"));

    match (&app.chart, &app.chart_error) {
        (Some(chart), _) if !app.chart_entries.is_empty() => {
            frame.render_widget(RadialChartView::new(chart, app.theme), chart_inner);
        }
        (_, Some(err)) => {
            let msg = Paragraph::new(format!("Chart unavailable: {err}"))
                .style(Style::default().fg(colors.text_dim()))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            msg.render(chart_inner, frame.buffer_mut());
        }
        _ => {
            let msg = Paragraph::new("No questions answered.")
                .style(Style::default().fg(colors.text_dim()))
                .alignment(Alignment::Center);
            msg.render(chart_inner, frame.buffer_mut());
        }
    }

    if let Some(snapshot) = app.last_snapshot.as_ref() {
        let panel = SummaryPanel::new(snapshot, app.theme)
            .record(app.record.as_ref())
            .leaderboard(&app.leaderboard);
        frame.render_widget(panel, panel_area);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        &["[mouse] Hover topics", "[r] Retry", "[Enter] Tests", "[Ctrl+C] Quit"],
    );
}
