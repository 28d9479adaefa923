use std::time::Instant;

use quizdeck::bank::TestBank;
use quizdeck::chart::{PixelSurface, RadialChart};
use quizdeck::config::Config;
use quizdeck::engine::ChartEntry;
use quizdeck::engine::mastery::chart_entries;
use quizdeck::error::QuizError;
use quizdeck::session::input::digit_to_option;
use quizdeck::session::{QuizController, SessionSnapshot};
use quizdeck::store::{self, JsonStore, LeaderboardEntry, ScoreRecord};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::ui::components::menu::{Menu, MenuItem};
use crate::ui::components::radial_chart::{self, cell_to_point};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    TestSelect,
    Quiz,
    Summary,
}

pub struct App {
    pub screen: AppScreen,
    pub bank: TestBank,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub store: Option<JsonStore>,
    pub should_quit: bool,
    pub controller: Option<QuizController>,
    pub current_test: Option<usize>,
    /// Highlighted option on the current card.
    pub option_cursor: usize,
    /// Last rejected input, shown under the card.
    pub notice: Option<String>,
    pub last_snapshot: Option<SessionSnapshot>,
    pub record: Option<ScoreRecord>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub chart: Option<RadialChart<PixelSurface>>,
    pub chart_entries: Vec<ChartEntry>,
    /// Area the chart raster currently covers, for pointer mapping.
    pub chart_area: Option<Rect>,
    pub chart_error: Option<String>,
    seed: Option<u64>,
    sessions_started: u64,
}

impl App {
    pub fn new(config: Config, bank: TestBank, seed: Option<u64>) -> Self {
        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(err) => {
                warn!(%err, "score store unavailable, results will not be saved");
                None
            }
        };
        Self::with_store(config, bank, seed, store)
    }

    pub fn with_store(
        config: Config,
        bank: TestBank,
        seed: Option<u64>,
        store: Option<JsonStore>,
    ) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let mut app = Self {
            screen: AppScreen::TestSelect,
            bank,
            menu: Menu::new(theme),
            theme,
            config,
            store,
            should_quit: false,
            controller: None,
            current_test: None,
            option_cursor: 0,
            notice: None,
            last_snapshot: None,
            record: None,
            leaderboard: Vec::new(),
            chart: None,
            chart_entries: Vec::new(),
            chart_area: None,
            chart_error: None,
            seed,
            sessions_started: 0,
        };
        app.refresh_menu();
        app
    }

    pub fn set_theme(&mut self, theme: Theme) {
        let theme: &'static Theme = Box::leak(Box::new(theme));
        self.theme = theme;
        self.menu.theme = theme;
    }

    fn refresh_menu(&mut self) {
        let items = self
            .bank
            .tests
            .iter()
            .enumerate()
            .map(|(i, test)| {
                let best = self
                    .store
                    .as_ref()
                    .and_then(|s| s.score_record(&test.test_name))
                    .map(|r| format!(", best {}", r.best_points))
                    .unwrap_or_default();
                MenuItem {
                    key: if i < 9 { (i + 1).to_string() } else { " ".to_string() },
                    label: test.test_name.clone(),
                    description: format!("{} questions{best}", test.question_count()),
                }
            })
            .collect();
        self.menu.set_items(items);
    }

    fn next_rng(&mut self) -> SmallRng {
        self.sessions_started += 1;
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(self.sessions_started)),
            None => SmallRng::from_entropy(),
        }
    }

    /// Start a fresh session on test `index`. Any running session and its
    /// pending advance are dropped with the old controller.
    pub fn start_test(&mut self, index: usize) {
        let Some(test) = self.bank.tests.get(index) else {
            return;
        };
        let test = test.clone();
        self.close_chart();
        let rng = self.next_rng();
        self.controller = Some(QuizController::start(&test, self.config.quiz_settings(), rng));
        self.current_test = Some(index);
        self.option_cursor = 0;
        self.notice = None;
        self.screen = AppScreen::Quiz;
        self.check_finished();
    }

    pub fn retry(&mut self) {
        if let Some(index) = self.current_test {
            self.start_test(index);
        }
    }

    pub fn go_to_menu(&mut self) {
        self.close_chart();
        self.controller = None;
        self.refresh_menu();
        self.screen = AppScreen::TestSelect;
    }

    pub fn option_count(&self) -> usize {
        self.controller
            .as_ref()
            .and_then(|c| c.state().current())
            .map_or(0, |p| p.options.len())
    }

    fn current_resolved(&self) -> bool {
        self.controller
            .as_ref()
            .and_then(|c| c.state().current())
            .is_some_and(|p| p.resolved)
    }

    pub fn move_cursor(&mut self, down: bool) {
        let count = self.option_count();
        if count == 0 {
            return;
        }
        self.option_cursor = if down {
            (self.option_cursor + 1) % count
        } else {
            (self.option_cursor + count - 1) % count
        };
    }

    pub fn submit_option(&mut self, index: usize) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        match controller.submit_option(index, Instant::now()) {
            Ok(outcome) => {
                self.notice = None;
                if !outcome.resolved {
                    self.notice = Some(format!("{} points", outcome.delta));
                }
            }
            Err(err @ QuizError::InvalidState(_)) => {
                warn!(%err, "answer rejected");
                self.notice = Some(err.to_string());
            }
            Err(err) => warn!(%err, "answer failed"),
        }
    }

    pub fn submit_digit(&mut self, ch: char) {
        if let Some(index) = digit_to_option(ch, self.option_count()) {
            self.option_cursor = index;
            self.submit_option(index);
        }
    }

    /// Enter: answer with the cursor, or skip the wait once resolved.
    pub fn confirm(&mut self) {
        if self.current_resolved() {
            self.advance_now();
        } else {
            self.submit_option(self.option_cursor);
        }
    }

    pub fn advance_now(&mut self) {
        if !self.current_resolved() {
            return;
        }
        if let Some(controller) = self.controller.as_mut()
            && let Err(err) = controller.advance()
        {
            warn!(%err, "advance rejected");
        }
        self.on_new_question();
    }

    fn on_new_question(&mut self) {
        self.option_cursor = 0;
        self.notice = None;
        self.check_finished();
    }

    pub fn tick(&mut self) {
        let advanced = self
            .controller
            .as_mut()
            .is_some_and(|c| c.tick(Instant::now()));
        if advanced {
            self.on_new_question();
        }
    }

    pub fn end_early(&mut self) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        let snapshot = controller.end_early();
        self.finish(snapshot);
    }

    fn check_finished(&mut self) {
        let snapshot = match &self.controller {
            Some(c) if c.is_finished() => c.snapshot(),
            _ => return,
        };
        self.finish(snapshot);
    }

    fn finish(&mut self, snapshot: SessionSnapshot) {
        self.controller = None;
        info!(
            test = %snapshot.test_name,
            points = snapshot.points,
            completed = snapshot.completed,
            "showing summary"
        );

        if let Some(store) = &self.store {
            let board = store::publish(store, store, &snapshot, self.config.player_name());
            self.leaderboard = board
                .unwrap_or_else(|| store.load_leaderboard(&snapshot.test_name))
                .into_iter()
                .take(self.config.leaderboard_rows)
                .collect();
            self.record = store.score_record(&snapshot.test_name);
        }

        self.chart_entries = chart_entries(&snapshot.topic_stats);
        self.chart_error = None;
        self.last_snapshot = Some(snapshot);
        self.screen = AppScreen::Summary;
    }

    /// Attach or resize the chart for the area it will be drawn into. A
    /// too-small area gets no surface; the error is kept for the summary.
    pub fn fit_chart(&mut self, area: Rect) {
        if self.chart_area == Some(area) {
            return;
        }
        self.chart_area = Some(area);
        let size = radial_chart::surface_size(area);

        if let Some(chart) = self.chart.as_mut() {
            chart.resize(size);
            return;
        }

        let surface = radial_chart::fits(area).then(PixelSurface::default);
        match RadialChart::attach(
            surface,
            self.chart_entries.clone(),
            self.theme.colors.chart_palette(),
            size,
        ) {
            Ok(chart) => {
                self.chart = Some(chart);
                self.chart_error = None;
            }
            Err(err) => {
                warn!(%err, "chart not drawn");
                self.chart_error = Some(err.to_string());
            }
        }
    }

    pub fn close_chart(&mut self) {
        if let Some(chart) = self.chart.take() {
            drop(chart.destroy());
        }
        self.chart_area = None;
        self.chart_error = None;
    }

    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        let (Some(chart), Some(area)) = (self.chart.as_mut(), self.chart_area) else {
            return;
        };
        match cell_to_point(area, column, row) {
            Some((x, y)) => {
                chart.pointer_move(x, y);
            }
            None => chart.pointer_leave(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = r#"{"tests": [{"testName": "Net", "topics": [
        {"topic": "TCP", "questions": [
            {"question": "q1", "options": ["a", "b"], "correctAnswer": "a", "explanation": ""},
            {"question": "q2", "options": ["a", "b"], "correctAnswer": "b", "explanation": ""}
        ]}
    ]}]}"#;

    use tempfile::TempDir;

    fn app() -> App {
        let bank = TestBank::from_json(BANK).unwrap();
        App::with_store(Config::default(), bank, Some(7), None)
    }

    fn app_with_store(dir: &TempDir) -> App {
        let bank = TestBank::from_json(BANK).unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            display_name: Some("ada".to_string()),
            ..Config::default()
        };
        App::with_store(config, bank, Some(7), Some(store))
    }

    fn correct_index(app: &App) -> usize {
        app.controller
            .as_ref()
            .and_then(|c| c.state().current())
            .map(|p| p.correct_index)
            .unwrap()
    }

    #[test]
    fn test_full_session_reaches_summary() {
        let mut app = app();
        app.start_test(0);
        assert_eq!(app.screen, AppScreen::Quiz);
        for _ in 0..2 {
            let idx = correct_index(&app);
            app.submit_option(idx);
            app.confirm();
        }
        assert_eq!(app.screen, AppScreen::Summary);
        let snap = app.last_snapshot.as_ref().unwrap();
        assert!(snap.completed);
        assert_eq!(snap.points, 115 + 130);
        assert_eq!(app.chart_entries.len(), 1);
    }

    #[test]
    fn test_finished_session_is_saved_and_shown_in_menu() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_store(&dir);
        assert_eq!(app.menu.items[0].description, "2 questions");

        app.start_test(0);
        let idx = correct_index(&app);
        app.submit_option(idx);
        app.end_early();

        assert_eq!(app.record.as_ref().map(|r| r.best_points), Some(115));
        assert_eq!(app.leaderboard.len(), 1);
        assert_eq!(app.leaderboard[0].name, "ada");

        app.go_to_menu();
        assert_eq!(app.menu.items[0].description, "2 questions, best 115");
    }

    #[test]
    fn test_restart_while_advance_pending_keeps_new_session_on_first_question() {
        let mut app = app();
        app.start_test(0);
        let idx = correct_index(&app);
        app.submit_option(idx);
        let deadline = app
            .controller
            .as_ref()
            .and_then(|c| c.advance_remaining(Instant::now()))
            .unwrap();

        app.start_test(0);
        let controller = app.controller.as_mut().unwrap();
        assert!(!controller.advance_pending());
        assert!(!controller.tick(Instant::now() + deadline * 4));
        assert_eq!(controller.state().progress().done, 1);
        let current = controller.state().current().unwrap();
        assert!(!current.resolved && current.first_attempt);
        assert_eq!(controller.state().score().points, 0);
    }

    #[test]
    fn test_end_early_shows_partial_summary() {
        let mut app = app();
        app.start_test(0);
        let idx = correct_index(&app);
        app.submit_option(idx);
        app.end_early();
        assert_eq!(app.screen, AppScreen::Summary);
        assert!(app.controller.is_none());
        assert!(!app.last_snapshot.as_ref().unwrap().completed);
    }

    #[test]
    fn test_rejected_input_sets_notice() {
        let mut app = app();
        app.start_test(0);
        let idx = correct_index(&app);
        app.submit_option(idx);
        app.submit_option(idx);
        assert!(app.notice.as_deref().unwrap().contains("invalid session state"));
    }

    #[test]
    fn test_chart_lifecycle() {
        let mut app = app();
        app.start_test(0);
        app.end_early();

        app.fit_chart(Rect::new(0, 0, 4, 2));
        assert!(app.chart.is_none());
        assert!(app.chart_error.is_some());

        let area = Rect::new(2, 1, 40, 20);
        app.fit_chart(area);
        assert!(app.chart.is_some());
        app.pointer_moved(0, 0);
        assert!(app.chart.as_ref().unwrap().tooltip().is_none());

        app.go_to_menu();
        assert!(app.chart.is_none());
        assert!(app.chart_area.is_none());
    }
}
