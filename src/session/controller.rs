use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use tracing::{info, warn};

use crate::bank::TestDef;
use crate::engine::ScoringPolicy;
use crate::error::{QuizError, QuizResult};
use crate::session::advance::AdvanceTimer;
use crate::session::input::{self, AnswerOutcome};
use crate::session::quiz::QuizState;
use crate::session::result::SessionSnapshot;

#[derive(Clone, Copy, Debug)]
pub struct QuizSettings {
    pub policy: ScoringPolicy,
    pub shuffle_options: bool,
    pub advance_delay: Duration,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            policy: ScoringPolicy::default(),
            shuffle_options: true,
            advance_delay: Duration::from_millis(800),
        }
    }
}

/// Owner of the one active session. Every mutation goes through the
/// message-style methods here; dropping the controller drops its pending
/// advance with it.
pub struct QuizController {
    state: QuizState,
    timer: AdvanceTimer,
    rng: SmallRng,
    advance_delay: Duration,
}

impl QuizController {
    /// Build a session for `test` and present its first well-formed question.
    pub fn start(test: &TestDef, settings: QuizSettings, mut rng: SmallRng) -> Self {
        let state = QuizState::new(
            &test.test_name,
            test.questions(),
            settings.policy,
            settings.shuffle_options,
            &mut rng,
        );
        info!(test = %test.test_name, questions = state.progress().total, "session started");
        let mut controller = Self {
            state,
            timer: AdvanceTimer::default(),
            rng,
            advance_delay: settings.advance_delay,
        };
        // A fresh session has nothing open, so this only fails on frozen state.
        if let Err(err) = controller.advance() {
            warn!(%err, "could not present first question");
        }
        controller
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_frozen()
    }

    pub fn advance_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn advance_remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Submit an option of the current presentation. A resolving answer arms
    /// the advance timer; rejected input leaves everything untouched.
    pub fn submit_option(&mut self, index: usize, now: Instant) -> QuizResult<AnswerOutcome> {
        let outcome = input::submit_option(&mut self.state, index)?;
        self.after_answer(&outcome, now);
        Ok(outcome)
    }

    pub fn submit_answer(&mut self, topic: &str, is_correct: bool, now: Instant) -> QuizResult<AnswerOutcome> {
        let outcome = input::submit_answer(&mut self.state, topic, is_correct)?;
        self.after_answer(&outcome, now);
        Ok(outcome)
    }

    fn after_answer(&mut self, outcome: &AnswerOutcome, now: Instant) {
        if outcome.resolved {
            self.timer.schedule(now, self.advance_delay);
        }
    }

    /// Move to the next question now, skipping malformed ones. Returns
    /// false once the queue is exhausted and the session has frozen.
    pub fn advance(&mut self) -> QuizResult<bool> {
        self.timer.cancel();
        loop {
            match self.state.advance(&mut self.rng) {
                Ok(true) => return Ok(true),
                Ok(false) => {
                    info!(points = self.state.score().points, "session complete");
                    return Ok(false);
                }
                Err(err @ QuizError::DataIntegrity { .. }) => {
                    warn!(%err, "skipping malformed question");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Drive the advance timer. Returns true when a transition happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.timer.fire_if_due(now) {
            return false;
        }
        match self.advance() {
            Ok(_) => true,
            Err(err) => {
                warn!(%err, "scheduled advance dropped");
                false
            }
        }
    }

    /// Freeze the session and cancel any pending transition.
    pub fn end_early(&mut self) -> SessionSnapshot {
        self.timer.cancel();
        self.state.end_early();
        info!(points = self.state.score().points, done = self.state.progress().done, "session ended early");
        self.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_state(&self.state)
    }
}
