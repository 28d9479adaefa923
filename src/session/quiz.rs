use std::time::Instant;

use rand::Rng;

use crate::bank::Question;
use crate::engine::{Score, ScoringPolicy, TopicStatsStore};
use crate::error::{QuizError, QuizResult};
use crate::session::queue::{Presentation, QuestionQueue};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.done as f64 / self.total as f64
    }
}

/// All state of one quiz run. Scoring fields only change through
/// `session::input`; the question flow only through `advance`.
pub struct QuizState {
    pub test_name: String,
    pub policy: ScoringPolicy,
    pub(crate) queue: QuestionQueue,
    pub(crate) score: Score,
    pub(crate) topic_stats: TopicStatsStore,
    pub(crate) current: Option<Presentation>,
    pub(crate) frozen: bool,
    pub(crate) skipped: usize,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
}

impl QuizState {
    pub fn new<R: Rng + ?Sized>(
        test_name: &str,
        questions: Vec<Question>,
        policy: ScoringPolicy,
        shuffle_options: bool,
        rng: &mut R,
    ) -> Self {
        Self {
            test_name: test_name.to_string(),
            policy,
            queue: QuestionQueue::new(questions, rng, shuffle_options),
            score: Score::default(),
            topic_stats: TopicStatsStore::default(),
            current: None,
            frozen: false,
            skipped: 0,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            done: self.queue.total() - self.queue.len(),
            total: self.queue.total(),
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn topic_stats(&self) -> &TopicStatsStore {
        &self.topic_stats
    }

    pub fn current(&self) -> Option<&Presentation> {
        self.current.as_ref()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Questions dropped because their correct answer was not presentable.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// True once every question has been drawn and the session froze on its own.
    pub fn is_complete(&self) -> bool {
        self.frozen && self.queue.is_empty() && self.current.as_ref().is_none_or(|p| p.resolved)
    }

    pub fn elapsed_secs(&self) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => start.elapsed().as_secs_f64(),
            _ => 0.0,
        }
    }

    /// Draw the next presentation. `Ok(false)` means the queue is exhausted
    /// and the session is now frozen. A malformed head question is consumed
    /// and its `DataIntegrity` error returned; calling again moves past it.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> QuizResult<bool> {
        if self.frozen {
            return Err(QuizError::invalid_state("advance on a frozen session"));
        }
        if self.current.as_ref().is_some_and(|p| !p.resolved) {
            return Err(QuizError::invalid_state(
                "advance while the current question is still open",
            ));
        }

        self.current = None;
        match self.queue.next_presentation(rng) {
            Ok(Some((_, presentation))) => {
                self.started_at.get_or_insert_with(Instant::now);
                self.current = Some(presentation);
                Ok(true)
            }
            Ok(None) => {
                self.freeze();
                Ok(false)
            }
            Err(err) => {
                self.skipped += 1;
                Err(err)
            }
        }
    }

    /// Stop the session where it stands. Idempotent.
    pub fn end_early(&mut self) {
        self.freeze();
    }

    fn freeze(&mut self) {
        if !self.frozen {
            self.frozen = true;
            self.finished_at = Some(Instant::now());
        }
    }
}
