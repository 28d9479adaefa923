use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::TopicStatsStore;
use crate::session::quiz::QuizState;

/// Read-only copy of a session handed to persistence and the summary screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub test_name: String,
    pub points: u64,
    pub streak: u32,
    pub lose_streak: u32,
    pub done: usize,
    pub total: usize,
    pub topic_stats: TopicStatsStore,
    #[serde(default)]
    pub skipped: usize,
    /// False when the session was ended before the queue emptied.
    #[serde(default = "default_true")]
    pub completed: bool,
    #[serde(default)]
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl SessionSnapshot {
    pub fn from_state(state: &QuizState) -> Self {
        let score = state.score();
        let progress = state.progress();
        Self {
            test_name: state.test_name.clone(),
            points: score.points,
            streak: score.streak,
            lose_streak: score.lose_streak,
            done: progress.done,
            total: progress.total,
            topic_stats: state.topic_stats().clone(),
            skipped: state.skipped(),
            completed: state.is_complete(),
            elapsed_secs: state.elapsed_secs(),
            timestamp: Utc::now(),
        }
    }

    pub fn answered(&self) -> u32 {
        self.topic_stats.iter().map(|(_, s)| s.total).sum()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::engine::ScoringPolicy;
    use crate::session::input;
    use crate::session::quiz::tests::questions;

    #[test]
    fn test_snapshot_of_partial_session() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut state = QuizState::new("Net", questions(3), ScoringPolicy::default(), true, &mut rng);
        state.advance(&mut rng).unwrap();
        let correct = state.current().unwrap().correct_index;
        input::submit_option(&mut state, correct).unwrap();
        state.end_early();

        let snap = SessionSnapshot::from_state(&state);
        assert_eq!(snap.test_name, "Net");
        assert_eq!(snap.points, 115);
        assert_eq!((snap.done, snap.total), (1, 3));
        assert!(!snap.completed);
        assert_eq!(snap.answered(), 1);
    }

    #[test]
    fn test_old_snapshot_json_gets_defaults() {
        let json = r#"{
            "test_name": "Net", "points": 10, "streak": 0, "lose_streak": 1,
            "done": 2, "total": 2, "topic_stats": {"entries": []},
            "timestamp": "2026-01-02T03:04:05Z"
        }"#;
        let snap: SessionSnapshot = serde_json::from_str(json).unwrap();
        assert!(snap.completed);
        assert_eq!(snap.skipped, 0);
    }
}
