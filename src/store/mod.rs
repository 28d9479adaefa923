//! Persistence and leaderboard collaborators.
//!
//! The session core never ranks or stores anything itself; it hands a
//! snapshot or a `(test, name, points)` triple to these traits.

pub mod json_store;
pub mod schema;

use anyhow::Result;
use tracing::warn;

use crate::session::SessionSnapshot;

pub use json_store::JsonStore;
pub use schema::{LeaderboardEntry, ScoreRecord};

pub trait ScoreSink {
    fn record(&self, test_id: &str, snapshot: &SessionSnapshot) -> Result<()>;
}

pub trait Leaderboard {
    /// Add an entry and return the ranked board for `test_id`.
    fn submit(&self, test_id: &str, name: &str, points: u64) -> Result<Vec<LeaderboardEntry>>;
}

/// Fire a finished session at both collaborators. Failures are logged and
/// swallowed; the returned board is None when nothing was submitted.
pub fn publish(
    sink: &dyn ScoreSink,
    board: &dyn Leaderboard,
    snapshot: &SessionSnapshot,
    player: Option<&str>,
) -> Option<Vec<LeaderboardEntry>> {
    let test_id = snapshot.test_name.as_str();
    if let Err(err) = sink.record(test_id, snapshot) {
        warn!(test = test_id, %err, "failed to record session");
    }

    let name = player?;
    if snapshot.answered() == 0 {
        return None;
    }
    match board.submit(test_id, name, snapshot.points) {
        Ok(entries) => Some(entries),
        Err(err) => {
            warn!(test = test_id, %err, "leaderboard submission failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use anyhow::bail;
    use chrono::Utc;

    use super::*;
    use crate::engine::TopicStatsStore;

    #[derive(Default)]
    struct Recorder {
        fail: bool,
        recorded: RefCell<Vec<String>>,
        submitted: RefCell<Vec<(String, u64)>>,
    }

    impl ScoreSink for Recorder {
        fn record(&self, test_id: &str, _: &SessionSnapshot) -> Result<()> {
            if self.fail {
                bail!("disk full");
            }
            self.recorded.borrow_mut().push(test_id.to_string());
            Ok(())
        }
    }

    impl Leaderboard for Recorder {
        fn submit(&self, _: &str, name: &str, points: u64) -> Result<Vec<LeaderboardEntry>> {
            if self.fail {
                bail!("offline");
            }
            self.submitted.borrow_mut().push((name.to_string(), points));
            Ok(vec![LeaderboardEntry {
                name: name.to_string(),
                points,
                created_at: Utc::now(),
            }])
        }
    }

    fn snapshot(answered: u32) -> SessionSnapshot {
        let mut topic_stats = TopicStatsStore::default();
        if answered > 0 {
            topic_stats.entry("TCP").total = answered;
        }
        SessionSnapshot {
            test_name: "Net".into(),
            points: 230,
            streak: 0,
            lose_streak: 0,
            done: answered as usize,
            total: 4,
            topic_stats,
            skipped: 0,
            completed: false,
            elapsed_secs: 0.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_publish_records_and_submits() {
        let r = Recorder::default();
        let board = publish(&r, &r, &snapshot(2), Some("ada")).unwrap();
        assert_eq!(board[0].points, 230);
        assert_eq!(*r.recorded.borrow(), vec!["Net".to_string()]);
        assert_eq!(*r.submitted.borrow(), vec![("ada".to_string(), 230)]);
    }

    #[test]
    fn test_publish_without_name_or_answers_skips_leaderboard() {
        let r = Recorder::default();
        assert!(publish(&r, &r, &snapshot(2), None).is_none());
        assert!(publish(&r, &r, &snapshot(0), Some("ada")).is_none());
        assert_eq!(r.recorded.borrow().len(), 2);
        assert!(r.submitted.borrow().is_empty());
    }

    #[test]
    fn test_publish_swallows_failures() {
        let r = Recorder {
            fail: true,
            ..Default::default()
        };
        assert!(publish(&r, &r, &snapshot(1), Some("ada")).is_none());
    }
}
