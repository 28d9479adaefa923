use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::TopicStatsStore;
use crate::session::SessionSnapshot;

const SCHEMA_VERSION: u32 = 1;

/// Most recent sessions kept in the history file.
pub const HISTORY_LIMIT: usize = 500;

/// Cumulative results for one test across every recorded session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub total_points: u64,
    pub best_points: u64,
    pub sessions: u32,
    #[serde(default)]
    pub completed_sessions: u32,
    pub topic_stats: TopicStatsStore,
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,
}

impl ScoreRecord {
    pub fn absorb(&mut self, snapshot: &SessionSnapshot) {
        self.total_points = self.total_points.saturating_add(snapshot.points);
        self.best_points = self.best_points.max(snapshot.points);
        self.sessions += 1;
        if snapshot.completed {
            self.completed_sessions += 1;
        }
        self.topic_stats.merge(&snapshot.topic_stats);
        self.last_played = Some(snapshot.timestamp);
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreBookData {
    pub schema_version: u32,
    pub records: BTreeMap<String, ScoreRecord>,
}

impl Default for ScoreBookData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            records: BTreeMap::new(),
        }
    }
}

impl ScoreBookData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionHistoryData {
    pub schema_version: u32,
    pub sessions: Vec<SessionSnapshot>,
}

impl Default for SessionHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}

impl SessionHistoryData {
    pub fn push(&mut self, snapshot: SessionSnapshot) {
        self.sessions.push(snapshot);
        if self.sessions.len() > HISTORY_LIMIT {
            let excess = self.sessions.len() - HISTORY_LIMIT;
            self.sessions.drain(..excess);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub points: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaderboardData {
    pub schema_version: u32,
    pub boards: BTreeMap<String, Vec<LeaderboardEntry>>,
}

impl Default for LeaderboardData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            boards: BTreeMap::new(),
        }
    }
}

/// Highest points first; ties go to the earlier entry.
pub fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn snapshot(points: u64, completed: bool) -> SessionSnapshot {
        let mut topic_stats = TopicStatsStore::default();
        let s = topic_stats.entry("TCP");
        s.total = 2;
        s.correct = 2;
        s.first_attempt_correct = 1;
        SessionSnapshot {
            test_name: "Net".into(),
            points,
            streak: 1,
            lose_streak: 0,
            done: 2,
            total: 2,
            topic_stats,
            skipped: 0,
            completed,
            elapsed_secs: 12.0,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_record_accumulates() {
        let mut record = ScoreRecord::default();
        record.absorb(&snapshot(200, true));
        record.absorb(&snapshot(115, false));
        assert_eq!(record.total_points, 315);
        assert_eq!(record.best_points, 200);
        assert_eq!((record.sessions, record.completed_sessions), (2, 1));
        let tcp = record.topic_stats.get("TCP").unwrap();
        assert_eq!((tcp.total, tcp.correct, tcp.first_attempt_correct), (4, 4, 2));
        assert!(record.last_played.is_some());
    }

    #[test]
    fn test_history_keeps_most_recent() {
        let mut history = SessionHistoryData::default();
        for points in 0..(HISTORY_LIMIT as u64 + 3) {
            history.push(snapshot(points, true));
        }
        assert_eq!(history.sessions.len(), HISTORY_LIMIT);
        assert_eq!(history.sessions[0].points, 3);
    }

    #[test]
    fn test_rank_points_then_age() {
        let at = |s| Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, s).unwrap();
        let mut entries = vec![
            LeaderboardEntry { name: "late".into(), points: 300, created_at: at(9) },
            LeaderboardEntry { name: "low".into(), points: 100, created_at: at(0) },
            LeaderboardEntry { name: "early".into(), points: 300, created_at: at(1) },
        ];
        rank(&mut entries);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["early", "late", "low"]);
    }

    #[test]
    fn test_schema_version_mismatch_needs_reset() {
        let data: ScoreBookData =
            serde_json::from_str(r#"{"schema_version": 99, "records": {}}"#).unwrap();
        assert!(data.needs_reset());
        assert!(!ScoreBookData::default().needs_reset());
    }
}
