use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::session::SessionSnapshot;
use crate::store::schema::{
    LeaderboardData, LeaderboardEntry, ScoreBookData, ScoreRecord, SessionHistoryData, rank,
};
use crate::store::{Leaderboard, ScoreSink};

const SCORES_FILE: &str = "scores.json";
const HISTORY_FILE: &str = "session_history.json";
const LEADERBOARD_FILE: &str = "leaderboard.json";

/// Entries kept per test on the local leaderboard.
pub const LEADERBOARD_CAPACITY: usize = 100;

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdeck");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                warn!(file = name, %err, "unreadable store file, starting fresh");
                T::default()
            }),
            Err(_) => T::default(),
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_scores(&self) -> ScoreBookData {
        let data: ScoreBookData = self.load(SCORES_FILE);
        if data.needs_reset() {
            warn!(version = data.schema_version, "score book schema changed, resetting");
            return ScoreBookData::default();
        }
        data
    }

    pub fn score_record(&self, test_id: &str) -> Option<ScoreRecord> {
        self.load_scores().records.remove(test_id)
    }

    pub fn load_history(&self) -> SessionHistoryData {
        self.load(HISTORY_FILE)
    }

    pub fn load_leaderboard(&self, test_id: &str) -> Vec<LeaderboardEntry> {
        let mut data: LeaderboardData = self.load(LEADERBOARD_FILE);
        data.boards.remove(test_id).unwrap_or_default()
    }

    /// Insert an entry stamped `created_at` and return the ranked board.
    pub fn submit_at(
        &self,
        test_id: &str,
        name: &str,
        points: u64,
        created_at: DateTime<Utc>,
    ) -> Result<Vec<LeaderboardEntry>> {
        let mut data: LeaderboardData = self.load(LEADERBOARD_FILE);
        let board = data.boards.entry(test_id.to_string()).or_default();
        board.push(LeaderboardEntry {
            name: name.to_string(),
            points,
            created_at,
        });
        rank(board);
        board.truncate(LEADERBOARD_CAPACITY);
        let ranked = board.clone();
        self.save(LEADERBOARD_FILE, &data)?;
        Ok(ranked)
    }
}

impl ScoreSink for JsonStore {
    fn record(&self, test_id: &str, snapshot: &SessionSnapshot) -> Result<()> {
        let mut scores = self.load_scores();
        scores
            .records
            .entry(test_id.to_string())
            .or_default()
            .absorb(snapshot);
        self.save(SCORES_FILE, &scores)?;

        let mut history = self.load_history();
        history.push(snapshot.clone());
        self.save(HISTORY_FILE, &history)?;

        debug!(test = test_id, points = snapshot.points, "session recorded");
        Ok(())
    }
}

impl Leaderboard for JsonStore {
    fn submit(&self, test_id: &str, name: &str, points: u64) -> Result<Vec<LeaderboardEntry>> {
        self.submit_at(test_id, name, points, Utc::now())
    }
}
