use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::ScoringPolicy;
use crate::session::QuizSettings;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Question bank file; the bundled sample bank when unset.
    #[serde(default)]
    pub bank_path: Option<String>,
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
    #[serde(default = "default_shuffle_options")]
    pub shuffle_options: bool,
    /// Name submitted to the leaderboard. No submission when unset.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_leaderboard_rows")]
    pub leaderboard_rows: usize,
    #[serde(default)]
    pub scoring: ScoringPolicy,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_advance_delay_ms() -> u64 {
    800
}
fn default_shuffle_options() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_leaderboard_rows() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            bank_path: None,
            advance_delay_ms: default_advance_delay_ms(),
            shuffle_options: default_shuffle_options(),
            display_name: None,
            log_level: default_log_level(),
            leaderboard_rows: default_leaderboard_rows(),
            scoring: ScoringPolicy::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdeck")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn quiz_settings(&self) -> QuizSettings {
        QuizSettings {
            policy: self.scoring,
            shuffle_options: self.shuffle_options,
            advance_delay: Duration::from_millis(self.advance_delay_ms),
        }
    }

    /// Non-blank display name, trimmed.
    pub fn player_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
