use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Overrides the configured level, ahead of `RUST_LOG`.
pub const LOG_ENV: &str = "QUIZDECK_LOG";

pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizdeck")
        .join("quizdeck.log")
}

/// Pick the filter directive: `QUIZDECK_LOG`, then `RUST_LOG`, then the
/// configured level. Blank values are ignored.
pub fn filter_directive(quizdeck: Option<String>, rust_log: Option<String>, configured: &str) -> String {
    [quizdeck, rust_log]
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| configured.to_string())
}

fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global fmt subscriber appending to `path`. The terminal belongs
/// to the TUI, so nothing is written to stdout or stderr.
pub fn init(path: &Path, configured_level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let directive = filter_directive(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
        configured_level,
    );

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(&directive))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_precedence() {
        assert_eq!(filter_directive(None, None, "warn"), "warn");
        assert_eq!(filter_directive(None, Some("debug".into()), "warn"), "debug");
        assert_eq!(
            filter_directive(Some("quizdeck=trace".into()), Some("debug".into()), "warn"),
            "quizdeck=trace"
        );
        assert_eq!(filter_directive(Some("  ".into()), None, "error"), "error");
    }

    #[test]
    fn test_log_path_in_data_dir() {
        assert!(default_log_path().ends_with("quizdeck/quizdeck.log"));
    }
}
