pub mod mastery;
pub mod scoring;
pub mod topic_stats;

pub use mastery::ChartEntry;
pub use scoring::{Score, ScoringPolicy};
pub use topic_stats::{TopicStats, TopicStatsStore};
