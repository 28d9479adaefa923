use crate::engine::topic_stats::TopicStatsStore;

/// One topic's slice of the radial chart, derived from topic stats per render.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartEntry {
    pub label: String,
    /// First-attempt-correct count.
    pub correct: u32,
    pub total: u32,
    /// Angular weight.
    pub value: f64,
}

impl ChartEntry {
    pub fn mastery_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> u32 {
        (self.mastery_ratio() * 100.0).round() as u32
    }
}

/// Build chart entries in topic insertion order. When topics exist but all
/// weights are zero, every topic gets weight 1 so the ring still renders.
pub fn chart_entries(stats: &TopicStatsStore) -> Vec<ChartEntry> {
    let mut entries: Vec<ChartEntry> = stats
        .iter()
        .map(|(topic, s)| {
            let ratio = s.mastery_ratio();
            ChartEntry {
                label: topic.to_string(),
                correct: s.first_attempt_correct,
                total: s.total,
                value: ratio * s.total as f64,
            }
        })
        .collect();

    if !entries.is_empty() && entries.iter().all(|e| e.value == 0.0) {
        for entry in &mut entries {
            entry.value = 1.0;
        }
    }
    entries
}

/// (sum of first-attempt-correct, sum of totals) for the chart's center label.
pub fn totals(entries: &[ChartEntry]) -> (u32, u32) {
    entries
        .iter()
        .fold((0, 0), |(c, t), e| (c + e.correct, t + e.total))
}
