use serde::{Deserialize, Serialize};

/// Per-topic tallies. `first_attempt_correct <= correct <= total` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicStats {
    pub total: u32,
    pub correct: u32,
    pub first_attempt_correct: u32,
}

impl TopicStats {
    pub fn mastery_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.first_attempt_correct as f64 / self.total as f64
        }
    }

    pub fn merge(&mut self, other: &TopicStats) {
        self.total += other.total;
        self.correct += other.correct;
        self.first_attempt_correct += other.first_attempt_correct;
    }
}

/// Topic tallies in first-encounter order. Entries are never removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicStatsStore {
    entries: Vec<(String, TopicStats)>,
}

impl TopicStatsStore {
    pub fn entry(&mut self, topic: &str) -> &mut TopicStats {
        let idx = match self.entries.iter().position(|(t, _)| t == topic) {
            Some(idx) => idx,
            None => {
                self.entries.push((topic.to_string(), TopicStats::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn get(&self, topic: &str) -> Option<&TopicStats> {
        self.entries
            .iter()
            .find(|(t, _)| t == topic)
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TopicStats)> {
        self.entries.iter().map(|(t, s)| (t.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn merge(&mut self, other: &TopicStatsStore) {
        for (topic, stats) in other.iter() {
            self.entry(topic).merge(stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_first_encounter_order() {
        let mut store = TopicStatsStore::default();
        store.entry("b").total += 1;
        store.entry("a").total += 1;
        store.entry("b").total += 1;
        let order: Vec<&str> = store.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(store.get("b").unwrap().total, 2);
        assert!(store.get("c").is_none());
    }

    #[test]
    fn test_mastery_ratio_zero_when_unattempted() {
        assert_eq!(TopicStats::default().mastery_ratio(), 0.0);
        let stats = TopicStats { total: 4, correct: 4, first_attempt_correct: 3 };
        assert!((stats.mastery_ratio() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_merge_adds_and_appends() {
        let mut a = TopicStatsStore::default();
        *a.entry("x") = TopicStats { total: 2, correct: 2, first_attempt_correct: 1 };
        let mut b = TopicStatsStore::default();
        *b.entry("y") = TopicStats { total: 1, correct: 0, first_attempt_correct: 0 };
        *b.entry("x") = TopicStats { total: 1, correct: 1, first_attempt_correct: 1 };
        a.merge(&b);
        assert_eq!(a.get("x"), Some(&TopicStats { total: 3, correct: 3, first_attempt_correct: 2 }));
        assert_eq!(a.iter().map(|(t, _)| t).collect::<Vec<_>>(), vec!["x", "y"]);
    }
}
