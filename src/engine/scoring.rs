use serde::{Deserialize, Serialize};

/// Point constants for streak-sensitive scoring.
///
/// A first-try correct answer at streak level `s` gains
/// `round(gain_base + gain_base * s * gain_step)`; an incorrect submission at
/// lose-streak level `l` loses `round(loss_base + loss_base * l * loss_step)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    #[serde(default = "default_gain_base")]
    pub gain_base: f64,
    #[serde(default = "default_step")]
    pub gain_step: f64,
    #[serde(default = "default_loss_base")]
    pub loss_base: f64,
    #[serde(default = "default_step")]
    pub loss_step: f64,
}

fn default_gain_base() -> f64 {
    100.0
}
fn default_loss_base() -> f64 {
    50.0
}
fn default_step() -> f64 {
    0.15
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            gain_base: default_gain_base(),
            gain_step: default_step(),
            loss_base: default_loss_base(),
            loss_step: default_step(),
        }
    }
}

impl ScoringPolicy {
    pub fn gain(&self, streak: u32) -> u64 {
        round_delta(self.gain_base + self.gain_base * streak as f64 * self.gain_step)
    }

    pub fn loss(&self, lose_streak: u32) -> u64 {
        round_delta(self.loss_base + self.loss_base * lose_streak as f64 * self.loss_step)
    }
}

// Half-up on each delta; deltas are never negative so f64::round agrees.
fn round_delta(raw: f64) -> u64 {
    raw.max(0.0).round() as u64
}

/// Points and the two mutually exclusive streak counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub points: u64,
    pub streak: u32,
    pub lose_streak: u32,
}

impl Score {
    /// Correct on the first submission of a presentation. Returns points gained.
    pub fn apply_correct_first(&mut self, policy: &ScoringPolicy) -> i64 {
        self.streak += 1;
        self.lose_streak = 0;
        let gained = policy.gain(self.streak);
        self.points += gained;
        gained as i64
    }

    /// Correct after at least one miss: both streaks reset, no points move.
    pub fn apply_correct_retry(&mut self) -> i64 {
        self.streak = 0;
        self.lose_streak = 0;
        0
    }

    /// Incorrect submission. Returns the (non-positive) applied delta, which
    /// may be smaller in magnitude than the computed loss when clamped at 0.
    pub fn apply_incorrect(&mut self, policy: &ScoringPolicy) -> i64 {
        self.streak = 0;
        self.lose_streak += 1;
        let lost = policy.loss(self.lose_streak);
        let before = self.points;
        self.points = self.points.saturating_sub(lost);
        -((before - self.points) as i64)
    }
}
