use std::time::{Duration, Instant};

/// A cancelable, one-shot delayed transition to the next question.
///
/// The UI tick polls `fire_if_due`; nothing runs on its own thread, so a
/// cancelled timer can never fire late.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdvanceTimer {
    deadline: Option<Instant>,
}

impl AdvanceTimer {
    /// Arm the timer. Returns false and leaves the existing deadline alone
    /// when one is already pending.
    pub fn schedule(&mut self, now: Instant, delay: Duration) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + delay);
        true
    }

    /// Disarm. Returns whether a transition was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
