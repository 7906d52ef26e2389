//! Fixed-rate publication gate.

use std::time::Duration;

/// Whether output is due at `now` given the last publication time.
/// A zero period publishes every tick.
pub fn should_publish(last_publication: Duration, now: Duration, period: Duration) -> bool {
    now.saturating_sub(last_publication) >= period
}

/// Gate that remembers its own last publication time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PublicationGate {
    period: Duration,
    last_publication: Option<Duration>,
}

impl PublicationGate {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_publication: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns true and stamps `now` when a publication is due. The first
    /// call always fires.
    pub fn try_fire(&mut self, now: Duration) -> bool {
        let due = match self.last_publication {
            None => true,
            Some(last) => should_publish(last, now, self.period),
        };
        if due {
            self.last_publication = Some(now);
        }
        due
    }
}
