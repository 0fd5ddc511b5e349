use std::time::{Duration, Instant};

/// the message flashed over the clock when an alarm fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    message: String,
    shown_at: Instant,
    duration: Duration,
}

impl Notification {
    #[must_use]
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self::shown_at(message, duration, Instant::now())
    }

    #[must_use]
    pub fn shown_at(message: impl Into<String>, duration: Duration, shown_at: Instant) -> Self {
        Self {
            message: message.into(),
            shown_at,
            duration,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < self.duration
    }

    /// how long until it should be hidden
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration
            .saturating_sub(now.saturating_duration_since(self.shown_at))
    }
}
