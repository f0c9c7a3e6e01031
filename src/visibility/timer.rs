use std::time::{Duration, Instant};

/// Single-shot deferred hide. Arming replaces any pending deadline.
#[derive(Debug, Clone)]
pub struct HideTimer {
    delay: Duration,
    scheduled_at: Option<Instant>,
}

impl HideTimer {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            scheduled_at: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.scheduled_at = Some(now);
    }

    /// Returns true if a pending hide was dropped. Has no effect once fired.
    pub fn cancel(&mut self) -> bool {
        self.scheduled_at.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.scheduled_at.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.scheduled_at.map(|at| at + self.delay)
    }

    /// Fires at most once per arm.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.scheduled_at = None;
                true
            }
            _ => false,
        }
    }
}
