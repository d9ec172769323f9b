//! A time-windowed call coalescer.
//!
//! The throttle decides *when* a coalesced action is due; it never runs the
//! action itself. Callers report calls with [`Throttle::call`] and ask
//! whether the action should run now with [`Throttle::take_due`].
//!
//! Contract:
//! - The first call in a quiet window is due immediately.
//! - A call inside an active window schedules exactly one trailing fire at
//!   `last_fire + window`.
//! - Every call made while a fire is already scheduled collapses into it.
//! - At most one fire happens per window.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    last_fire: Option<Instant>,
    scheduled: Option<Instant>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fire: None,
            scheduled: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a call made at `now` and return the deadline of the fire it
    /// will be coalesced into.
    pub fn call(&mut self, now: Instant) -> Instant {
        if let Some(deadline) = self.scheduled {
            return deadline;
        }

        let deadline = match self.last_fire {
            Some(last) if now < last + self.window => last + self.window,
            _ => now,
        };
        self.scheduled = Some(deadline);
        deadline
    }

    /// The deadline of the scheduled fire, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.scheduled
    }

    pub fn is_armed(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Consume the scheduled fire if it is due at `now`.
    ///
    /// Returns `true` exactly once per scheduled fire; the caller must run
    /// the coalesced action when it does.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.scheduled {
            Some(deadline) if now >= deadline => {
                self.scheduled = None;
                self.last_fire = Some(now);
                true
            }
            _ => false,
        }
    }
}
