//! Accumulator-plus-deadline timer.
//!
//! Every cooldown, grace period and ability window in the simulation is a
//! [`TimedState`]: it is started (elapsed reset to zero, marked active),
//! advanced once per tick by the frame delta in milliseconds, and compared
//! against its deadline. Expiry is a plain threshold test and the owner
//! decides whether the check happens before or after the advance.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedState {
    /// Milliseconds accumulated since the last start.
    pub elapsed: f32,
    /// Threshold in milliseconds.
    pub deadline: f32,
    pub active: bool,
}

impl TimedState {
    /// Inactive timer with the given deadline in milliseconds.
    pub fn new(deadline_ms: f32) -> Self {
        Self {
            elapsed: 0.0,
            deadline: deadline_ms,
            active: false,
        }
    }

    /// Reset elapsed time and mark active.
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }

    /// Reset elapsed time and mark inactive.
    pub fn stop(&mut self) {
        self.elapsed = 0.0;
        self.active = false;
    }

    /// Reset elapsed time without touching the active flag.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.elapsed += dt_ms;
    }

    /// Strictly past the deadline.
    pub fn expired(&self) -> bool {
        self.elapsed > self.deadline
    }

    /// Still inside the window (deadline inclusive).
    pub fn within(&self) -> bool {
        self.elapsed <= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_is_inactive() {
        let t = TimedState::new(100.0);
        assert!(!t.active);
        assert_eq!(t.elapsed, 0.0);
        assert!(t.within());
    }

    #[test]
    fn expiry_is_strictly_after_deadline() {
        let mut t = TimedState::new(100.0);
        t.start();
        t.advance(100.0);
        assert!(!t.expired());
        assert!(t.within());
        t.advance(0.5);
        assert!(t.expired());
    }

    #[test]
    fn stop_and_reset_differ_on_active() {
        let mut t = TimedState::new(30.0);
        t.start();
        t.advance(50.0);
        t.reset();
        assert!(t.active);
        assert_eq!(t.elapsed, 0.0);
        t.advance(10.0);
        t.stop();
        assert!(!t.active);
        assert_eq!(t.elapsed, 0.0);
    }
}
