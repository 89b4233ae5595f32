use std::time::{Duration, Instant};

/// Tracks whether the user is editing the test form.
///
/// Focus anywhere inside the form marks the user as interacting. Leaving the
/// form starts a cool-down; the guard only releases once the cool-down has
/// fully elapsed, and refocusing before then cancels the pending release.
/// Moving between fields inside the form is not a release.
#[derive(Debug, Clone)]
pub struct InteractionGuard {
    cooldown: Duration,
    focused: bool,
    release_at: Option<Instant>,
}

impl InteractionGuard {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            focused: false,
            release_at: None,
        }
    }

    pub fn focus_gained(&mut self) {
        self.focused = true;
        self.release_at = None;
    }

    pub fn focus_lost(&mut self, now: Instant) {
        if !self.focused {
            return;
        }
        self.focused = false;
        self.release_at = Some(now + self.cooldown);
    }

    pub fn is_interacting(&self, now: Instant) -> bool {
        self.focused || self.release_at.is_some_and(|at| now < at)
    }
}
