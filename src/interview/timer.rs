/// Outcome of one scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Countdown still running; carries the seconds left.
    Running(u32),
    /// The countdown just reached zero. Fired exactly once per `start`.
    Expired,
    /// Timer is not active; the tick was ignored.
    Idle,
}

/// One-shot countdown bound to the active question.
///
/// Pure arithmetic driven by an external tick source, so tests can advance
/// it synthetically instead of sleeping. The session arms it on every
/// question advance and stops it the moment an answer comes in.
#[derive(Debug, Default)]
pub struct QuestionTimer {
    total: u32,
    remaining: u32,
    active: bool,
}

impl QuestionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the countdown with a fresh budget. Re-starting while already
    /// active is legal and simply resets (used on question advance).
    /// Callers guarantee `total_seconds > 0`.
    pub fn start(&mut self, total_seconds: u32) {
        self.total = total_seconds;
        self.remaining = total_seconds;
        self.active = true;
    }

    /// Halts the countdown. Idempotent.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Advances the countdown by one second. Returns `Expired` exactly
    /// once, on the tick that reaches zero while active, then deactivates
    /// itself; any later tick is a no-op.
    pub fn tick(&mut self) -> TimerTick {
        if !self.active {
            return TimerTick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            TimerTick::Expired
        } else {
            TimerTick::Running(self.remaining)
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Seconds consumed since the last `start`.
    pub fn elapsed(&self) -> u32 {
        self.total.saturating_sub(self.remaining)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
