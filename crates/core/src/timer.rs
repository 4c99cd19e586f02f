use serde::Serialize;

/// Per-question pacing countdown, in whole seconds.
///
/// Reaching zero never ends anything: the countdown wraps back to its full
/// duration and keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountdownTimer {
    duration: u32,
    remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    Counting(u32),
    /// The countdown hit zero and restarted at full duration.
    Wrapped,
}

impl CountdownTimer {
    pub fn new(duration: u32) -> Self {
        let duration = duration.max(1);
        Self {
            duration,
            remaining: duration,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self) -> TimerTick {
        if self.remaining <= 1 {
            self.remaining = self.duration;
            TimerTick::Wrapped
        } else {
            self.remaining -= 1;
            TimerTick::Counting(self.remaining)
        }
    }
}
