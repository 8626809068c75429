use serde::{Deserialize, Serialize};

/// A tick countdown. Armed with a tick count, decremented once per tick,
/// never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Countdown(u32);

impl Countdown {
    pub const IDLE: Self = Self(0);

    pub const fn new(ticks: u32) -> Self {
        Self(ticks)
    }

    pub fn arm(&mut self, ticks: u32) {
        self.0 = ticks;
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Advance one tick. Returns `true` only on the tick the countdown
    /// reaches zero, which is where callers hang their state exits.
    pub fn tick(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        self.0 == 0
    }

    pub fn is_running(&self) -> bool {
        self.0 > 0
    }

    pub fn remaining(&self) -> u32 {
        self.0
    }
}
