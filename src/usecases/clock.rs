use chrono::Utc;

/// Converts wall time into whole engine ticks (one tick per second). The
/// sync engine and the auth cooldown are tick-driven so that tests control
/// time explicitly.
pub trait TickClock {
    fn ticks_elapsed(&mut self) -> u32;
}

pub struct WallClock {
    last_unix: i64,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            last_unix: Utc::now().timestamp(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickClock for WallClock {
    fn ticks_elapsed(&mut self) -> u32 {
        let now = Utc::now().timestamp();
        let elapsed = now.saturating_sub(self.last_unix).max(0);
        self.last_unix = now;
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
pub struct ManualClock {
    pub pending: u32,
}

#[cfg(test)]
impl TickClock for ManualClock {
    fn ticks_elapsed(&mut self) -> u32 {
        std::mem::take(&mut self.pending)
    }
}
