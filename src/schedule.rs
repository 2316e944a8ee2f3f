// Check scheduling policy
//
// No timers here: the host polls is_due from its own loop and records each
// completed check. The time source is a u32 millisecond counter (Arduino
// millis() width); elapsed time uses wrapping subtraction so the ~49 day
// counter wraparound still yields a correct duration.

pub const DEFAULT_CHECK_INTERVAL_MS: u32 = 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerState {
    last_check_ms: u32,
    interval_ms: u32,
    auto_update: bool,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            last_check_ms: 0,
            interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            auto_update: false,
        }
    }
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_check_ms) >= self.interval_ms
    }

    pub fn record_check(&mut self, now_ms: u32) {
        self.last_check_ms = now_ms;
    }

    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms;
    }

    pub fn set_auto_update(&mut self, enabled: bool) {
        self.auto_update = enabled;
    }

    pub fn auto_update(&self) -> bool {
        self.auto_update
    }
}
