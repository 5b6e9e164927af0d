use crate::timer::{TimerId, TimerQueue};

/// Pausable 1 Hz tick source.
///
/// Owns one interval on the session's [`TimerQueue`] while running. Pausing
/// clears the interval but keeps `elapsed`; starting again arms a fresh one.
#[derive(Debug, Default)]
pub struct SessionClock {
    timer: Option<TimerId>,
    elapsed: u32,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Start or resume ticking. Does nothing if already running.
    pub fn start(&mut self, timers: &mut TimerQueue) {
        if self.timer.is_none() {
            self.timer = Some(timers.set_interval(1.0));
        }
    }

    pub fn pause(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.timer.take() {
            timers.clear(id);
        }
    }

    /// Count a tick if `id` is this clock's interval.
    pub fn on_tick(&mut self, id: TimerId) -> bool {
        if self.timer != Some(id) {
            return false;
        }
        self.elapsed += 1;
        true
    }

    /// Stop and rewind to zero.
    pub fn reset(&mut self, timers: &mut TimerQueue) {
        self.pause(timers);
        self.elapsed = 0;
    }
}
