//! Cooperative timer queue.
//!
//! Every periodic thing on the control side (the session clock's 1 Hz tick,
//! soundscape event generators, burst expiry) is a timer here. Time is
//! virtual: the host advances it by calling [`TimerQueue::next_due`] with the
//! wall-clock target, and each due timer is handed back one at a time in
//! deadline order.
//!
//! ```
//! use stillwater::timer::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let tick = timers.set_interval(1.0);
//! let mut fired = 0;
//! while let Some(id) = timers.next_due(3.5) {
//!     assert_eq!(id, tick);
//!     fired += 1;
//! }
//! assert_eq!(fired, 3);
//! assert_eq!(timers.now(), 3.5);
//! ```

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
struct Timer {
    deadline: f64,
    period: Option<f64>,
    // creation order, breaks deadline ties
    seq: u64,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: f64,
    next_id: u64,
    timers: HashMap<TimerId, Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    fn insert(&mut self, delay: f64, period: Option<f64>) -> TimerId {
        let seq = self.next_id;
        self.next_id += 1;
        let id = TimerId(seq);
        self.timers.insert(
            id,
            Timer {
                deadline: self.now + delay.max(0.0),
                period,
                seq,
            },
        );
        id
    }

    /// Fire every `period` seconds, first at `now + period`.
    pub fn set_interval(&mut self, period: f64) -> TimerId {
        // a zero period would spin forever inside next_due
        let period = period.max(1e-3);
        self.insert(period, Some(period))
    }

    /// Fire once, `delay` seconds from now.
    pub fn set_timeout(&mut self, delay: f64) -> TimerId {
        self.insert(delay, None)
    }

    /// Cancel a timer. Unknown or already cleared ids are ignored.
    pub fn clear(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Pop the earliest timer due at or before `until`, moving `now` to its
    /// deadline. Intervals are rescheduled, timeouts removed. Returns `None`
    /// (and moves `now` to `until`) when nothing else is due.
    pub fn next_due(&mut self, until: f64) -> Option<TimerId> {
        let due = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= until)
            .min_by(|(_, a), (_, b)| {
                a.deadline
                    .total_cmp(&b.deadline)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(id, t)| (*id, *t));

        match due {
            Some((id, timer)) => {
                self.now = self.now.max(timer.deadline);
                match timer.period {
                    Some(period) => {
                        if let Some(t) = self.timers.get_mut(&id) {
                            t.deadline += period;
                        }
                    }
                    None => {
                        self.timers.remove(&id);
                    }
                }
                Some(id)
            }
            None => {
                self.settle(until);
                None
            }
        }
    }

    /// Move `now` forward without firing anything.
    pub fn settle(&mut self, until: f64) {
        self.now = self.now.max(until);
    }
}
