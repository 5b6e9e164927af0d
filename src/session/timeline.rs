use crate::session::script::{Script, Step};

/// Index of the step active at `elapsed`: the last `i` with
/// `offsets[i] <= elapsed`. `None` only before the first offset.
///
/// ```
/// use stillwater::session::timeline::resolve_step;
///
/// let offsets = [0, 10, 20];
/// assert_eq!(resolve_step(&offsets, 9), Some(0));
/// assert_eq!(resolve_step(&offsets, 10), Some(1));
/// assert_eq!(resolve_step(&offsets, 99), Some(2));
/// ```
pub fn resolve_step(offsets: &[u32], elapsed: u32) -> Option<usize> {
    offsets.iter().rposition(|&offset| offset <= elapsed)
}

/// Tracks the active step of a flat script as elapsed time moves forward.
#[derive(Debug, Clone)]
pub struct ScriptTimeline {
    script: Script,
    offsets: Vec<u32>,
    active: Option<usize>,
    elapsed: u32,
    completion_signaled: bool,
}

impl ScriptTimeline {
    pub fn new(script: Script) -> Self {
        let offsets = script.offsets();
        Self {
            script,
            offsets,
            active: None,
            elapsed: 0,
            completion_signaled: false,
        }
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_step(&self) -> Option<&Step> {
        self.active.and_then(|i| self.script.steps.get(i))
    }

    /// Resolve at `elapsed` and report the new index if it changed.
    ///
    /// Repeated calls with the same time report nothing; an index earlier
    /// than the current one is never reported.
    pub fn sync(&mut self, elapsed: u32) -> Option<usize> {
        self.elapsed = self.elapsed.max(elapsed);
        let index = resolve_step(&self.offsets, self.elapsed)?;
        match self.active {
            Some(active) if index <= active => None,
            _ => {
                self.active = Some(index);
                Some(index)
            }
        }
    }

    /// True once, the first time elapsed reaches the total duration.
    pub fn take_completion(&mut self) -> bool {
        if self.completion_signaled || self.elapsed < self.script.total_duration_seconds {
            return false;
        }
        self.completion_signaled = true;
        true
    }

    pub fn is_finished(&self) -> bool {
        self.completion_signaled
    }

    pub fn progress(&self) -> f32 {
        let total = self.script.total_duration_seconds;
        if total == 0 {
            return 1.0;
        }
        (self.elapsed as f32 / total as f32).min(1.0)
    }
}
