use crate::{
    session::script::{MuscleGroup, PhaseScript},
    soundscape::CueKind,
};

/*
Progressive Muscle Relaxation
=============================

  intro ─→ tense ─→ release ─┬─→ rest ─→ tense (next group) ─→ ...
   5 s    group's   group's  │    5 s
          tense     release  └─→ complete (after the last group)

Each phase counts its own seconds (`phase_time`) from zero on entry; elapsed
session time plays no part. A group counts as completed when its release
phase runs out. `complete` is terminal and just sits there.
*/

pub const INTRO_SECONDS: u32 = 5;
pub const REST_SECONDS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Tense,
    Release,
    Rest,
    Complete,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Intro => "Intro",
            Phase::Tense => "Tense",
            Phase::Release => "Release",
            Phase::Rest => "Rest",
            Phase::Complete => "Complete",
        }
    }
}

/// What to say and sound on entering a phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseEntry {
    pub phase: Phase,
    pub group: usize,
    pub narration: String,
    pub cue: Option<CueKind>,
}

#[derive(Debug, Clone)]
pub struct PhaseStateMachine {
    script: PhaseScript,
    phase: Phase,
    group: usize,
    phase_time: u32,
    elapsed: u32,
    completed: Vec<usize>,
}

impl PhaseStateMachine {
    pub fn new(script: PhaseScript) -> Self {
        Self {
            script,
            phase: Phase::Intro,
            group: 0,
            phase_time: 0,
            elapsed: 0,
            completed: Vec::new(),
        }
    }

    pub fn script(&self) -> &PhaseScript {
        &self.script
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn group_index(&self) -> usize {
        self.group
    }

    pub fn group(&self) -> Option<&MuscleGroup> {
        self.script.groups.get(self.group)
    }

    /// Seconds spent in the current phase.
    pub fn phase_time(&self) -> u32 {
        self.phase_time
    }

    /// Indices of groups whose release has finished, in order.
    pub fn completed_groups(&self) -> &[usize] {
        &self.completed
    }

    pub fn total_groups(&self) -> usize {
        self.script.groups.len()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Seconds from the start of the intro to `complete`.
    pub fn total_seconds(&self) -> u32 {
        let groups: u32 = self
            .script
            .groups
            .iter()
            .map(|g| g.tense_duration_seconds + g.release_duration_seconds)
            .sum();
        let rests = self.total_groups().saturating_sub(1) as u32 * REST_SECONDS;
        INTRO_SECONDS + groups + rests
    }

    pub fn progress(&self) -> f32 {
        if self.is_complete() {
            return 1.0;
        }
        (self.elapsed as f32 / self.total_seconds().max(1) as f32).min(1.0)
    }

    /// Entry for the phase currently active, as narrated when it began.
    pub fn current_entry(&self) -> PhaseEntry {
        let narration = &self.script.narration;
        let (text, cue) = match (self.phase, self.group()) {
            (Phase::Intro, _) => (narration.intro.clone(), None),
            (Phase::Tense, Some(g)) => (
                format!("{}. {}", g.name, g.tense_instruction),
                Some(CueKind::Tense),
            ),
            (Phase::Release, Some(g)) => (g.release_instruction.clone(), Some(CueKind::Release)),
            (Phase::Rest, _) => (narration.rest.clone(), Some(CueKind::Progress)),
            (Phase::Complete, _) => (narration.completion.clone(), Some(CueKind::Completion)),
            // validated scripts always have the active group
            (_, None) => (String::new(), None),
        };
        PhaseEntry {
            phase: self.phase,
            group: self.group,
            narration: text,
            cue,
        }
    }

    fn phase_duration(&self) -> Option<u32> {
        match self.phase {
            Phase::Intro => Some(INTRO_SECONDS),
            Phase::Tense => self.group().map(|g| g.tense_duration_seconds),
            Phase::Release => self.group().map(|g| g.release_duration_seconds),
            Phase::Rest => Some(REST_SECONDS),
            Phase::Complete => None,
        }
    }

    /// Advance one second. Returns the new phase's entry when one begins.
    pub fn tick(&mut self) -> Option<PhaseEntry> {
        let duration = self.phase_duration()?;
        self.elapsed += 1;
        self.phase_time += 1;
        if self.phase_time < duration {
            return None;
        }

        self.phase_time = 0;
        self.phase = match self.phase {
            Phase::Intro => Phase::Tense,
            Phase::Tense => Phase::Release,
            Phase::Release => {
                self.completed.push(self.group);
                if self.group + 1 < self.total_groups() {
                    Phase::Rest
                } else {
                    Phase::Complete
                }
            }
            Phase::Rest => {
                self.group += 1;
                Phase::Tense
            }
            Phase::Complete => Phase::Complete,
        };
        Some(self.current_entry())
    }

    /// Advance `seconds`, one second at a time. Returns the last entry.
    pub fn advance(&mut self, seconds: u32) -> Option<PhaseEntry> {
        (0..seconds).fold(None, |last, _| self.tick().or(last))
    }
}
