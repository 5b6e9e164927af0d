use crate::{
    session::{
        phase::{Phase, PhaseEntry, PhaseStateMachine},
        script::SessionScript,
        timeline::ScriptTimeline,
    },
    soundscape::{CueKind, SoundscapeId},
};

/// Where a session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Step(usize),
    Phase { phase: Phase, group: usize },
}

/// Something the controller should act on.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub position: Position,
    /// Text to speak, if the position changed.
    pub narration: Option<String>,
    pub cue: Option<CueKind>,
    /// Soundscape the new position asks for.
    pub ambient: Option<SoundscapeId>,
    /// The session has reached its end.
    pub finished: bool,
}

/// How a session moves forward, chosen once from the script kind.
#[derive(Debug, Clone)]
pub enum Strategy {
    Timeline(ScriptTimeline),
    Phases(PhaseStateMachine),
}

impl Strategy {
    pub fn new(script: &SessionScript) -> Self {
        match script {
            SessionScript::Timeline(script) => Strategy::Timeline(ScriptTimeline::new(script.clone())),
            SessionScript::Phases(script) => Strategy::Phases(PhaseStateMachine::new(script.clone())),
        }
    }

    /// Enter the first step or the intro. Narrated, but without a cue.
    pub fn begin(&mut self) -> Transition {
        match self {
            Strategy::Timeline(timeline) => {
                timeline.sync(0);
                let step = timeline.active_step();
                Transition {
                    position: Position::Step(0),
                    narration: step.map(|s| s.narration_text.clone()),
                    cue: None,
                    ambient: step.and_then(|s| s.ambient_theme),
                    finished: timeline.take_completion(),
                }
            }
            Strategy::Phases(machine) => {
                let entry = machine.current_entry();
                let ambient = machine.script().soundscape;
                Transition {
                    ambient,
                    cue: None,
                    ..phase_transition(entry, false)
                }
            }
        }
    }

    /// Move `delta` seconds forward.
    ///
    /// Phase sessions step through every second in between and report the
    /// last phase entered.
    pub fn advance(&mut self, delta: u32) -> Option<Transition> {
        match self {
            Strategy::Timeline(timeline) => {
                let target = timeline.elapsed() + delta;
                let changed = timeline.sync(target);
                let finished = timeline.take_completion();
                let index = timeline.active()?;
                if changed.is_none() && !finished {
                    return None;
                }
                let step = changed.and_then(|_| timeline.active_step());
                Some(Transition {
                    position: Position::Step(index),
                    narration: step.map(|s| s.narration_text.clone()),
                    cue: step.map(|_| CueKind::Progress),
                    ambient: step.and_then(|s| s.ambient_theme),
                    finished,
                })
            }
            Strategy::Phases(machine) => {
                let entry = machine.advance(delta)?;
                let finished = entry.phase == Phase::Complete;
                Some(phase_transition(entry, finished))
            }
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Strategy::Timeline(timeline) => Position::Step(timeline.active().unwrap_or(0)),
            Strategy::Phases(machine) => Position::Phase {
                phase: machine.phase(),
                group: machine.group_index(),
            },
        }
    }

    /// Timeline sessions stop themselves at the end; phase sessions rest on
    /// `complete` until stopped.
    ///
    /// A timeline's last line is left to finish when it stops itself, even
    /// when that step starts on the final second.
    pub fn stops_on_finish(&self) -> bool {
        matches!(self, Strategy::Timeline(_))
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Strategy::Timeline(timeline) => timeline.is_finished(),
            Strategy::Phases(machine) => machine.is_complete(),
        }
    }

    pub fn progress(&self) -> f32 {
        match self {
            Strategy::Timeline(timeline) => timeline.progress(),
            Strategy::Phases(machine) => machine.progress(),
        }
    }

    /// Display text and visual cue label for the current position.
    pub fn display(&self) -> (String, Option<String>) {
        match self {
            Strategy::Timeline(timeline) => timeline
                .active_step()
                .map(|s| (s.display_label.clone(), s.visual_cue_label.clone()))
                .unwrap_or_default(),
            Strategy::Phases(machine) => {
                let region = match machine.phase() {
                    Phase::Tense | Phase::Release => machine.group().map(|g| g.body_region.clone()),
                    _ => None,
                };
                (machine.current_entry().narration, region)
            }
        }
    }

    /// `(completed, total)` muscle groups. Zero for timelines.
    pub fn groups(&self) -> (usize, usize) {
        match self {
            Strategy::Timeline(_) => (0, 0),
            Strategy::Phases(machine) => (machine.completed_groups().len(), machine.total_groups()),
        }
    }
}

fn phase_transition(entry: PhaseEntry, finished: bool) -> Transition {
    Transition {
        position: Position::Phase {
            phase: entry.phase,
            group: entry.group,
        },
        narration: Some(entry.narration),
        cue: entry.cue,
        ambient: None,
        finished,
    }
}
