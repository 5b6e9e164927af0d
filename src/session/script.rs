#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::ScriptError, soundscape::SoundscapeId};

/// One entry of a flat timeline.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Seconds from session start.
    pub offset_seconds: u32,
    pub narration_text: String,
    pub display_label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visual_cue_label: Option<String>,
    /// Soundscape to switch to when this step begins.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ambient_theme: Option<SoundscapeId>,
}

/// A flat, offset-indexed guided session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    pub total_duration_seconds: u32,
    pub steps: Vec<Step>,
}

impl Script {
    /// Start building a script of `total_duration_seconds`.
    pub fn builder(id: impl Into<String>, total_duration_seconds: u32) -> ScriptBuilder {
        ScriptBuilder {
            script: Script {
                id: id.into(),
                title: None,
                total_duration_seconds,
                steps: Vec::new(),
            },
        }
    }

    /// Check the step offsets and total duration.
    pub fn validate(&self) -> Result<(), ScriptError> {
        let first = self.steps.first().ok_or(ScriptError::EmptySteps)?;
        if first.offset_seconds != 0 {
            return Err(ScriptError::FirstOffsetNotZero {
                offset: first.offset_seconds,
            });
        }

        for (index, pair) in self.steps.windows(2).enumerate() {
            let (previous, offset) = (pair[0].offset_seconds, pair[1].offset_seconds);
            if offset <= previous {
                return Err(ScriptError::NonIncreasingOffset {
                    index: index + 1,
                    previous,
                    offset,
                });
            }
        }

        let last_offset = self.steps.last().map_or(0, |s| s.offset_seconds);
        if self.total_duration_seconds < last_offset {
            return Err(ScriptError::DurationBeforeLastStep {
                total: self.total_duration_seconds,
                last_offset,
            });
        }
        Ok(())
    }

    pub fn offsets(&self) -> Vec<u32> {
        self.steps.iter().map(|s| s.offset_seconds).collect()
    }
}

/// Fluent construction of a [`Script`]; `with_*` calls apply to the last step.
pub struct ScriptBuilder {
    script: Script,
}

impl ScriptBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.script.title = Some(title.into());
        self
    }

    /// Add a step. The narration doubles as the display label until
    /// `with_label` says otherwise.
    pub fn step(mut self, offset_seconds: u32, narration: impl Into<String>) -> Self {
        let narration_text = narration.into();
        self.script.steps.push(Step {
            offset_seconds,
            display_label: narration_text.clone(),
            narration_text,
            visual_cue_label: None,
            ambient_theme: None,
        });
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        if let Some(step) = self.script.steps.last_mut() {
            step.display_label = label.into();
        }
        self
    }

    pub fn with_visual_cue(mut self, cue: impl Into<String>) -> Self {
        if let Some(step) = self.script.steps.last_mut() {
            step.visual_cue_label = Some(cue.into());
        }
        self
    }

    pub fn with_ambient(mut self, theme: SoundscapeId) -> Self {
        if let Some(step) = self.script.steps.last_mut() {
            step.ambient_theme = Some(theme);
        }
        self
    }

    pub fn build(self) -> Result<Script, ScriptError> {
        self.script.validate()?;
        Ok(self.script)
    }
}

/// One muscle group of a progressive relaxation session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MuscleGroup {
    pub name: String,
    pub tense_instruction: String,
    pub release_instruction: String,
    pub tense_duration_seconds: u32,
    pub release_duration_seconds: u32,
    pub body_region: String,
}

impl MuscleGroup {
    pub fn new(
        name: impl Into<String>,
        tense_instruction: impl Into<String>,
        release_instruction: impl Into<String>,
        tense_duration_seconds: u32,
        release_duration_seconds: u32,
        body_region: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tense_instruction: tense_instruction.into(),
            release_instruction: release_instruction.into(),
            tense_duration_seconds,
            release_duration_seconds,
            body_region: body_region.into(),
        }
    }
}

/// Spoken lines of a phase session that don't belong to a group.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseNarration {
    pub intro: String,
    pub rest: String,
    pub completion: String,
}

impl Default for PhaseNarration {
    fn default() -> Self {
        Self {
            intro: "Find a comfortable position and close your eyes. Breathe slowly.".into(),
            rest: "Good. Notice the difference as the tension leaves.".into(),
            completion: "Well done. Your whole body is relaxed. Rest here as long as you like."
                .into(),
        }
    }
}

/// A progressive muscle relaxation session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseScript {
    pub id: String,
    pub groups: Vec<MuscleGroup>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub narration: PhaseNarration,
    #[cfg_attr(feature = "serde", serde(default))]
    pub soundscape: Option<SoundscapeId>,
}

impl PhaseScript {
    pub fn new(id: impl Into<String>, groups: Vec<MuscleGroup>) -> Self {
        Self {
            id: id.into(),
            groups,
            narration: PhaseNarration::default(),
            soundscape: None,
        }
    }

    pub fn with_narration(mut self, narration: PhaseNarration) -> Self {
        self.narration = narration;
        self
    }

    pub fn with_soundscape(mut self, soundscape: SoundscapeId) -> Self {
        self.soundscape = Some(soundscape);
        self
    }

    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.groups.is_empty() {
            return Err(ScriptError::EmptyPhaseScript);
        }
        for (index, group) in self.groups.iter().enumerate() {
            let phase = if group.tense_duration_seconds == 0 {
                "tense"
            } else if group.release_duration_seconds == 0 {
                "release"
            } else {
                continue;
            };
            return Err(ScriptError::NonPositiveDuration {
                index,
                name: group.name.clone(),
                phase,
            });
        }
        Ok(())
    }
}

/// Either kind of session. The variant picks the playback strategy.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionScript {
    Timeline(Script),
    Phases(PhaseScript),
}

impl SessionScript {
    pub fn validate(&self) -> Result<(), ScriptError> {
        match self {
            SessionScript::Timeline(script) => script.validate(),
            SessionScript::Phases(script) => script.validate(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SessionScript::Timeline(script) => &script.id,
            SessionScript::Phases(script) => &script.id,
        }
    }
}

impl From<Script> for SessionScript {
    fn from(script: Script) -> Self {
        SessionScript::Timeline(script)
    }
}

impl From<PhaseScript> for SessionScript {
    fn from(script: PhaseScript) -> Self {
        SessionScript::Phases(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(tense: u32, release: u32) -> MuscleGroup {
        MuscleGroup::new("Hands", "Make fists.", "Let go.", tense, release, "arms")
    }

    #[test]
    fn builder_produces_valid_script() {
        let script = Script::builder("evening", 30)
            .title("Evening wind-down")
            .step(0, "Settle in.")
            .with_ambient(SoundscapeId::Rain)
            .step(10, "Breathe in slowly.")
            .with_label("Breathe")
            .with_visual_cue("expand")
            .step(20, "And rest.")
            .build()
            .unwrap();

        assert_eq!(script.offsets(), vec![0, 10, 20]);
        assert_eq!(script.steps[0].display_label, "Settle in.");
        assert_eq!(script.steps[1].display_label, "Breathe");
        assert_eq!(script.steps[1].visual_cue_label.as_deref(), Some("expand"));
        assert_eq!(script.steps[0].ambient_theme, Some(SoundscapeId::Rain));
    }

    #[test]
    fn malformed_scripts_are_rejected() {
        assert_eq!(
            Script::builder("x", 10).build(),
            Err(ScriptError::EmptySteps)
        );
        assert_eq!(
            Script::builder("x", 10).step(2, "late").build(),
            Err(ScriptError::FirstOffsetNotZero { offset: 2 })
        );
        assert_eq!(
            Script::builder("x", 30).step(0, "a").step(10, "b").step(10, "c").build(),
            Err(ScriptError::NonIncreasingOffset {
                index: 2,
                previous: 10,
                offset: 10
            })
        );
        assert_eq!(
            Script::builder("x", 5).step(0, "a").step(10, "b").build(),
            Err(ScriptError::DurationBeforeLastStep {
                total: 5,
                last_offset: 10
            })
        );
    }

    #[test]
    fn total_may_equal_last_offset() {
        assert!(Script::builder("x", 10).step(0, "a").step(10, "b").build().is_ok());
    }

    #[test]
    fn phase_scripts_need_groups_with_durations() {
        assert_eq!(
            PhaseScript::new("pmr", vec![]).validate(),
            Err(ScriptError::EmptyPhaseScript)
        );
        assert!(matches!(
            PhaseScript::new("pmr", vec![group(7, 15), group(0, 15)]).validate(),
            Err(ScriptError::NonPositiveDuration { index: 1, phase: "tense", .. })
        ));
        assert!(matches!(
            PhaseScript::new("pmr", vec![group(7, 0)]).validate(),
            Err(ScriptError::NonPositiveDuration { index: 0, phase: "release", .. })
        ));
        assert!(PhaseScript::new("pmr", vec![group(7, 15)]).validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn session_scripts_are_tagged_by_kind() {
        let json = r#"{
            "kind": "phases",
            "id": "pmr",
            "soundscape": "drone",
            "groups": [{
                "name": "Shoulders",
                "tense_instruction": "Lift them to your ears.",
                "release_instruction": "Drop them.",
                "tense_duration_seconds": 7,
                "release_duration_seconds": 15,
                "body_region": "upper"
            }]
        }"#;
        let script: SessionScript = serde_json::from_str(json).unwrap();
        let SessionScript::Phases(phases) = &script else {
            panic!("expected a phase script");
        };
        assert_eq!(phases.soundscape, Some(SoundscapeId::Drone));
        assert_eq!(phases.narration, PhaseNarration::default());
        assert!(script.validate().is_ok());

        let json = r#"{
            "kind": "timeline",
            "id": "t",
            "total_duration_seconds": 20,
            "steps": [{"offset_seconds": 0, "narration_text": "Hi", "display_label": "Hi"}]
        }"#;
        let script: SessionScript = serde_json::from_str(json).unwrap();
        assert_eq!(script.id(), "t");
    }
}
