use crate::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    oscillator::OscNode,
    stereo::{Layered, StereoNode},
};

/// Which marker tone to play on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    /// Next step of a timeline, or a rest between groups.
    Progress,
    Tense,
    Release,
    /// C major triad at the end of a phase session.
    Completion,
}

const CUE_ATTACK: f32 = 0.02;

impl CueKind {
    pub fn frequencies(self) -> &'static [f32] {
        match self {
            CueKind::Progress => &[660.0],
            CueKind::Tense => &[440.0],
            CueKind::Release => &[330.0],
            CueKind::Completion => &[523.25, 659.25, 783.99],
        }
    }

    fn decay(self) -> f32 {
        match self {
            CueKind::Progress => 0.6,
            CueKind::Tense => 0.5,
            CueKind::Release => 0.9,
            CueKind::Completion => 2.0,
        }
    }
}

/// Short sine marker routed straight to the master bus, on top of whatever
/// soundscape is playing.
pub struct TransitionCue {
    pub kind: CueKind,
    pub node: Box<dyn StereoNode>,
    pub duration: f32,
}

impl TransitionCue {
    pub fn new(kind: CueKind, gain: f32) -> Self {
        let decay = kind.decay();
        let notes = kind.frequencies();
        // chord notes share the gain so the triad is no louder than one tone
        let note_gain = 1.0 / notes.len() as f32;

        let voices = notes
            .iter()
            .map(|&freq| -> Box<dyn StereoNode> {
                Box::new(
                    OscNode::sine()
                        .with_frequency(freq)
                        .amplify(EnvNode::perc(CUE_ATTACK, decay))
                        .panned(0.0)
                        .with_gain(note_gain),
                )
            })
            .collect();

        Self {
            kind,
            node: Box::new(Layered::new(voices).with_gain(gain)),
            duration: CUE_ATTACK + decay,
        }
    }
}
