//! Error types shared across the crate.

/// A script that cannot be played.
///
/// Raised when a script is constructed or handed to a controller, never
/// mid-session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("script has no steps")]
    EmptySteps,

    #[error("first step must start at offset 0, found {offset}")]
    FirstOffsetNotZero { offset: u32 },

    #[error("step {index} starts at {offset}s, not after the previous step at {previous}s")]
    NonIncreasingOffset { index: usize, previous: u32, offset: u32 },

    #[error("total duration {total}s ends before the last step at {last_offset}s")]
    DurationBeforeLastStep { total: u32, last_offset: u32 },

    #[error("phase script has no muscle groups")]
    EmptyPhaseScript,

    #[error("muscle group {index} ({name}) has a non-positive {phase} duration")]
    NonPositiveDuration {
        index: usize,
        name: String,
        phase: &'static str,
    },
}

/// Failures from the audio context or its output backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("audio playback blocked: {0}")]
    Blocked(String),

    #[error("audio context is closed")]
    Closed,
}

/// Failures reported by a speech backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("speech synthesis is not available on this platform")]
    Unavailable,

    #[error("speech backend error: {0}")]
    Backend(String),
}

/// A soundscape name outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown soundscape '{0}'")]
pub struct UnknownSoundscape(pub String);

/// Errors surfaced by the playback controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid script: {0}")]
    Script(#[from] ScriptError),

    #[error("session already started")]
    AlreadyStarted,
}
