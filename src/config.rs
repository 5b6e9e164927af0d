//! Session configuration.
//!
//! Build with the fluent setters:
//!
//! ```
//! use stillwater::{SessionConfig, SoundscapeId};
//!
//! let config = SessionConfig::new()
//!     .volume(60)
//!     .speech_rate(0.8)
//!     .default_soundscape(SoundscapeId::Rain)
//!     .seed(42);
//! assert_eq!(config.volume, 60);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::soundscape::SoundscapeId;

/// Voice-name fragments preferred for narration, matched case-insensitively.
pub const DEFAULT_VOICE_HINTS: &[&str] = &[
    "calm", "natural", "female", "samantha", "serena", "karen", "moira", "zira",
];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Initial master volume, 0-100.
    pub volume: u8,
    /// Start muted.
    pub muted: bool,
    /// Narration rate relative to natural speech (1.0).
    pub speech_rate: f32,
    /// Voice-name fragments tried in order when choosing a narration voice.
    pub voice_hints: Vec<String>,
    /// Linear gain of transition cues before the master gain.
    pub cue_gain: f32,
    /// Seed for all synthesis randomness. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Ambient bed used when the script names none.
    pub default_soundscape: Option<SoundscapeId>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            volume: 70,
            muted: false,
            speech_rate: 0.85,
            voice_hints: DEFAULT_VOICE_HINTS.iter().map(|s| s.to_string()).collect(),
            cue_gain: 0.2,
            seed: None,
            default_soundscape: None,
        }
    }

    pub fn volume(mut self, volume: u8) -> Self {
        self.volume = volume.min(100);
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn speech_rate(mut self, rate: f32) -> Self {
        self.speech_rate = rate.clamp(0.1, 2.0);
        self
    }

    pub fn voice_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.voice_hints = hints.into_iter().map(Into::into).collect();
        self
    }

    pub fn cue_gain(mut self, gain: f32) -> Self {
        self.cue_gain = gain.clamp(0.0, 1.0);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn default_soundscape(mut self, soundscape: SoundscapeId) -> Self {
        self.default_soundscape = Some(soundscape);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
