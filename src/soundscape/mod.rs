//! Synthesized ambience: the soundscape catalog, how each one is built, and
//! the engine that keeps exactly one of them playing.

use std::{fmt, str::FromStr};

use crate::error::UnknownSoundscape;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod cue;
pub mod engine;
pub mod events;
pub mod textures;

pub use cue::{CueKind, TransitionCue};
pub use engine::{AudioGraphHandle, AudioSynthesisEngine};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundscapeId {
    Ocean,
    Rain,
    Stream,
    Fire,
    Birds,
    WindChimes,
    Drone,
    Binaural,
    Solfeggio,
}

impl SoundscapeId {
    pub const ALL: [SoundscapeId; 9] = [
        SoundscapeId::Ocean,
        SoundscapeId::Rain,
        SoundscapeId::Stream,
        SoundscapeId::Fire,
        SoundscapeId::Birds,
        SoundscapeId::WindChimes,
        SoundscapeId::Drone,
        SoundscapeId::Binaural,
        SoundscapeId::Solfeggio,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SoundscapeId::Ocean => "ocean",
            SoundscapeId::Rain => "rain",
            SoundscapeId::Stream => "stream",
            SoundscapeId::Fire => "fire",
            SoundscapeId::Birds => "birds",
            SoundscapeId::WindChimes => "wind_chimes",
            SoundscapeId::Drone => "drone",
            SoundscapeId::Binaural => "binaural",
            SoundscapeId::Solfeggio => "solfeggio",
        }
    }

    pub fn definition(self) -> SoundscapeDefinition {
        catalog(self)
    }
}

impl fmt::Display for SoundscapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SoundscapeId {
    type Err = UnknownSoundscape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        SoundscapeId::ALL
            .into_iter()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| UnknownSoundscape(s.to_string()))
    }
}

/// Filtered-noise bed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Texture {
    Ocean,
    Rain,
    Stream,
    Fire,
}

/// One sine partial of an oscillator bank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    pub freq: f32,
    pub detune_cents: f32,
    pub pan: f32,
    pub gain: f32,
    pub tremolo_hz: f32,
    pub tremolo_depth: f32,
}

impl Partial {
    fn new(freq: f32, pan: f32, gain: f32) -> Self {
        Self {
            freq,
            detune_cents: 0.0,
            pan,
            gain,
            tremolo_hz: 0.1,
            tremolo_depth: 0.2,
        }
    }

    fn detuned(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    fn tremolo(mut self, hz: f32, depth: f32) -> Self {
        self.tremolo_hz = hz;
        self.tremolo_depth = depth;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Bed {
    Noise(Texture),
    Oscillators(Vec<Partial>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Chirp,
    Chime,
    Crackle,
}

/// A recurring burst: every `min_interval..max_interval` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPattern {
    pub kind: EventKind,
    pub min_interval: f32,
    pub max_interval: f32,
    pub gain: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub bed: Option<Bed>,
    pub events: Option<EventPattern>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundscapeDefinition {
    pub id: SoundscapeId,
    pub recipe: Recipe,
    /// Bed level before the master gain.
    pub default_gain: f32,
    /// Reverb return level.
    pub wet: f32,
}

fn catalog(id: SoundscapeId) -> SoundscapeDefinition {
    let (bed, events, default_gain, wet) = match id {
        SoundscapeId::Ocean => (Some(Bed::Noise(Texture::Ocean)), None, 0.5, 0.35),
        SoundscapeId::Rain => (Some(Bed::Noise(Texture::Rain)), None, 0.35, 0.3),
        SoundscapeId::Stream => (Some(Bed::Noise(Texture::Stream)), None, 0.4, 0.3),
        SoundscapeId::Fire => (
            Some(Bed::Noise(Texture::Fire)),
            Some(EventPattern {
                kind: EventKind::Crackle,
                min_interval: 0.08,
                max_interval: 0.6,
                gain: 0.25,
            }),
            0.45,
            0.25,
        ),
        SoundscapeId::Birds => (
            None,
            Some(EventPattern {
                kind: EventKind::Chirp,
                min_interval: 0.8,
                max_interval: 3.5,
                gain: 0.3,
            }),
            0.5,
            0.0,
        ),
        SoundscapeId::WindChimes => (
            None,
            Some(EventPattern {
                kind: EventKind::Chime,
                min_interval: 1.5,
                max_interval: 5.0,
                gain: 0.25,
            }),
            0.4,
            0.0,
        ),
        SoundscapeId::Drone => (
            Some(Bed::Oscillators(vec![
                Partial::new(110.0, -0.3, 0.35),
                Partial::new(110.0, 0.3, 0.3).detuned(4.0).tremolo(0.07, 0.3),
                Partial::new(165.0, -0.1, 0.2).tremolo(0.13, 0.25),
                Partial::new(220.0, 0.2, 0.12).detuned(-3.0).tremolo(0.05, 0.4),
            ])),
            None,
            0.3,
            0.25,
        ),
        SoundscapeId::Binaural => (
            // 10 Hz difference between the ears
            Some(Bed::Oscillators(vec![
                Partial::new(200.0, -1.0, 0.5).tremolo(0.05, 0.1),
                Partial::new(210.0, 1.0, 0.5).tremolo(0.05, 0.1),
            ])),
            None,
            0.25,
            0.1,
        ),
        SoundscapeId::Solfeggio => (
            Some(Bed::Oscillators(vec![
                Partial::new(528.0, 0.0, 0.4).tremolo(0.1, 0.3),
                Partial::new(396.0, -0.4, 0.25).tremolo(0.07, 0.35),
                Partial::new(639.0, 0.4, 0.2).tremolo(0.12, 0.35),
            ])),
            None,
            0.2,
            0.3,
        ),
    };

    SoundscapeDefinition {
        id,
        recipe: Recipe { bed, events },
        default_gain,
        wet,
    }
}
