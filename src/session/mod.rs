//! Guided sessions: scripts, the clock that drives them, the two ways a
//! session can progress, narration and the transport facade on top.

pub mod clock;
pub mod controller;
pub mod narration;
pub mod phase;
pub mod script;
pub mod strategy;
pub mod timeline;

pub use clock::SessionClock;
pub use narration::{NarrationDispatcher, SpeechSynthesizer, Utterance, VoiceInfo};
pub use phase::{Phase, PhaseStateMachine};
pub use strategy::{Position, Strategy, Transition};
pub use timeline::{resolve_step, ScriptTimeline};
