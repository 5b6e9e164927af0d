pub mod bus; // Audio context, master bus and output backends
pub mod config;
pub mod dsp;
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod random;
pub mod session; // Clock, strategies, narration and transport
pub mod soundscape; // Synthesized ambience and transition cues
pub mod timer;

pub use config::SessionConfig;
pub use error::{AudioError, ScriptError, SessionError, SpeechError, UnknownSoundscape};
pub use session::{
    controller::{PlaybackController, SessionSnapshot, TransportState},
    script::{MuscleGroup, PhaseScript, Script, SessionScript, Step},
};
pub use soundscape::SoundscapeId;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
