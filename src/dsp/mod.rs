//! Low-level DSP primitives used by the graph nodes.
//!
//! Everything here is allocation-free once constructed, so the primitives can
//! live inside nodes that run on the audio callback. The math stays separate
//! from orchestration: graph nodes add render contexts, modulation and
//! lifecycle on top.

/// Feed-forward peak compressor with soft knee.
pub mod compressor;
/// Uniform partitioned FFT convolution.
pub mod convolver;
/// ADSR and percussive envelope generators.
pub mod envelope;
/// State-variable filter with four responses.
pub mod filter;
/// Synthetic stereo reverb impulses.
pub mod impulse;
/// Control-rate helpers for slow modulators.
pub mod lfo;
/// Block-rate modulation helpers.
pub mod modulate;
/// Oscillator waveforms and noise sources.
pub mod oscillator;
/// Equal-power stereo panning.
pub mod pan;
/// Biquad high-shelf.
pub mod shelf;

pub use envelope::EnvelopeState;
