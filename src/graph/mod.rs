//! Composable building blocks for the ambient audio graphs.
//!
//! Graph nodes wrap the DSP primitives with block rendering, modulation and
//! lifetime tracking. `extensions` adds the fluent combinators so a texture
//! reads as a chain:
//!
//! ```ignore
//! BufferNode::looping(noise)
//!     .through(FilterNode::lowpass(800.0).modulate(LfoNode::sine(0.08), FilterParam::Cutoff, 400.0))
//!     .through(CompressorNode::default())
//!     .amplify(EnvNode::fade_in(1.5))
//!     .panned(0.0)
//! ```

/// Multiply a signal by an envelope or ranged LFO.
pub mod amplify;
/// Looping sample buffers and white-noise generation.
pub mod buffer;
/// Dynamics compressor node.
pub mod dynamics;
/// ADSR and percussive envelope nodes.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.through()`, `.modulate()`, `.panned()`).
pub mod extensions;
/// State-variable filter and high-shelf nodes.
pub mod filter;
/// Low frequency oscillators for parameter modulation.
pub mod lfo;
/// Connect modulation sources to node parameters.
pub mod modulate;
/// Core traits shared by all mono graph nodes.
pub mod node;
/// Fixed-pitch oscillators and seeded noise.
pub mod oscillator;
/// Panning, layering and convolution reverb on stereo nodes.
pub mod stereo;
/// Serial chaining of two nodes (source → effect).
pub mod through;
