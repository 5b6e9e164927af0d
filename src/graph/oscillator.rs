use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Audio Oscillator
================

Sine partials are the raw material of the drone, binaural and solfeggio
banks, and short sine blips make up chirps, chimes and transition cues.

Ambient sources play at a fixed pitch, so `with_frequency` pins the node to a
frequency and ignores `ctx.frequency`. Detune (in cents) thickens a partial
by a few cents against its neighbour:

    f = base · 2^(cents / 1200)

  // 110 Hz drone root, second partial beating gently against it
  OscNode::sine().with_frequency(110.0)
  OscNode::sine().with_frequency(110.0).with_detune(4.0)
*/

pub struct OscNode {
    osc: OscillatorBlock,
    /// Fixed frequency (Hz). If Some, ignores ctx.frequency and uses this instead.
    /// Every source on the bus sets one, since the bus context carries no pitch.
    base_frequency: Option<f32>,
    /// Current frequency after modulation (only used when base_frequency is Some)
    current_frequency: f32,
    /// Detune in cents. 100 cents = 1 semitone; drone partials use a few.
    detune_cents: f32,
}

/// Parameters that can be modulated on an oscillator
#[derive(Clone, Copy, Debug)]
pub enum OscParam {
    /// Oscillator frequency in Hz
    Frequency,
    /// Detune in cents (100 cents = 1 semitone)
    Detune,
}

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            base_frequency: None,
            current_frequency: 440.0,
            detune_cents: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorBlock::sine())
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorBlock::triangle())
    }

    /// White noise from a fixed seed, so bursts render the same every run.
    pub fn noise_seeded(seed: u64) -> Self {
        Self::new(OscillatorBlock::noise_seeded(seed))
    }

    /// Set a fixed frequency, ignoring the pitch carried by RenderCtx.
    ///
    /// The bus renders every source with a neutral context, so ambient
    /// partials need this to sound at all. The frequency can still be swept
    /// with `.modulate()`.
    ///
    /// # Example
    /// ```ignore
    /// // Chirp: a sine that falls from 4.5 kHz toward 3 kHz
    /// OscNode::sine()
    ///     .with_frequency(3_000.0)
    ///     .modulate(EnvNode::perc(0.005, 0.08), OscParam::Frequency, 1_500.0)
    /// ```
    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.base_frequency = Some(freq);
        self.current_frequency = freq;
        self
    }

    /// Set detune in cents (100 cents = 1 semitone).
    ///
    /// Two partials a few cents apart beat slowly against each other, which
    /// keeps a drone from sounding static. Typical values: ±2-6 cents.
    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.osc.waveform()
    }

    /// Sounding frequency with detune applied, if the node has a fixed one.
    pub fn frequency(&self) -> Option<f32> {
        self.base_frequency
            .map(|_| self.current_frequency * 2.0_f32.powf(self.detune_cents / 1200.0))
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let base_freq = if self.base_frequency.is_some() {
            self.current_frequency
        } else {
            ctx.frequency
        };

        let final_freq = if self.detune_cents != 0.0 {
            base_freq * 2.0_f32.powf(self.detune_cents / 1200.0)
        } else {
            base_freq
        };

        let pitched = RenderCtx {
            frequency: final_freq,
            ..*ctx
        };
        self.osc.render(out, &pitched);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        // Reset current_frequency to base so a retriggered sweep starts over
        if let Some(base) = self.base_frequency {
            self.current_frequency = base;
        }
    }
}

impl Modulatable for OscNode {
    type Param = OscParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            OscParam::Frequency => self.base_frequency.unwrap_or(440.0),
            OscParam::Detune => self.detune_cents,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            OscParam::Frequency => {
                self.current_frequency = (base + modulation).clamp(20.0, 20_000.0);
            }
            OscParam::Detune => {
                self.detune_cents = (base + modulation).clamp(-200.0, 200.0);
            }
        }
    }
}
