use crate::{graph::node::RenderCtx, MIN_TIME};

/*
Envelopes
=========

Two shapes live here. Both output a level in [0, 1] that multiplies a signal.

ADSR (continuous beds)
----------------------

  Level
    1.0 ┐      ╱‾‾‾‾‾‾‾‾‾‾‾‾╲
        │     ╱               ╲
        │    ╱                  ╲
    0.0 └───╱────────────────────╲──→ Time
          Attack   Sustain     Release

Ambient beds use a slow linear attack (about 1.5 s) and a sustain of 1.0, so
a new soundscape swells in instead of clicking on. Decay is kept for
completeness; with sustain = 1.0 it is skipped immediately.

    increment = 1 / (attack_seconds · sample_rate)

Release always starts from the current level, so stopping mid-attack does not
jump.

Percussive (bursts and cues)
----------------------------

  Level
    1.0 ┐  ╱╲
        │ ╱  ╲_
        │╱      ‾‾‾──___
    0.0 └────────────────‾‾──→ Time
        att   exponential decay

A linear attack of a few tens of milliseconds, then an exponential fall that
reaches -60 dB after `decay` seconds:

    coeff = 0.001 ^ (1 / (decay · sample_rate))
    level = level · coeff        (per sample)

Once the level drops under the -60 dB floor the envelope goes idle, which is
how the master bus knows a one-shot can be freed.
*/

/// -60 dB, the point at which a decaying tail is treated as silent.
pub const SILENCE_FLOOR: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,

    stage: EnvelopeState,
    level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            sustain_level: sustain.clamp(0.0, 1.0),
            release_time: release.max(MIN_TIME),

            stage: EnvelopeState::Idle,
            level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    /// Slow swell to full level and hold, used for continuous beds.
    pub fn fade_in(attack: f32, release: f32) -> Self {
        Self::adsr(attack, MIN_TIME, 1.0, release)
    }

    pub fn note_on(&mut self, _ctx: &RenderCtx) {
        self.level = 0.0;
        self.stage = EnvelopeState::Attack;
        self.release_elapsed_samples = 0;
    }

    pub fn note_off(&mut self, ctx: &RenderCtx) {
        if self.stage == EnvelopeState::Idle {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * ctx.sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeState::Release;
    }

    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }
            EnvelopeState::Attack => {
                self.level += 1.0 / (self.attack_time * ctx.sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }
            EnvelopeState::Decay => {
                let drop = (1.0 - self.sustain_level) / (self.decay_time * ctx.sample_rate);
                self.level -= drop;
                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeState::Sustain;
                }
            }
            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }
            EnvelopeState::Release => {
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);
                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        self.level
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(ctx);
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

/// Attack then exponential decay to silence. No sustain, no gate.
pub struct PercEnvelope {
    attack_time: f32,
    decay_time: f32,
    peak: f32,
    stage: EnvelopeState,
    level: f32,
}

impl PercEnvelope {
    pub fn new(attack: f32, decay: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            peak: 1.0,
            stage: EnvelopeState::Idle,
            level: 0.0,
        }
    }

    pub fn with_peak(mut self, peak: f32) -> Self {
        self.peak = peak.clamp(0.0, 1.0);
        self
    }

    pub fn trigger(&mut self) {
        self.level = 0.0;
        self.stage = EnvelopeState::Attack;
    }

    #[inline]
    fn decay_coeff(&self, sample_rate: f32) -> f32 {
        SILENCE_FLOOR.powf(1.0 / (self.decay_time * sample_rate))
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let attack_step = self.peak / (self.attack_time * ctx.sample_rate);
        let coeff = self.decay_coeff(ctx.sample_rate);
        let floor = SILENCE_FLOOR * self.peak;

        for sample in buffer.iter_mut() {
            match self.stage {
                EnvelopeState::Attack => {
                    self.level += attack_step;
                    if self.level >= self.peak {
                        self.level = self.peak;
                        self.stage = EnvelopeState::Decay;
                    }
                }
                EnvelopeState::Decay => {
                    self.level *= coeff;
                    if self.level < floor {
                        self.level = 0.0;
                        self.stage = EnvelopeState::Idle;
                    }
                }
                _ => self.level = 0.0,
            }
            *sample = self.level;
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Seconds from trigger until the envelope is idle.
    pub fn duration(&self) -> f32 {
        self.attack_time + self.decay_time
    }
}
