use std::f32::consts::TAU;

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::graph::node::RenderCtx;

/*
Phase-Accumulator Oscillator
============================

The ambience needs three shapes: sines for drones, chimes and cues,
triangles for slow filter sweeps, and noise as the raw material for every
texture. The periodic ones read a single phase value in [0, 1) and step it
forward by frequency / sample_rate each sample.

    phase:    0.0 ──────────────→ 1.0 (wraps to 0.0)
    sine:     sin(2π · phase)
    triangle: 1 - 4 · |phase - 0.5|

Noise ignores phase and draws a fresh uniform sample in [-1, 1) each tick.
The generator is seeded so renders are repeatable.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Triangle,
    Noise,
}

const DEFAULT_NOISE_SEED: u64 = 0x5EED_CA1A;

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
    noise: SmallRng,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            noise: SmallRng::seed_from_u64(DEFAULT_NOISE_SEED),
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn noise() -> Self {
        Self::new(OscillatorWaveform::Noise)
    }

    pub fn noise_seeded(seed: u64) -> Self {
        Self {
            noise: SmallRng::seed_from_u64(seed),
            ..Self::new(OscillatorWaveform::Noise)
        }
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    #[inline]
    fn sample_at_phase(&mut self) -> f32 {
        let phase = self.phase;
        match self.waveform {
            OscillatorWaveform::Sine => (TAU * phase).sin(),
            OscillatorWaveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            OscillatorWaveform::Noise => self.noise.gen_range(-1.0..1.0),
        }
    }

    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let increment = ctx.frequency / ctx.sample_rate;

        for sample in out.iter_mut() {
            *sample = self.sample_at_phase();
            self.phase += increment;
            self.phase -= self.phase.floor();
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(freq: f32) -> RenderCtx {
        RenderCtx::from_freq(48_000.0, freq, 1.0)
    }

    #[test]
    fn every_waveform_stays_in_range() {
        for waveform in [
            OscillatorWaveform::Sine,
            OscillatorWaveform::Triangle,
            OscillatorWaveform::Noise,
        ] {
            let mut osc = OscillatorBlock::new(waveform);
            let mut buffer = vec![0.0; 2048];
            osc.render(&mut buffer, &ctx(528.0));
            assert!(
                buffer.iter().all(|s| (-1.0..=1.0).contains(s)),
                "{waveform:?} left [-1, 1]"
            );
        }
    }

    #[test]
    fn phase_wraps_once_per_period() {
        // 480 Hz at 48 kHz = exactly 100 samples per cycle
        let mut osc = OscillatorBlock::triangle();
        let mut buffer = vec![0.0; 201];
        osc.render(&mut buffer, &ctx(480.0));

        for i in [0, 100, 200] {
            assert!((buffer[i] + 1.0).abs() < 1e-3, "sample {i}");
        }
        assert!((buffer[50] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn seeded_noise_is_repeatable() {
        let mut a = OscillatorBlock::noise_seeded(3);
        let mut b = OscillatorBlock::noise_seeded(3);
        let mut buf_a = vec![0.0; 64];
        let mut buf_b = vec![0.0; 64];
        a.render(&mut buf_a, &ctx(0.0));
        b.render(&mut buf_b, &ctx(0.0));
        assert_eq!(buf_a, buf_b);
        assert!(buf_a.iter().any(|&s| s != buf_a[0]));
    }
}
