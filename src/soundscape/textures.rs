use std::sync::Arc;

use crate::{
    dsp::impulse::NoiseImpulse,
    graph::{
        buffer::BufferNode,
        dynamics::CompressorNode,
        envelope::EnvNode,
        extensions::NodeExt,
        filter::{FilterNode, FilterParam, ShelfNode},
        lfo::LfoNode,
        oscillator::OscNode,
        stereo::{Layered, Space, StereoNode},
    },
    random::RandomSource,
    soundscape::{Bed, Partial, SoundscapeDefinition, Texture},
};

/*
Continuous Beds
===============

Noise textures all start from the same looping white-noise buffer and differ
only in how they are shaped:

  ocean   lowpass 800 Hz, cutoff ±400 Hz at 0.08 Hz, swell 0.45-1.0, slow drift
  rain    highpass 900 Hz, +6 dB shelf at 4 kHz, density 0.8-1.0 at 0.15 Hz
  stream  bandpass 1.4 kHz (Q-ish 0.4), centre ±600 Hz at 0.15 Hz, wide auto-pan
  fire    bandpass 300 Hz into lowpass 900 Hz; the crackles are events

  buffer ─→ shaping ─→ compressor ─→ fade-in ─→ pan ─→ Space (dry + reverb)

Oscillator banks are sine partials, each with its own detune, pan and slow
tremolo, layered and sent through a gentler reverb.
*/

/// Seconds for a bed to swell in.
pub const BED_FADE_IN: f32 = 1.5;
const BANK_FADE_IN: f32 = 3.0;

/// Build the continuous part of a soundscape, if it has one.
pub fn build_bed(
    definition: &SoundscapeDefinition,
    noise: &Arc<[f32]>,
    impulse: &NoiseImpulse,
    rng: &mut dyn RandomSource,
) -> Option<Box<dyn StereoNode>> {
    let gain = definition.default_gain;
    let wet = definition.wet;

    match definition.recipe.bed.as_ref()? {
        Bed::Noise(texture) => {
            // start somewhere random in the loop so restarts don't repeat
            let offset = rng.index(noise.len().max(1));
            let source = BufferNode::looping(Arc::clone(noise)).with_offset(offset);
            Some(noise_bed(*texture, source, gain, wet, impulse))
        }
        Bed::Oscillators(partials) => Some(oscillator_bank(partials, gain, wet, impulse)),
    }
}

fn noise_bed(
    texture: Texture,
    source: BufferNode,
    gain: f32,
    wet: f32,
    impulse: &NoiseImpulse,
) -> Box<dyn StereoNode> {
    match texture {
        Texture::Ocean => {
            let chain = source
                .through(FilterNode::lowpass(800.0).modulate(
                    LfoNode::sine(0.08),
                    FilterParam::Cutoff,
                    400.0,
                ))
                .amplify(LfoNode::sine(0.08).with_range(0.45, 1.0))
                .through(CompressorNode::default())
                .amplify(EnvNode::fade_in(BED_FADE_IN))
                .panned(0.0)
                .with_gain(gain)
                .with_auto_pan(LfoNode::sine(0.03), 0.3);
            Box::new(Space::new(chain, impulse, 0.85, wet))
        }
        Texture::Rain => {
            let chain = source
                .through(FilterNode::highpass(900.0))
                .through(ShelfNode::high(4_000.0, 6.0))
                .amplify(LfoNode::sine(0.15).with_range(0.8, 1.0))
                .through(CompressorNode::default())
                .amplify(EnvNode::fade_in(BED_FADE_IN))
                .panned(0.0)
                .with_gain(gain);
            Box::new(Space::new(chain, impulse, 0.85, wet))
        }
        Texture::Stream => {
            let chain = source
                .through(
                    FilterNode::bandpass(1_400.0)
                        .with_resonance(0.4)
                        .modulate(LfoNode::triangle(0.15), FilterParam::Cutoff, 600.0),
                )
                .through(CompressorNode::default())
                .amplify(EnvNode::fade_in(BED_FADE_IN))
                .panned(0.0)
                .with_gain(gain)
                .with_auto_pan(LfoNode::sine(0.05), 0.6);
            Box::new(Space::new(chain, impulse, 0.85, wet))
        }
        Texture::Fire => {
            let chain = source
                .through(FilterNode::bandpass(300.0).with_resonance(0.2))
                .through(FilterNode::lowpass(900.0))
                .through(CompressorNode::default())
                .amplify(EnvNode::fade_in(BED_FADE_IN))
                .panned(0.0)
                .with_gain(gain);
            Box::new(Space::new(chain, impulse, 0.9, wet))
        }
    }
}

fn oscillator_bank(
    partials: &[Partial],
    gain: f32,
    wet: f32,
    impulse: &NoiseImpulse,
) -> Box<dyn StereoNode> {
    let layers = partials
        .iter()
        .map(|p| -> Box<dyn StereoNode> {
            Box::new(
                OscNode::sine()
                    .with_frequency(p.freq)
                    .with_detune(p.detune_cents)
                    .amplify(LfoNode::sine(p.tremolo_hz).with_range(1.0 - p.tremolo_depth, 1.0))
                    .amplify(EnvNode::fade_in(BANK_FADE_IN))
                    .panned(p.pan)
                    .with_gain(p.gain),
            )
        })
        .collect();

    let bank = Layered::new(layers).with_gain(gain);
    Box::new(Space::new(bank, impulse, 0.9, wet))
}
