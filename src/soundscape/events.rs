use crate::{
    graph::{
        envelope::EnvNode,
        extensions::NodeExt,
        filter::FilterNode,
        oscillator::{OscNode, OscParam},
        stereo::{Layered, StereoNode},
    },
    random::RandomSource,
    soundscape::{EventKind, EventPattern},
};

/*
Periodic Events
===============

Birdsong, chimes and fire crackle are not beds but a stream of short bursts.
An event generator fires one burst, then picks a random wait before the
next. Every burst is built fresh:

  chirp    sine 2.2-4.2 kHz, pitch flicks up ~35% with the attack then falls
  chime    pentatonic note plus an inharmonic partial at 2.76×, long ring
  crackle  highpassed noise, very short

  attack   20-50 ms (linear)
  decay    150 ms - 2.5 s (exponential, to -60 dB)
  pan      uniform in [-0.8, 0.8]

Bursts free themselves on the bus once their envelope rings out.
*/

/// C major pentatonic, C5 to C6.
pub const CHIME_SCALE: [f32; 6] = [523.25, 587.33, 659.25, 783.99, 880.0, 1046.5];
/// Ratio of the first inharmonic mode of a struck tube.
pub const CHIME_PARTIAL: f32 = 2.76;

const PAN_SPREAD: f32 = 0.8;

pub struct Burst {
    pub node: Box<dyn StereoNode>,
    /// Seconds until the burst is silent.
    pub duration: f32,
}

/// Random wait until the next burst of this pattern.
pub fn next_interval(pattern: &EventPattern, rng: &mut dyn RandomSource) -> f64 {
    rng.range(pattern.min_interval, pattern.max_interval) as f64
}

pub fn burst(pattern: &EventPattern, rng: &mut dyn RandomSource) -> Burst {
    let pan = rng.range(-PAN_SPREAD, PAN_SPREAD);
    let gain = pattern.gain;

    match pattern.kind {
        EventKind::Chirp => {
            let freq = rng.range(2_200.0, 4_200.0);
            let attack = rng.range(0.02, 0.05);
            let decay = rng.range(0.15, 0.4);
            let node = OscNode::sine()
                .with_frequency(freq)
                .modulate(EnvNode::perc(attack, decay * 0.5), OscParam::Frequency, freq * 0.35)
                .amplify(EnvNode::perc(attack, decay))
                .panned(pan)
                .with_gain(gain);
            Burst {
                node: Box::new(node),
                duration: attack + decay,
            }
        }
        EventKind::Chime => {
            let freq = CHIME_SCALE[rng.index(CHIME_SCALE.len())];
            let attack = rng.range(0.02, 0.05);
            let decay = rng.range(1.5, 2.5);
            let fundamental: Box<dyn StereoNode> = Box::new(
                OscNode::sine()
                    .with_frequency(freq)
                    .amplify(EnvNode::perc(attack, decay))
                    .panned(pan),
            );
            let overtone: Box<dyn StereoNode> = Box::new(
                OscNode::sine()
                    .with_frequency(freq * CHIME_PARTIAL)
                    .amplify(EnvNode::perc(attack, decay * 0.4))
                    .panned(pan)
                    .with_gain(0.3),
            );
            Burst {
                node: Box::new(Layered::new(vec![fundamental, overtone]).with_gain(gain)),
                duration: attack + decay,
            }
        }
        EventKind::Crackle => {
            let attack = 0.02;
            let decay = rng.range(0.15, 0.25);
            let node = OscNode::noise_seeded(rng.seed())
                .through(FilterNode::highpass(rng.range(1_500.0, 4_000.0)))
                .amplify(EnvNode::perc_with_peak(attack, decay, rng.range(0.4, 1.0)))
                .panned(pan)
                .with_gain(gain);
            Burst {
                node: Box::new(node),
                duration: attack + decay,
            }
        }
    }
}
