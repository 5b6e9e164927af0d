use crate::{dsp::envelope::SILENCE_FLOOR, random::RandomSource};

/// A synthetic room: independent white noise per channel under an
/// exponential envelope that reaches -60 dB at `seconds`.
///
/// Each channel is scaled to unit energy so the wet path sits at roughly
/// the same loudness as the dry signal regardless of tail length.
pub struct NoiseImpulse {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl NoiseImpulse {
    pub fn generate(rng: &mut dyn RandomSource, sample_rate: f32, seconds: f32) -> Self {
        let len = ((seconds.max(0.01) * sample_rate) as usize).max(1);
        let decay = SILENCE_FLOOR.ln() / len as f32;

        let mut channel = || -> Vec<f32> {
            let mut taps: Vec<f32> = (0..len)
                .map(|i| rng.bipolar() * (decay * i as f32).exp())
                .collect();
            normalize_energy(&mut taps);
            taps
        };

        let left = channel();
        let right = channel();
        Self { left, right }
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

fn normalize_energy(taps: &mut [f32]) {
    let energy: f32 = taps.iter().map(|t| t * t).sum();
    if energy > 0.0 {
        let scale = energy.sqrt().recip();
        taps.iter_mut().for_each(|t| *t *= scale);
    }
}
