/*
Dynamics Compressor
===================

Sits at the end of every texture chain to tame noise peaks before the dry and
reverb paths split. Peak detector with separate attack/release smoothing,
then a soft-knee gain computer:

  out dB
    │            ╱ 1:1
    │          ╱
    │        ╱  ___─── 1:ratio
    │      ╱_──
    │    ╱╱   ← knee (width w, centred on threshold)
    │  ╱
    └────────────────→ in dB
           T

    excess = level - T
    excess < -w/2       → no gain change
    excess >  w/2       → T + excess / ratio
    otherwise           → ratio eased from 1 to `ratio` across the knee

Defaults match the usual browser dynamics node: threshold -24 dB, knee 30 dB,
ratio 12, attack 3 ms, release 250 ms.
*/

#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    20.0 * linear.abs().max(1e-10).log10()
}

/// One-pole smoothing coefficient reaching ~63% of a step in `time_ms`.
#[inline]
pub fn time_coeff(time_ms: f32, sample_rate: f32) -> f32 {
    if time_ms <= 0.0 {
        return 0.0;
    }
    let samples = (time_ms / 1000.0) * sample_rate;
    (-1.0_f32 / samples.max(1.0)).exp()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    pub threshold_db: f32,
    pub knee_db: f32,
    pub ratio: f32,
    pub attack_ms: f32,
    pub release_ms: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold_db: -24.0,
            knee_db: 30.0,
            ratio: 12.0,
            attack_ms: 3.0,
            release_ms: 250.0,
        }
    }
}

pub struct Compressor {
    settings: CompressorSettings,
    detector: f32,
    attack_coeff: f32,
    release_coeff: f32,
    sample_rate: f32,
}

impl Compressor {
    pub fn new(settings: CompressorSettings) -> Self {
        Self {
            settings,
            detector: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate: 0.0,
        }
    }

    pub fn settings(&self) -> CompressorSettings {
        self.settings
    }

    fn prepare(&mut self, sample_rate: f32) {
        if self.sample_rate != sample_rate {
            self.sample_rate = sample_rate;
            self.attack_coeff = time_coeff(self.settings.attack_ms, sample_rate);
            self.release_coeff = time_coeff(self.settings.release_ms, sample_rate);
        }
    }

    #[inline]
    pub fn gain_db(&self, level_db: f32) -> f32 {
        let t = self.settings.threshold_db;
        let r = self.settings.ratio.max(1.0);
        let w = self.settings.knee_db.max(0.0);
        let excess = level_db - t;

        if w > 0.0 {
            let half_w = w / 2.0;
            if excess < -half_w {
                0.0
            } else if excess > half_w {
                (t + excess / r) - level_db
            } else {
                let x = (excess + half_w) / w;
                let eased_ratio = 1.0 + (r - 1.0) * x;
                (t - half_w + (excess + half_w) / eased_ratio) - level_db
            }
        } else if excess > 0.0 {
            (t + excess / r) - level_db
        } else {
            0.0
        }
    }

    #[inline]
    fn process(&mut self, sample: f32) -> f32 {
        let abs_in = sample.abs();
        let coeff = if abs_in > self.detector {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.detector = coeff * self.detector + (1.0 - coeff) * abs_in;

        let gain_db = self.gain_db(linear_to_db(self.detector));
        sample * db_to_linear(gain_db)
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        self.prepare(sample_rate);
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.detector = 0.0;
    }
}
