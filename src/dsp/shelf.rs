use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Type, Q_BUTTERWORTH_F32};

/// High-shelf biquad. Rain uses a boost above ~4 kHz for its hiss.
pub struct HighShelf {
    freq_hz: f32,
    gain_db: f32,
    sample_rate: f32,
    filter: DirectForm2Transposed<f32>,
}

impl HighShelf {
    pub fn new(freq_hz: f32, gain_db: f32) -> Self {
        Self {
            freq_hz,
            gain_db,
            sample_rate: 0.0,
            filter: DirectForm2Transposed::<f32>::new(unity()),
        }
    }

    pub fn freq_hz(&self) -> f32 {
        self.freq_hz
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    fn prepare(&mut self, sample_rate: f32) {
        if self.sample_rate == sample_rate {
            return;
        }
        self.sample_rate = sample_rate;
        let coeffs = Coefficients::<f32>::from_params(
            Type::HighShelf(self.gain_db),
            sample_rate.hz(),
            self.freq_hz.clamp(20.0, sample_rate / 2.0 - 1.0).hz(),
            Q_BUTTERWORTH_F32,
        )
        .unwrap_or_else(|_| unity());
        self.filter.update_coefficients(coeffs);
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        self.prepare(sample_rate);
        for sample in buffer.iter_mut() {
            *sample = self.filter.run(*sample);
        }
    }
}

fn unity() -> Coefficients<f32> {
    Coefficients {
        a1: 0.0,
        a2: 0.0,
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
    }
}
