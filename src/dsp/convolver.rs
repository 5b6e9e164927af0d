use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/*
Partitioned FFT Convolution
===========================

Reverb here is convolution with a synthetic impulse response of up to a few
seconds. Direct convolution of a 96k-sample IR costs 96k multiplies per output
sample, so the IR is split into P partitions of B samples and convolved in
the frequency domain (uniform partitioned overlap-save).

    IR:     [ h0 | h1 | h2 | ... | hP-1 ]        each B samples
    H_p = FFT_2B( h_p zero-padded to 2B )        precomputed

Every B input samples:

    window  = [ previous B inputs | current B inputs ]
    X_0     = FFT_2B(window)                     newest spectrum
    FDL     = [ X_0, X_1, ... X_P-1 ]            spectra of older windows
    Y       = Σ X_p · H_p                        complex multiply-accumulate
    y       = IFFT_2B(Y) / 2B, keep the last B   overlap-save

The output lags the input by exactly B samples. Inputs can arrive in slices
of any length; samples are staged until a full partition is ready.
*/

pub const DEFAULT_PARTITION: usize = 512;

pub struct Convolver {
    partition: usize,
    fft: Arc<dyn Fft<f32>>,
    ifft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,

    ir_spectra: Vec<Vec<Complex<f32>>>,
    // frequency-domain delay line, ring indexed by `fdl_head`
    fdl: Vec<Vec<Complex<f32>>>,
    fdl_head: usize,

    window: Vec<f32>,
    input: Vec<f32>,
    output: Vec<f32>,
    cursor: usize,

    spectrum: Vec<Complex<f32>>,
    accumulator: Vec<Complex<f32>>,
}

impl Convolver {
    pub fn new(impulse: &[f32], partition: usize) -> Self {
        let partition = partition.max(1).next_power_of_two();
        let size = partition * 2;

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(ifft.get_inplace_scratch_len());
        let mut scratch = vec![Complex::default(); scratch_len];

        let mut ir_spectra = Vec::new();
        for chunk in impulse.chunks(partition) {
            let mut spectrum = vec![Complex::default(); size];
            for (bin, &tap) in spectrum.iter_mut().zip(chunk) {
                bin.re = tap;
            }
            fft.process_with_scratch(&mut spectrum, &mut scratch);
            ir_spectra.push(spectrum);
        }
        if ir_spectra.is_empty() {
            ir_spectra.push(vec![Complex::default(); size]);
        }

        let fdl = vec![vec![Complex::default(); size]; ir_spectra.len()];

        Self {
            partition,
            fft,
            ifft,
            scratch,
            ir_spectra,
            fdl,
            fdl_head: 0,
            window: vec![0.0; size],
            input: vec![0.0; partition],
            output: vec![0.0; partition],
            cursor: 0,
            spectrum: vec![Complex::default(); size],
            accumulator: vec![Complex::default(); size],
        }
    }

    /// Output delay in samples.
    pub fn latency(&self) -> usize {
        self.partition
    }

    pub fn partitions(&self) -> usize {
        self.ir_spectra.len()
    }

    /// Convolve `buffer` in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            self.input[self.cursor] = *sample;
            *sample = self.output[self.cursor];
            self.cursor += 1;

            if self.cursor == self.partition {
                self.cursor = 0;
                self.run_partition();
            }
        }
    }

    fn run_partition(&mut self) {
        let b = self.partition;
        let size = b * 2;

        // slide the time window and append the new partition
        self.window.copy_within(b.., 0);
        self.window[b..].copy_from_slice(&self.input);

        for (bin, &s) in self.spectrum.iter_mut().zip(&self.window) {
            *bin = Complex::new(s, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        let count = self.fdl.len();
        self.fdl_head = (self.fdl_head + count - 1) % count;
        self.fdl[self.fdl_head].copy_from_slice(&self.spectrum);

        self.accumulator.fill(Complex::default());
        for (p, ir) in self.ir_spectra.iter().enumerate() {
            let x = &self.fdl[(self.fdl_head + p) % count];
            for ((acc, xi), hi) in self.accumulator.iter_mut().zip(x).zip(ir) {
                *acc += xi * hi;
            }
        }

        self.ifft
            .process_with_scratch(&mut self.accumulator, &mut self.scratch);

        let norm = 1.0 / size as f32;
        for (out, bin) in self.output.iter_mut().zip(&self.accumulator[b..]) {
            *out = bin.re * norm;
        }
    }

    pub fn reset(&mut self) {
        for spectrum in &mut self.fdl {
            spectrum.fill(Complex::default());
        }
        self.window.fill(0.0);
        self.input.fill(0.0);
        self.output.fill(0.0);
        self.cursor = 0;
    }
}
