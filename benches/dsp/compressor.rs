//! Benchmarks for the soft-knee compressor.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stillwater::dsp::compressor::{Compressor, CompressorSettings};

use crate::BLOCK_SIZES;

pub fn bench_compressor(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/compressor");

    for &size in BLOCK_SIZES {
        // loud enough to sit inside the knee
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect();

        let mut compressor = Compressor::new(CompressorSettings::default());
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                compressor.render(black_box(&mut buffer), black_box(48_000.0));
            })
        });
    }

    group.finish();
}
