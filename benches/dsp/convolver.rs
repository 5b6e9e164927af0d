//! Benchmarks for partitioned FFT convolution.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stillwater::{
    dsp::{convolver::Convolver, impulse::NoiseImpulse},
    random::SeededRandom,
};

use crate::BLOCK_SIZES;

pub fn bench_convolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolver");
    let mut rng = SeededRandom::new(7);
    // the soundscape reverb tail
    let impulse = NoiseImpulse::generate(&mut rng, 48_000.0, 1.5);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| ((i * 7) % 13) as f32 / 13.0 - 0.5).collect();

        for partition in [256, 512] {
            let mut convolver = Convolver::new(&impulse.left, partition);
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("reverb_1.5s_p{partition}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        convolver.process(black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
