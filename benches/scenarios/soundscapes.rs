//! Benchmarks for complete soundscape beds.
//!
//! Every bed runs its full chain: noise or oscillator bank, shaping filters,
//! compressor, fade-in, pan and the convolution reverb.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stillwater::{
    dsp::impulse::NoiseImpulse,
    graph::{buffer::white_noise, node::RenderCtx},
    random::SeededRandom,
    soundscape::textures::build_bed,
    SoundscapeId,
};

use crate::BLOCK_SIZES;

pub fn bench_soundscapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/soundscapes");
    let ctx = RenderCtx::at(48_000.0, 0.0);
    let mut rng = SeededRandom::new(11);
    let noise = white_noise(&mut rng, 4 * 48_000);
    let impulse = NoiseImpulse::generate(&mut rng, 48_000.0, 1.5);

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        for id in SoundscapeId::ALL {
            let Some(mut bed) = build_bed(&id.definition(), &noise, &impulse, &mut rng) else {
                continue;
            };
            group.bench_with_input(BenchmarkId::new(id.name(), size), &size, |b, _| {
                b.iter(|| {
                    bed.render_stereo(black_box(&mut left), black_box(&mut right), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
