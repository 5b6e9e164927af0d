//! Benchmarks for bed fades and burst envelopes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stillwater::dsp::envelope::{Envelope, PercEnvelope};
use stillwater::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::at(48_000.0, 0.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // A bed fading in over its first seconds
        let mut fade = Envelope::fade_in(2.0, 0.5);
        fade.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("fade_in", size), &size, |b, _| {
            b.iter(|| fade.render(black_box(&mut buffer), black_box(&ctx)))
        });

        // The same bed once it is fully up
        let mut held = Envelope::fade_in(0.001, 0.5);
        held.note_on(&ctx);
        for _ in 0..100 {
            held.next_sample(&ctx);
        }
        group.bench_with_input(BenchmarkId::new("held", size), &size, |b, _| {
            b.iter(|| held.render(black_box(&mut buffer), black_box(&ctx)))
        });

        // Chime and cue decay, retriggered every block
        let mut perc = PercEnvelope::new(0.02, 2.0);
        group.bench_with_input(BenchmarkId::new("perc", size), &size, |b, _| {
            b.iter(|| {
                perc.trigger();
                perc.render(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
