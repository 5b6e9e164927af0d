//! Benchmarks for the oscillator shapes the ambience is built from.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stillwater::dsp::oscillator::OscillatorBlock;
use stillwater::graph::{
    lfo::LfoNode,
    node::{GraphNode, RenderCtx},
    oscillator::OscNode,
};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let ctx = RenderCtx::from_freq(48_000.0, 528.0, 1.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Drone partials, chimes and cues
        let mut osc = OscillatorBlock::sine();
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer), black_box(&ctx)))
        });

        // Filter sweeps
        let mut osc = OscillatorBlock::triangle();
        group.bench_with_input(BenchmarkId::new("triangle", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer), black_box(&ctx)))
        });

        // Crackle bursts draw fresh noise rather than reading the loop
        let mut osc = OscillatorBlock::noise_seeded(7);
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer), black_box(&ctx)))
        });

        // A detuned drone partial, the node the oscillator beds are made of
        let mut partial = OscNode::sine().with_frequency(110.0).with_detune(4.0);
        group.bench_with_input(BenchmarkId::new("detuned_partial", size), &size, |b, _| {
            b.iter(|| partial.render_block(black_box(&mut buffer), black_box(&ctx)))
        });

        // Slow tremolo mapped to a gain range
        let mut lfo = LfoNode::sine(0.07).with_range(0.7, 1.0);
        group.bench_with_input(BenchmarkId::new("tremolo_lfo", size), &size, |b, _| {
            b.iter(|| lfo.render_block(black_box(&mut buffer), black_box(&ctx)))
        });
    }

    group.finish();
}
