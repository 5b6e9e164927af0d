//! Benchmarks for the whole render side of a session.
//!
//! A soundscape plus a transition cue on the master bus, pulled through the
//! offline backend the way a device callback would pull it.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stillwater::{
    bus::OfflineBackend,
    soundscape::{AudioSynthesisEngine, CueKind},
    timer::TimerQueue,
    SessionConfig, SoundscapeId,
};

use crate::BLOCK_SIZES;

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");

    for &size in BLOCK_SIZES {
        for id in [SoundscapeId::Fire, SoundscapeId::Drone] {
            let (backend, output) = OfflineBackend::new(48_000.0);
            let mut engine =
                AudioSynthesisEngine::new(Box::new(backend), &SessionConfig::new().seed(1));
            let mut timers = TimerQueue::new();
            engine.unlock();
            engine.start(id, &mut timers);
            engine.play_cue(CueKind::Completion, 0.0);

            group.bench_with_input(
                BenchmarkId::new(format!("{id}_with_cue"), size),
                &size,
                |b, _| {
                    b.iter(|| black_box(output.render(size)));
                },
            );
        }
    }

    group.finish();
}
