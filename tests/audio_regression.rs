use stillwater::{
    bus::{OfflineBackend, OfflineOutput},
    soundscape::{AudioSynthesisEngine, CueKind},
    timer::TimerQueue,
    SessionConfig, SoundscapeId,
};

const SAMPLE_RATE: f32 = 16_000.0;

fn engine(volume: u8) -> (AudioSynthesisEngine, OfflineOutput) {
    let (backend, output) = OfflineBackend::new(SAMPLE_RATE);
    let config = SessionConfig::new().volume(volume).seed(99);
    (AudioSynthesisEngine::new(Box::new(backend), &config), output)
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

#[test]
fn renders_silence_with_nothing_connected() {
    let (mut engine, output) = engine(100);
    engine.unlock();
    let (left, right) = output.render(512);
    assert!(left.iter().chain(&right).all(|s| *s == 0.0));
}

#[test]
fn every_soundscape_is_audible_and_bounded() {
    for id in SoundscapeId::ALL {
        let (mut engine, output) = engine(100);
        let mut timers = TimerQueue::new();
        engine.unlock();
        engine.start(id, &mut timers);

        // long enough for the fade-in and a few event bursts
        let mut left = Vec::new();
        let mut right = Vec::new();
        for block in 1..=16 {
            engine.maintain(timers.now());
            let until = block as f64 * 0.5;
            while let Some(timer) = timers.next_due(until) {
                engine.on_timer(timer, &mut timers);
            }
            let (l, r) = output.render_seconds(0.5);
            left.extend(l);
            right.extend(r);
        }

        let peak = peak(&left).max(peak(&right));
        assert!(peak > 1e-3, "{id} is silent");
        assert!(peak <= 1.0, "{id} clips at {peak}");
        assert!(left.iter().chain(&right).all(|s| s.is_finite()));
    }
}

#[test]
fn binaural_keeps_its_ears_apart() {
    let (mut engine, output) = engine(100);
    let mut timers = TimerQueue::new();
    engine.unlock();
    engine.start(SoundscapeId::Binaural, &mut timers);
    let (left, right) = output.render_seconds(4.0);

    let diff: f32 = left.iter().zip(&right).map(|(l, r)| (l - r).abs()).sum();
    assert!(diff / left.len() as f32 > 1e-3);
}

#[test]
fn master_volume_scales_output() {
    let render = |volume| {
        let (mut engine, output) = engine(volume);
        let mut timers = TimerQueue::new();
        engine.unlock();
        engine.start(SoundscapeId::Drone, &mut timers);
        let (left, _) = output.render_seconds(4.0);
        peak(&left[left.len() / 2..])
    };
    let loud = render(100);
    let quiet = render(25);
    assert!((quiet / loud - 0.25).abs() < 0.02, "{quiet} / {loud}");
}

#[test]
fn cue_sounds_over_silence_and_fades() {
    let (mut engine, output) = engine(100);
    engine.unlock();
    engine.play_cue(CueKind::Completion, 0.0);

    let (early, _) = output.render_seconds(0.2);
    assert!(peak(&early) > 0.01);
    let (tail, _) = output.render_seconds(2.5);
    assert!(peak(&tail[tail.len() - 1_000..]) < 1e-3);
}
