use stillwater::{
    bus::{OfflineBackend, OfflineOutput, Unlock},
    session::{
        narration::{RecordingSpeech, SpeechMonitor},
        Phase, PhaseStateMachine, Position,
    },
    MuscleGroup, PhaseScript, PlaybackController, Script, SessionConfig, SessionScript,
    SoundscapeId, TransportState,
};

struct Harness {
    session: PlaybackController,
    output: OfflineOutput,
    speech: SpeechMonitor,
}

fn harness(script: impl Into<SessionScript>) -> Harness {
    let (backend, output) = OfflineBackend::new(8_000.0);
    let (speech, monitor) = RecordingSpeech::new(vec![]);
    let session = PlaybackController::new(
        script.into(),
        SessionConfig::new().seed(12),
        Box::new(backend),
        Some(Box::new(speech)),
    )
    .unwrap();
    Harness {
        session,
        output,
        speech: monitor,
    }
}

fn three_steps() -> Script {
    Script::builder("scenario-1", 30)
        .step(0, "Step zero")
        .with_ambient(SoundscapeId::Fire)
        .step(10, "Step one")
        .step(20, "Step two")
        .build()
        .unwrap()
}

fn groups(n: usize) -> PhaseScript {
    let groups = (0..n)
        .map(|i| {
            MuscleGroup::new(
                format!("Group {i}"),
                "Tense it.",
                "Release it.",
                7,
                15,
                "body",
            )
        })
        .collect();
    PhaseScript::new("scenario-2", groups).with_soundscape(SoundscapeId::Fire)
}

fn step_at(session: &PlaybackController) -> Option<Position> {
    session.snapshot().active
}

#[test]
fn scenario_one_timeline_steps_and_auto_stop() {
    let mut h = harness(three_steps());
    h.session.start().unwrap();

    let mut elapsed = 0;
    for (at, step) in [(5, 0), (10, 1), (15, 1), (20, 2), (29, 2)] {
        h.session.advance((at - elapsed) as f64);
        elapsed = at;
        assert_eq!(h.session.snapshot().elapsed_seconds, at);
        assert_eq!(step_at(&h.session), Some(Position::Step(step)), "at {at}s");
    }
    assert_eq!(h.session.state(), TransportState::Playing);

    h.session.advance(1.0);
    let snapshot = h.session.snapshot();
    assert_eq!(h.session.state(), TransportState::Idle);
    assert!(snapshot.is_complete);
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.elapsed_seconds, 0);
}

#[test]
fn each_step_is_narrated_once() {
    let mut h = harness(three_steps());
    h.session.start().unwrap();
    for _ in 0..25 {
        h.session.advance(1.0);
    }
    let texts: Vec<String> = h.speech.spoken().into_iter().map(|u| u.text).collect();
    assert_eq!(texts, ["Step zero", "Step one", "Step two"]);
}

#[test]
fn a_step_on_the_final_second_is_still_heard() {
    let script = Script::builder("last-word", 20)
        .step(0, "Settle in")
        .step(20, "Goodbye")
        .build()
        .unwrap();
    let mut h = harness(script);
    h.session.start().unwrap();
    h.session.advance(20.0);

    assert_eq!(h.session.state(), TransportState::Idle);
    assert!(h.session.snapshot().is_complete);
    assert_eq!(h.speech.last_text().as_deref(), Some("Goodbye"));
    assert!(h.speech.is_speaking());

    h.session.stop();
    assert!(!h.speech.is_speaking());
}

#[test]
fn a_zero_length_script_completes_as_it_starts() {
    let script = Script::builder("instant", 0).step(0, "Done").build().unwrap();
    let mut h = harness(script);
    h.session.start().unwrap();

    let snapshot = h.session.snapshot();
    assert_eq!(h.session.state(), TransportState::Idle);
    assert!(snapshot.is_complete);
    assert_eq!(h.speech.last_text().as_deref(), Some("Done"));
    assert!(!h.output.is_open());
}

#[test]
fn scenario_two_phase_timings() {
    let mut machine = PhaseStateMachine::new(groups(2));
    assert_eq!(machine.phase(), Phase::Intro);
    machine.advance(5);
    assert_eq!(machine.phase(), Phase::Tense);
    machine.advance(7);
    assert_eq!(machine.phase(), Phase::Release);
    machine.advance(15);
    assert_eq!(machine.phase(), Phase::Rest);
    assert_eq!(machine.phase_time(), 0);
}

#[test]
fn scenario_two_through_the_controller() {
    let mut h = harness(groups(2));
    h.session.start().unwrap();
    assert_eq!(
        h.speech.last_text().as_deref(),
        Some(groups(2).narration.intro.as_str())
    );

    h.session.advance(5.0);
    assert_eq!(
        step_at(&h.session),
        Some(Position::Phase {
            phase: Phase::Tense,
            group: 0
        })
    );
    assert_eq!(h.speech.last_text().as_deref(), Some("Group 0. Tense it."));

    h.session.advance(7.0);
    assert_eq!(h.speech.last_text().as_deref(), Some("Release it."));

    h.session.advance(15.0);
    assert_eq!(
        step_at(&h.session),
        Some(Position::Phase {
            phase: Phase::Rest,
            group: 0
        })
    );
    assert_eq!(h.session.snapshot().completed_groups, 1);

    h.session.advance(5.0);
    assert_eq!(
        step_at(&h.session),
        Some(Position::Phase {
            phase: Phase::Tense,
            group: 1
        })
    );
}

#[test]
fn phase_session_completes_without_stopping() {
    let mut h = harness(groups(3));
    h.session.start().unwrap();
    h.session.advance(90.0);

    let snapshot = h.session.snapshot();
    assert_eq!(h.session.state(), TransportState::Completed);
    assert!(snapshot.is_complete);
    assert_eq!(snapshot.completed_groups, 3);
    assert_eq!(snapshot.total_groups, 3);
    assert_eq!(snapshot.progress_ratio, 1.0);
    assert!(!h.session.clock().is_running());
    // the ambience and its event generator keep going
    assert_eq!(snapshot.soundscape, Some(SoundscapeId::Fire));
    assert_eq!(h.session.audio().armed_generators(), 1);
    assert!(h.output.is_running());

    h.session.stop();
    assert_eq!(h.session.state(), TransportState::Idle);
    assert!(!h.session.snapshot().is_complete);
}

#[test]
fn pause_and_resume_keep_elapsed() {
    let mut h = harness(three_steps());
    h.session.start().unwrap();
    h.session.advance(12.0);

    assert_eq!(h.session.toggle_play_pause(), TransportState::Paused);
    h.session.advance(100.0);
    let paused = h.session.snapshot();
    assert_eq!(paused.elapsed_seconds, 12);
    assert!(!paused.is_playing);

    assert_eq!(h.session.toggle_play_pause(), TransportState::Playing);
    assert_eq!(h.session.snapshot().elapsed_seconds, 12);
    h.session.advance(1.0);
    assert_eq!(h.session.snapshot().elapsed_seconds, 13);
    h.session.advance(2.0);
    assert_eq!(h.session.snapshot().elapsed_seconds, 15);
    assert_eq!(step_at(&h.session), Some(Position::Step(1)));
}

#[test]
fn stop_twice_is_the_same_as_once() {
    let mut h = harness(three_steps());
    h.session.start().unwrap();
    h.session.advance(11.0);

    h.session.stop();
    let once = h.session.snapshot();
    h.session.stop();
    let twice = h.session.snapshot();
    assert_eq!(once, twice);
    assert_eq!(twice.transport, TransportState::Idle);
    assert_eq!(twice.elapsed_seconds, 0);
    assert_eq!(twice.active, None);
}

#[test]
fn stop_before_start_is_harmless() {
    let mut h = harness(three_steps());
    h.session.stop();
    assert_eq!(h.session.state(), TransportState::Idle);
    assert!(h.session.start().is_ok());
}

mod teardown {
    use super::*;

    fn running() -> Harness {
        let mut h = harness(three_steps());
        h.session.start().unwrap();
        h.session.advance(3.0);
        h
    }

    #[test]
    fn pause_clears_the_clock_interval() {
        let mut h = running();
        let tick = h.session.clock().timer().unwrap();
        h.session.toggle_play_pause();
        assert!(!h.session.timers().is_active(tick));
        assert!(!h.session.clock().is_running());
    }

    #[test]
    fn pause_clears_event_timers() {
        let mut h = running();
        let armed: Vec<_> = h.session.audio().handle().unwrap().timers().collect();
        assert_eq!(armed.len(), 1);
        h.session.toggle_play_pause();
        assert!(armed.iter().all(|id| !h.session.timers().is_active(*id)));
        assert_eq!(h.session.audio().armed_generators(), 0);
    }

    #[test]
    fn pause_cancels_narration() {
        let mut h = running();
        assert!(h.speech.is_speaking());
        h.session.toggle_play_pause();
        assert!(!h.speech.is_speaking());
    }

    #[test]
    fn pause_suspends_audio() {
        let mut h = running();
        assert!(h.output.is_running());
        h.session.toggle_play_pause();
        assert!(!h.output.is_running());
        assert!(h.output.is_open());
    }

    #[test]
    fn stop_clears_the_clock_interval() {
        let mut h = running();
        let tick = h.session.clock().timer().unwrap();
        h.session.stop();
        assert!(!h.session.timers().is_active(tick));
    }

    #[test]
    fn stop_clears_event_timers() {
        let mut h = running();
        let armed: Vec<_> = h.session.audio().handle().unwrap().timers().collect();
        h.session.stop();
        assert!(armed.iter().all(|id| !h.session.timers().is_active(*id)));
        assert!(h.session.audio().handle().is_none());
        assert!(h.session.timers().is_empty());
    }

    #[test]
    fn stop_cancels_narration() {
        let mut h = running();
        h.session.stop();
        assert!(!h.speech.is_speaking());
    }

    #[test]
    fn stop_releases_audio() {
        let mut h = running();
        h.output.render(64);
        assert!(h.output.live_sources() > 0);
        h.session.stop();
        assert!(!h.output.is_open());
        assert_eq!(h.output.live_sources(), 0);
        assert_eq!(h.session.audio().context().connected(), 0);
    }

    #[test]
    fn dropping_the_session_tears_everything_down() {
        let h = running();
        let Harness {
            session,
            output,
            speech,
        } = h;
        drop(session);
        assert!(!speech.is_speaking());
        assert!(!output.is_open());
    }
}

#[test]
fn blocked_audio_keeps_the_session_running() {
    let (backend, output) = OfflineBackend::blocked(8_000.0, "waiting for a user gesture");
    let (speech, monitor) = RecordingSpeech::new(vec![]);
    let mut session = PlaybackController::new(
        three_steps().into(),
        SessionConfig::new(),
        Box::new(backend),
        Some(Box::new(speech)),
    )
    .unwrap();

    let unlock = session.start().unwrap();
    assert!(matches!(unlock, Unlock::Blocked(ref reason) if reason.contains("user gesture")));
    assert!(!output.is_running());

    session.advance(10.0);
    assert_eq!(session.snapshot().active, Some(Position::Step(1)));
    assert_eq!(monitor.last_text().as_deref(), Some("Step one"));
}

#[test]
fn missing_speech_keeps_the_session_running() {
    let (backend, _output) = OfflineBackend::new(8_000.0);
    let mut session = PlaybackController::new(
        three_steps().into(),
        SessionConfig::new(),
        Box::new(backend),
        None,
    )
    .unwrap();
    session.start().unwrap();
    session.advance(25.0);
    assert_eq!(session.snapshot().active, Some(Position::Step(2)));
}

#[test]
fn steps_never_go_backwards_across_pauses() {
    let mut h = harness(three_steps());
    h.session.start().unwrap();
    let mut last = 0;
    for second in 0..29 {
        if second % 7 == 3 {
            h.session.toggle_play_pause();
            h.session.advance(2.5);
            h.session.toggle_play_pause();
        }
        h.session.advance(1.0);
        let Some(Position::Step(step)) = step_at(&h.session) else {
            panic!("timeline session left its steps");
        };
        assert!(step >= last);
        last = step;
    }
}
