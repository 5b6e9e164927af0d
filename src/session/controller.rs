use log::{debug, info, warn};

use crate::{
    bus::{AudioBackend, Unlock},
    config::SessionConfig,
    error::SessionError,
    session::{
        clock::SessionClock,
        narration::{NarrationDispatcher, SpeechSynthesizer},
        script::SessionScript,
        strategy::{Position, Strategy, Transition},
    },
    soundscape::{AudioSynthesisEngine, SoundscapeId},
    timer::TimerQueue,
};

/*
Playback Controller
===================

  idle ──start──→ playing ⇄ paused
   ↑                │
   └──── stop ──────┤  (timeline end stops by itself)
                    └──→ completed  (phase end; needs stop)

The controller owns the event loop (a TimerQueue), the clock, the strategy,
narration and the audio engine for one session. The host pumps it with
`advance(seconds)`: every due timer is dispatched in deadline order to the
clock or the audio engine, and clock ticks drive the strategy.

Teardown touches four things, each checked on its own: the clock interval,
the soundscape event timers, in-flight narration and the audio context.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Idle,
    Playing,
    Paused,
    /// A phase session ran to the end; ambience keeps going until `stop`.
    Completed,
}

/// Read-only view for a display layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub elapsed_seconds: u32,
    pub active: Option<Position>,
    pub display_text: String,
    pub visual_cue_label: Option<String>,
    pub progress_ratio: f32,
    pub is_playing: bool,
    pub is_complete: bool,
    pub completed_groups: usize,
    pub total_groups: usize,
    pub transport: TransportState,
    pub soundscape: Option<SoundscapeId>,
}

pub struct PlaybackController {
    script: SessionScript,
    default_soundscape: Option<SoundscapeId>,
    state: TransportState,
    timers: TimerQueue,
    clock: SessionClock,
    strategy: Option<Strategy>,
    narration: NarrationDispatcher,
    audio: AudioSynthesisEngine,
    // a timeline that stopped itself at the end, until the next start
    finished: bool,
    unlock: Option<Unlock>,
}

impl PlaybackController {
    /// Validate `script` and set up an idle session around it.
    pub fn new(
        script: SessionScript,
        config: SessionConfig,
        backend: Box<dyn AudioBackend>,
        speech: Option<Box<dyn SpeechSynthesizer>>,
    ) -> Result<Self, SessionError> {
        let audio = AudioSynthesisEngine::new(backend, &config);
        Self::with_engine(script, config, audio, speech)
    }

    /// Like [`PlaybackController::new`] with a ready-made audio engine.
    pub fn with_engine(
        script: SessionScript,
        config: SessionConfig,
        audio: AudioSynthesisEngine,
        speech: Option<Box<dyn SpeechSynthesizer>>,
    ) -> Result<Self, SessionError> {
        script.validate()?;
        Ok(Self {
            script,
            default_soundscape: config.default_soundscape,
            state: TransportState::Idle,
            timers: TimerQueue::new(),
            clock: SessionClock::new(),
            strategy: None,
            narration: NarrationDispatcher::new(speech, &config),
            audio,
            finished: false,
            unlock: None,
        })
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn script(&self) -> &SessionScript {
        &self.script
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn audio(&self) -> &AudioSynthesisEngine {
        &self.audio
    }

    pub fn narration(&self) -> &NarrationDispatcher {
        &self.narration
    }

    /// Result of the last attempt to start audio, if any.
    pub fn audio_status(&self) -> Option<&Unlock> {
        self.unlock.as_ref()
    }

    /// Begin the session from idle.
    ///
    /// Audio that cannot start is reported as `Unlock::Blocked`; the session
    /// runs regardless.
    pub fn start(&mut self) -> Result<Unlock, SessionError> {
        if self.state != TransportState::Idle {
            return Err(SessionError::AlreadyStarted);
        }
        info!("session {} starting", self.script.id());

        let unlock = self.audio.unlock();
        if let Unlock::Blocked(reason) = &unlock {
            warn!("ambient audio blocked, continuing silently: {reason}");
        }
        self.unlock = Some(unlock.clone());

        self.finished = false;
        self.clock.reset(&mut self.timers);
        self.clock.start(&mut self.timers);
        self.state = TransportState::Playing;

        let mut strategy = Strategy::new(&self.script);
        let first = strategy.begin();
        self.strategy = Some(strategy);

        let ambient = first.ambient.or(self.default_soundscape);
        self.apply(Transition { ambient, ..first });
        Ok(unlock)
    }

    /// Pause a playing session or resume a paused one. Other states are left
    /// alone.
    pub fn toggle_play_pause(&mut self) -> TransportState {
        match self.state {
            TransportState::Playing => {
                self.clock.pause(&mut self.timers);
                self.narration.cancel();
                self.audio.suspend(&mut self.timers);
                self.state = TransportState::Paused;
                debug!("paused at {}s", self.clock.elapsed());
            }
            TransportState::Paused => {
                self.clock.start(&mut self.timers);
                let unlock = self.audio.resume(&mut self.timers);
                self.unlock = Some(unlock);
                self.state = TransportState::Playing;
                debug!("resumed at {}s", self.clock.elapsed());
            }
            TransportState::Idle | TransportState::Completed => {}
        }
        self.state
    }

    /// End the session and release everything. Safe to call any number of
    /// times.
    pub fn stop(&mut self) {
        self.teardown();
        self.finished = false;
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.audio.set_volume(volume);
        self.narration.set_volume(volume);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
        self.narration.set_muted(muted);
    }

    /// Run the session's event loop `seconds` forward.
    ///
    /// Bursts and cues that rang out before this call are released first;
    /// anything fired during it stays connected at least until the next.
    pub fn advance(&mut self, seconds: f64) {
        self.audio.maintain(self.timers.now());
        let until = self.timers.now() + seconds.max(0.0);
        while let Some(id) = self.timers.next_due(until) {
            if self.clock.on_tick(id) {
                self.on_tick();
            } else if !self.audio.on_timer(id, &mut self.timers) {
                debug!("ignoring stray timer {id:?}");
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (display_text, visual_cue_label) = self
            .strategy
            .as_ref()
            .map(Strategy::display)
            .unwrap_or_default();
        let (completed_groups, total_groups) =
            self.strategy.as_ref().map_or((0, 0), Strategy::groups);
        let progress_ratio = if self.finished {
            1.0
        } else {
            self.strategy.as_ref().map_or(0.0, Strategy::progress)
        };

        SessionSnapshot {
            elapsed_seconds: self.clock.elapsed(),
            active: self.strategy.as_ref().map(Strategy::position),
            display_text,
            visual_cue_label,
            progress_ratio,
            is_playing: self.state == TransportState::Playing,
            is_complete: self.finished || self.state == TransportState::Completed,
            completed_groups,
            total_groups,
            transport: self.state,
            soundscape: self.audio.active_soundscape(),
        }
    }

    fn on_tick(&mut self) {
        let Some(strategy) = self.strategy.as_mut() else {
            return;
        };
        if let Some(transition) = strategy.advance(1) {
            self.apply(transition);
        }
    }

    fn apply(&mut self, transition: Transition) {
        if let Some(text) = &transition.narration {
            self.narration.narrate(text);
        }
        let now = self.timers.now();
        if let Some(cue) = transition.cue {
            self.audio.play_cue(cue, now);
        }
        if let Some(theme) = transition.ambient {
            if self.audio.active_soundscape() != Some(theme) {
                self.audio.start(theme, &mut self.timers);
            }
        }

        if transition.finished {
            let stops = self.strategy.as_ref().is_some_and(Strategy::stops_on_finish);
            if stops {
                info!("session {} finished", self.script.id());
                // keep the last step on display until the next start, and
                // let its line finish
                let strategy = self.strategy.take();
                self.release();
                self.strategy = strategy;
                self.finished = true;
            } else {
                info!("session {} complete, waiting for stop", self.script.id());
                self.clock.pause(&mut self.timers);
                self.state = TransportState::Completed;
            }
        }
    }

    fn teardown(&mut self) {
        self.narration.cancel();
        self.release();
    }

    /// Everything `teardown` does except silencing narration.
    fn release(&mut self) {
        self.audio.close(&mut self.timers);
        self.clock.reset(&mut self.timers);
        self.timers.clear_all();
        self.strategy = None;
        if self.state != TransportState::Idle {
            info!("session {} stopped", self.script.id());
        }
        self.state = TransportState::Idle;
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bus::OfflineBackend,
        session::{
            narration::RecordingSpeech,
            script::{MuscleGroup, PhaseScript, Script},
        },
    };

    fn controller(script: SessionScript) -> PlaybackController {
        let (backend, _output) = OfflineBackend::new(8_000.0);
        let (speech, _monitor) = RecordingSpeech::new(vec![]);
        PlaybackController::new(
            script,
            SessionConfig::new().seed(3),
            Box::new(backend),
            Some(Box::new(speech)),
        )
        .unwrap()
    }

    fn timeline() -> SessionScript {
        Script::builder("t", 30)
            .step(0, "one")
            .step(10, "two")
            .with_visual_cue("glow")
            .step(20, "three")
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn invalid_scripts_never_build_a_controller() {
        let (backend, _output) = OfflineBackend::new(8_000.0);
        let empty = PhaseScript::new("p", vec![]);
        let result = PlaybackController::new(
            empty.into(),
            SessionConfig::new(),
            Box::new(backend),
            None,
        );
        assert!(matches!(result, Err(SessionError::Script(_))));
    }

    #[test]
    fn start_only_from_idle() {
        let mut session = controller(timeline());
        assert_eq!(session.start(), Ok(Unlock::Ready));
        assert_eq!(session.start(), Err(SessionError::AlreadyStarted));
        session.toggle_play_pause();
        assert_eq!(session.start(), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn snapshot_tracks_the_timeline() {
        let mut session = controller(timeline());
        session.start().unwrap();
        assert_eq!(session.snapshot().display_text, "one");

        session.advance(15.0);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.elapsed_seconds, 15);
        assert_eq!(snapshot.active, Some(Position::Step(1)));
        assert_eq!(snapshot.visual_cue_label.as_deref(), Some("glow"));
        assert_eq!(snapshot.progress_ratio, 0.5);
        assert!(snapshot.is_playing);
        assert!(!snapshot.is_complete);
    }

    #[test]
    fn timeline_stops_itself_and_reports_completion() {
        let mut session = controller(timeline());
        session.start().unwrap();
        session.advance(30.0);

        let snapshot = session.snapshot();
        assert_eq!(session.state(), TransportState::Idle);
        assert!(snapshot.is_complete);
        assert!(!snapshot.is_playing);
        assert_eq!(snapshot.elapsed_seconds, 0);
        assert_eq!(snapshot.progress_ratio, 1.0);
        assert!(session.timers().is_empty());

        // a fresh start clears the completion
        session.start().unwrap();
        assert!(!session.snapshot().is_complete);
    }

    #[test]
    fn zero_length_timeline_completes_on_start() {
        let script: SessionScript = Script::builder("z", 0).step(0, "only").build().unwrap().into();
        let mut session = controller(script);
        assert_eq!(session.start(), Ok(Unlock::Ready));

        let snapshot = session.snapshot();
        assert_eq!(session.state(), TransportState::Idle);
        assert!(snapshot.is_complete);
        assert_eq!(snapshot.progress_ratio, 1.0);
        assert_eq!(snapshot.display_text, "only");
        assert!(session.timers().is_empty());
    }

    #[test]
    fn phase_session_rests_on_complete() {
        let script = PhaseScript::new(
            "p",
            vec![MuscleGroup::new("Jaw", "Clench.", "Soften.", 2, 3, "face")],
        )
        .with_soundscape(SoundscapeId::Drone);
        let mut session = controller(script.into());
        session.start().unwrap();
        assert_eq!(session.snapshot().soundscape, Some(SoundscapeId::Drone));

        session.advance(60.0);
        let snapshot = session.snapshot();
        assert_eq!(session.state(), TransportState::Completed);
        assert!(snapshot.is_complete);
        assert_eq!(snapshot.completed_groups, 1);
        assert_eq!(snapshot.elapsed_seconds, 10);
        assert!(!session.clock().is_running());
        // ambience keeps playing until stopped
        assert_eq!(snapshot.soundscape, Some(SoundscapeId::Drone));

        session.stop();
        assert_eq!(session.state(), TransportState::Idle);
        assert_eq!(session.snapshot().soundscape, None);
    }
}
