use std::sync::Arc;

use log::{debug, info};

use crate::{
    bus::{AudioBackend, AudioContext, ContextState, NodeId, Unlock},
    config::SessionConfig,
    dsp::impulse::NoiseImpulse,
    graph::buffer::white_noise,
    random::{RandomSource, SeededRandom},
    soundscape::{
        cue::{CueKind, TransitionCue},
        events::{self, Burst},
        textures::build_bed,
        EventPattern, SoundscapeId,
    },
    timer::{TimerId, TimerQueue},
};

/*
Audio Synthesis Engine
======================

Owns the session's audio context and at most one live soundscape graph.

  start(B)    stop(A) ─→ build B's bed ─→ connect ─→ arm B's event timers
  on_timer    fire a burst, connect it, re-arm with a fresh random wait
  stop        clear event timers ─→ disconnect bed and live bursts
  suspend     clear event timers ─→ suspend the context
  resume      resume the context ─→ re-arm event timers

The looping noise buffer and the reverb impulse are generated once, on the
first start, and shared by every later bed. Volume and mute only ever write
the master gain.
*/

const NOISE_SECONDS: f32 = 4.0;
const IMPULSE_SECONDS: f32 = 1.5;

/// A restartable source of randomized bursts.
#[derive(Debug, Clone, Copy)]
pub struct EventGenerator {
    pub pattern: EventPattern,
    timer: Option<TimerId>,
}

impl EventGenerator {
    fn new(pattern: EventPattern) -> Self {
        Self {
            pattern,
            timer: None,
        }
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    fn arm(&mut self, timers: &mut TimerQueue, rng: &mut dyn RandomSource) {
        if self.timer.is_none() {
            let wait = events::next_interval(&self.pattern, rng);
            self.timer = Some(timers.set_timeout(wait));
        }
    }

    fn disarm(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.timer.take() {
            timers.clear(id);
        }
    }
}

/// Everything live for the active soundscape.
#[derive(Debug)]
pub struct AudioGraphHandle {
    soundscape: SoundscapeId,
    nodes: Vec<NodeId>,
    generators: Vec<EventGenerator>,
    // burst node, expiry time
    bursts: Vec<(NodeId, f64)>,
}

impl AudioGraphHandle {
    pub fn soundscape(&self) -> SoundscapeId {
        self.soundscape
    }

    /// Bed nodes plus bursts still ringing.
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() + self.bursts.len()
    }

    pub fn generators(&self) -> &[EventGenerator] {
        &self.generators
    }

    /// Timers currently armed by this graph.
    pub fn timers(&self) -> impl Iterator<Item = TimerId> + '_ {
        self.generators.iter().filter_map(EventGenerator::timer)
    }
}

pub struct AudioSynthesisEngine {
    context: AudioContext,
    rng: Box<dyn RandomSource>,
    volume: u8,
    muted: bool,
    cue_gain: f32,
    handle: Option<AudioGraphHandle>,
    noise: Option<Arc<[f32]>>,
    impulse: Option<NoiseImpulse>,
    cues: Vec<(NodeId, f64)>,
}

impl AudioSynthesisEngine {
    pub fn new(backend: Box<dyn AudioBackend>, config: &SessionConfig) -> Self {
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        Self::with_random(backend, config, rng)
    }

    pub fn with_random(
        backend: Box<dyn AudioBackend>,
        config: &SessionConfig,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let gain = master_gain(config.volume, config.muted);
        Self {
            context: AudioContext::new(backend, gain),
            rng,
            volume: config.volume.min(100),
            muted: config.muted,
            cue_gain: config.cue_gain,
            handle: None,
            noise: None,
            impulse: None,
            cues: Vec::new(),
        }
    }

    pub fn context(&self) -> &AudioContext {
        &self.context
    }

    pub fn handle(&self) -> Option<&AudioGraphHandle> {
        self.handle.as_ref()
    }

    pub fn active_soundscape(&self) -> Option<SoundscapeId> {
        self.handle.as_ref().map(AudioGraphHandle::soundscape)
    }

    pub fn armed_generators(&self) -> usize {
        self.handle.as_ref().map_or(0, |h| h.timers().count())
    }

    /// Cues connected and not yet expired.
    pub fn live_cues(&self) -> usize {
        self.cues.len()
    }

    pub fn master_gain(&self) -> f32 {
        master_gain(self.volume, self.muted)
    }

    /// Open and resume the audio context.
    pub fn unlock(&mut self) -> Unlock {
        self.context.unlock()
    }

    /// Replace whatever is playing with `id`.
    pub fn start(&mut self, id: SoundscapeId, timers: &mut TimerQueue) {
        self.stop(timers);

        let definition = id.definition();
        let sample_rate = self.context.sample_rate();
        let rng = self.rng.as_mut();
        let noise = self
            .noise
            .get_or_insert_with(|| white_noise(rng, (NOISE_SECONDS * sample_rate) as usize));
        let impulse = self
            .impulse
            .get_or_insert_with(|| NoiseImpulse::generate(rng, sample_rate, IMPULSE_SECONDS));

        let mut nodes = Vec::new();
        if let Some(bed) = build_bed(&definition, noise, impulse, rng) {
            if let Some(node) = self.context.connect(bed) {
                nodes.push(node);
            }
        }

        let mut generators: Vec<EventGenerator> = definition
            .recipe
            .events
            .into_iter()
            .map(EventGenerator::new)
            .collect();
        // a context that never opened has nowhere to send bursts
        if self.context.state() != ContextState::Closed {
            for generator in &mut generators {
                generator.arm(timers, rng);
            }
        }

        info!(
            "soundscape {id} started ({} nodes, {} generators)",
            nodes.len(),
            generators.len()
        );
        self.handle = Some(AudioGraphHandle {
            soundscape: id,
            nodes,
            generators,
            bursts: Vec::new(),
        });
    }

    /// Tear down the active graph. Safe to call with nothing playing.
    pub fn stop(&mut self, timers: &mut TimerQueue) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };
        for generator in &mut handle.generators {
            generator.disarm(timers);
        }
        for node in handle.nodes.drain(..) {
            self.context.disconnect(node);
        }
        for (node, _) in handle.bursts.drain(..) {
            self.context.disconnect(node);
        }
        info!("soundscape {} stopped", handle.soundscape);
    }

    /// Handle a due timer. Returns `false` if the timer is not ours.
    pub fn on_timer(&mut self, id: TimerId, timers: &mut TimerQueue) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };
        let Some(generator) = handle.generators.iter_mut().find(|g| g.timer == Some(id)) else {
            return false;
        };
        // the timeout has already fired
        generator.timer = None;

        let Burst { node, duration } = events::burst(&generator.pattern, self.rng.as_mut());
        if let Some(node) = self.context.connect(node) {
            handle.bursts.push((node, timers.now() + duration as f64));
        }
        generator.arm(timers, self.rng.as_mut());
        true
    }

    /// Release bursts and cues that have rung out by `now`.
    pub fn maintain(&mut self, now: f64) {
        let context = &mut self.context;
        let mut release = |live: &mut Vec<(NodeId, f64)>| {
            live.retain(|&(node, expiry)| {
                if expiry > now {
                    return true;
                }
                context.disconnect(node);
                false
            });
        };
        if let Some(handle) = self.handle.as_mut() {
            release(&mut handle.bursts);
        }
        release(&mut self.cues);
        self.context.flush();
    }

    /// Sound a transition marker on top of the soundscape.
    pub fn play_cue(&mut self, kind: CueKind, now: f64) {
        let cue = TransitionCue::new(kind, self.cue_gain);
        if let Some(node) = self.context.connect(cue.node) {
            debug!("cue {kind:?}");
            self.cues.push((node, now + cue.duration as f64));
        }
    }

    /// Halt generators and the audio device. The graph stays in place.
    pub fn suspend(&mut self, timers: &mut TimerQueue) {
        if let Some(handle) = self.handle.as_mut() {
            for generator in &mut handle.generators {
                generator.disarm(timers);
            }
        }
        self.context.suspend();
    }

    pub fn resume(&mut self, timers: &mut TimerQueue) -> Unlock {
        let unlock = self.context.resume();
        if self.context.state() == ContextState::Closed {
            return unlock;
        }
        if let Some(handle) = self.handle.as_mut() {
            for generator in &mut handle.generators {
                generator.arm(timers, self.rng.as_mut());
            }
        }
        unlock
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
        self.context.set_gain(self.master_gain());
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.context.set_gain(self.master_gain());
    }

    /// Stop everything and release the audio device.
    pub fn close(&mut self, timers: &mut TimerQueue) {
        self.stop(timers);
        self.cues.clear();
        self.context.close();
    }
}

fn master_gain(volume: u8, muted: bool) -> f32 {
    if muted {
        0.0
    } else {
        volume.min(100) as f32 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::OfflineBackend;

    fn engine(config: SessionConfig) -> (AudioSynthesisEngine, crate::bus::OfflineOutput) {
        let (backend, output) = OfflineBackend::new(8_000.0);
        let engine = AudioSynthesisEngine::new(Box::new(backend), &config.seed(5));
        (engine, output)
    }

    #[test]
    fn master_gain_follows_volume_and_mute() {
        assert_eq!(master_gain(70, false), 0.7);
        assert_eq!(master_gain(70, true), 0.0);
        assert_eq!(master_gain(200, false), 1.0);
    }

    #[test]
    fn starting_replaces_the_active_soundscape() {
        let (mut engine, output) = engine(SessionConfig::new());
        let mut timers = TimerQueue::new();
        engine.unlock();

        engine.start(SoundscapeId::Fire, &mut timers);
        let fire_timers: Vec<_> = engine.handle().unwrap().timers().collect();
        assert_eq!(fire_timers.len(), 1);
        output.render(64);
        assert_eq!(output.live_sources(), 1);

        engine.start(SoundscapeId::Rain, &mut timers);
        assert_eq!(engine.active_soundscape(), Some(SoundscapeId::Rain));
        assert!(fire_timers.iter().all(|id| !timers.is_active(*id)));
        assert_eq!(engine.armed_generators(), 0);
        output.render(64);
        assert_eq!(output.live_sources(), 1);
        assert_eq!(engine.context().connected(), 1);
    }

    #[test]
    fn generators_fire_and_bursts_expire() {
        let (mut engine, output) = engine(SessionConfig::new());
        let mut timers = TimerQueue::new();
        engine.unlock();
        engine.start(SoundscapeId::Birds, &mut timers);
        assert_eq!(engine.handle().unwrap().live_nodes(), 0);

        let mut fired = 0;
        while let Some(id) = timers.next_due(10.0) {
            assert!(engine.on_timer(id, &mut timers));
            fired += 1;
        }
        // waits are 0.8-3.5 s
        assert!((2..=13).contains(&fired), "fired {fired}");
        assert_eq!(engine.armed_generators(), 1);

        engine.maintain(20.0);
        output.render(64);
        assert_eq!(engine.handle().unwrap().live_nodes(), 0);
        assert_eq!(output.live_sources(), 0);
    }

    #[test]
    fn foreign_timers_are_ignored() {
        let (mut engine, _output) = engine(SessionConfig::new());
        let mut timers = TimerQueue::new();
        let clock = timers.set_interval(1.0);
        engine.unlock();
        engine.start(SoundscapeId::Ocean, &mut timers);
        assert!(!engine.on_timer(clock, &mut timers));
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut engine, output) = engine(SessionConfig::new());
        let mut timers = TimerQueue::new();
        engine.unlock();
        engine.start(SoundscapeId::WindChimes, &mut timers);

        engine.stop(&mut timers);
        engine.stop(&mut timers);
        assert!(engine.handle().is_none());
        assert!(timers.is_empty());
        output.render(64);
        assert_eq!(output.live_sources(), 0);
    }

    #[test]
    fn suspend_disarms_and_resume_rearms() {
        let (mut engine, output) = engine(SessionConfig::new());
        let mut timers = TimerQueue::new();
        engine.unlock();
        engine.start(SoundscapeId::Birds, &mut timers);

        engine.suspend(&mut timers);
        assert_eq!(engine.armed_generators(), 0);
        assert!(timers.is_empty());
        assert!(!output.is_running());

        assert!(engine.resume(&mut timers).is_ready());
        assert_eq!(engine.armed_generators(), 1);
        assert!(output.is_running());
    }

    #[test]
    fn volume_and_mute_only_touch_the_gain() {
        let (mut engine, output) = engine(SessionConfig::new().volume(80));
        let mut timers = TimerQueue::new();
        engine.unlock();
        engine.start(SoundscapeId::Drone, &mut timers);
        output.render(64);

        engine.set_muted(true);
        output.render(64);
        assert_eq!(output.master_gain(), Some(0.0));
        engine.set_muted(false);
        engine.set_volume(30);
        output.render(64);
        assert_eq!(output.master_gain(), Some(0.3));
        assert_eq!(output.live_sources(), 1);
        assert_eq!(engine.active_soundscape(), Some(SoundscapeId::Drone));
    }

    #[test]
    fn cues_play_alongside_and_expire() {
        let (mut engine, output) = engine(SessionConfig::new());
        let mut timers = TimerQueue::new();
        engine.unlock();
        engine.start(SoundscapeId::Ocean, &mut timers);
        engine.play_cue(CueKind::Tense, 0.0);
        output.render(64);
        assert_eq!(output.live_sources(), 2);
        assert_eq!(engine.live_cues(), 1);

        engine.maintain(5.0);
        output.render(64);
        assert_eq!(engine.live_cues(), 0);
        assert_eq!(output.live_sources(), 1);
    }

    #[test]
    fn unavailable_device_is_silent_not_fatal() {
        let (backend, output) = OfflineBackend::unavailable(8_000.0, "no device");
        let mut engine = AudioSynthesisEngine::new(Box::new(backend), &SessionConfig::new().seed(1));
        let mut timers = TimerQueue::new();

        assert!(!engine.unlock().is_ready());
        engine.start(SoundscapeId::Birds, &mut timers);
        engine.play_cue(CueKind::Progress, 0.0);
        assert_eq!(engine.active_soundscape(), Some(SoundscapeId::Birds));
        assert_eq!(engine.armed_generators(), 0);
        assert_eq!(output.live_sources(), 0);

        engine.suspend(&mut timers);
        assert!(!engine.resume(&mut timers).is_ready());
        assert_eq!(engine.armed_generators(), 0);
        assert!(timers.is_empty());
        engine.close(&mut timers);
    }
}
