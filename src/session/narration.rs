use std::{cell::RefCell, rc::Rc};

use log::{debug, warn};

use crate::{config::SessionConfig, error::SpeechError};

/// A voice offered by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub name: String,
    pub lang: String,
    /// The platform's own choice when nothing is asked for.
    pub is_default: bool,
}

impl VoiceInfo {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            is_default: false,
        }
    }
}

/// One request to speak.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Relative to natural speech (1.0).
    pub rate: f32,
    /// 0.0-1.0.
    pub volume: f32,
    /// `None` leaves the choice to the platform.
    pub voice: Option<String>,
}

/// Platform text-to-speech.
///
/// `speak` returns as soon as the utterance is queued; speech runs on its
/// own. `cancel` must silence anything in flight and is safe to call when
/// nothing is.
pub trait SpeechSynthesizer {
    fn voices(&self) -> Vec<VoiceInfo>;

    fn speak(&mut self, utterance: Utterance) -> Result<(), SpeechError>;

    fn cancel(&mut self);
}

/// Turns transition text into speech, one utterance at a time.
pub struct NarrationDispatcher {
    synth: Option<Box<dyn SpeechSynthesizer>>,
    rate: f32,
    hints: Vec<String>,
    volume: u8,
    muted: bool,
    // resolved on first use; inner None means platform default
    voice: Option<Option<String>>,
}

impl NarrationDispatcher {
    /// `synth` is `None` where the platform has no speech; narration is then
    /// skipped silently.
    pub fn new(synth: Option<Box<dyn SpeechSynthesizer>>, config: &SessionConfig) -> Self {
        Self {
            synth,
            rate: config.speech_rate,
            hints: config.voice_hints.clone(),
            volume: config.volume.min(100),
            muted: config.muted,
            voice: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.synth.is_some()
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume as f32 / 100.0
        }
    }

    /// Cancel whatever is being said, then say `text`.
    pub fn narrate(&mut self, text: &str) {
        let volume = self.volume();
        let Some(synth) = self.synth.as_mut() else {
            return;
        };
        synth.cancel();
        if text.trim().is_empty() {
            return;
        }

        let voice = self
            .voice
            .get_or_insert_with(|| choose_voice(&synth.voices(), &self.hints))
            .clone();
        let utterance = Utterance {
            text: text.to_string(),
            rate: self.rate,
            volume,
            voice,
        };
        debug!("narrating: {}", utterance.text);
        if let Err(err) = synth.speak(utterance) {
            warn!("narration failed: {err}");
        }
    }

    pub fn cancel(&mut self) {
        if let Some(synth) = self.synth.as_mut() {
            synth.cancel();
        }
    }
}

/// First voice whose name contains a hint (hints tried in order), else the
/// voice the platform marks as its default. `None` leaves it to the platform.
pub fn choose_voice(voices: &[VoiceInfo], hints: &[String]) -> Option<String> {
    hints
        .iter()
        .find_map(|hint| {
            let hint = hint.to_lowercase();
            voices.iter().find(|v| v.name.to_lowercase().contains(&hint))
        })
        .or_else(|| voices.iter().find(|v| v.is_default))
        .map(|v| v.name.clone())
}

/// What a [`RecordingSpeech`] has been asked to do.
#[derive(Debug, Default)]
struct SpeechLog {
    spoken: Vec<Utterance>,
    cancels: usize,
    speaking: bool,
}

/// Speech backend that keeps a log instead of talking. The paired
/// [`SpeechMonitor`] reads the log after the backend has been handed off.
pub struct RecordingSpeech {
    voices: Vec<VoiceInfo>,
    log: Rc<RefCell<SpeechLog>>,
}

impl RecordingSpeech {
    pub fn new(voices: Vec<VoiceInfo>) -> (Self, SpeechMonitor) {
        let log = Rc::new(RefCell::new(SpeechLog::default()));
        let speech = Self {
            voices,
            log: Rc::clone(&log),
        };
        (speech, SpeechMonitor { log })
    }
}

impl SpeechSynthesizer for RecordingSpeech {
    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    fn speak(&mut self, utterance: Utterance) -> Result<(), SpeechError> {
        let mut log = self.log.borrow_mut();
        log.spoken.push(utterance);
        log.speaking = true;
        Ok(())
    }

    fn cancel(&mut self) {
        let mut log = self.log.borrow_mut();
        log.cancels += 1;
        log.speaking = false;
    }
}

pub struct SpeechMonitor {
    log: Rc<RefCell<SpeechLog>>,
}

impl SpeechMonitor {
    pub fn spoken(&self) -> Vec<Utterance> {
        self.log.borrow().spoken.clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.log.borrow().spoken.last().map(|u| u.text.clone())
    }

    pub fn cancels(&self) -> usize {
        self.log.borrow().cancels
    }

    /// An utterance was queued and not cancelled since.
    pub fn is_speaking(&self) -> bool {
        self.log.borrow().speaking
    }
}
