//! On-screen captions standing in for a platform voice.

use std::{cell::RefCell, rc::Rc};

use stillwater::{
    session::{SpeechSynthesizer, Utterance, VoiceInfo},
    SpeechError,
};

/// The line currently being "spoken", shared with the UI.
pub type Caption = Rc<RefCell<Option<Utterance>>>;

pub struct CaptionSpeech {
    caption: Caption,
}

impl CaptionSpeech {
    pub fn new() -> (Self, Caption) {
        let caption = Caption::default();
        (
            Self {
                caption: Rc::clone(&caption),
            },
            caption,
        )
    }
}

impl SpeechSynthesizer for CaptionSpeech {
    fn voices(&self) -> Vec<VoiceInfo> {
        vec![VoiceInfo {
            is_default: true,
            ..VoiceInfo::new("Caption (calm)", "en")
        }]
    }

    fn speak(&mut self, utterance: Utterance) -> Result<(), SpeechError> {
        *self.caption.borrow_mut() = Some(utterance);
        Ok(())
    }

    fn cancel(&mut self) {
        self.caption.borrow_mut().take();
    }
}
