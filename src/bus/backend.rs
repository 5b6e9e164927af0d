use std::{cell::RefCell, rc::Rc};

use crate::{bus::master::MasterBus, error::AudioError};

/// Where the master bus ends up: a sound device, or a buffer in tests.
///
/// `open` hands the render side over; after that the control side only talks
/// to the bus through its command ring.
pub trait AudioBackend {
    fn sample_rate(&self) -> f32;

    fn open(&mut self, bus: MasterBus) -> Result<(), AudioError>;

    /// Start or restart pulling audio.
    fn resume(&mut self) -> Result<(), AudioError>;

    /// Stop pulling audio; sources keep their state.
    fn suspend(&mut self) -> Result<(), AudioError>;

    /// Release the device and drop the bus. Safe to call when not open.
    fn close(&mut self);
}

#[derive(Default)]
struct OfflineState {
    bus: Option<MasterBus>,
    running: bool,
    opens: usize,
}

/// Pull-rendered backend. The paired [`OfflineOutput`] drives rendering and
/// inspects what is playing.
pub struct OfflineBackend {
    sample_rate: f32,
    state: Rc<RefCell<OfflineState>>,
    refuse_open: Option<String>,
    refuse_resume: Option<String>,
}

impl OfflineBackend {
    pub fn new(sample_rate: f32) -> (Self, OfflineOutput) {
        let state = Rc::new(RefCell::new(OfflineState::default()));
        let backend = Self {
            sample_rate,
            state: Rc::clone(&state),
            refuse_open: None,
            refuse_resume: None,
        };
        (backend, OfflineOutput { sample_rate, state })
    }

    /// A backend whose playback never gets permission to start.
    pub fn blocked(sample_rate: f32, reason: impl Into<String>) -> (Self, OfflineOutput) {
        let (mut backend, output) = Self::new(sample_rate);
        backend.refuse_resume = Some(reason.into());
        (backend, output)
    }

    /// A backend with no device behind it.
    pub fn unavailable(sample_rate: f32, reason: impl Into<String>) -> (Self, OfflineOutput) {
        let (mut backend, output) = Self::new(sample_rate);
        backend.refuse_open = Some(reason.into());
        (backend, output)
    }
}

impl AudioBackend for OfflineBackend {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn open(&mut self, bus: MasterBus) -> Result<(), AudioError> {
        if let Some(reason) = &self.refuse_open {
            return Err(AudioError::DeviceUnavailable(reason.clone()));
        }
        let mut state = self.state.borrow_mut();
        state.bus = Some(bus);
        state.running = false;
        state.opens += 1;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        if let Some(reason) = &self.refuse_resume {
            return Err(AudioError::Blocked(reason.clone()));
        }
        let mut state = self.state.borrow_mut();
        if state.bus.is_none() {
            return Err(AudioError::Closed);
        }
        state.running = true;
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), AudioError> {
        self.state.borrow_mut().running = false;
        Ok(())
    }

    fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        state.bus = None;
        state.running = false;
    }
}

/// Test and bounce side of an [`OfflineBackend`].
pub struct OfflineOutput {
    sample_rate: f32,
    state: Rc<RefCell<OfflineState>>,
}

impl OfflineOutput {
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Pull `frames` of stereo audio. A suspended or closed backend yields
    /// silence and leaves the sources untouched.
    pub fn render(&self, frames: usize) -> (Vec<f32>, Vec<f32>) {
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];

        let mut state = self.state.borrow_mut();
        if state.running {
            if let Some(bus) = state.bus.as_mut() {
                bus.render(&mut left, &mut right);
            }
        }
        (left, right)
    }

    /// Render `seconds` of audio in device-sized blocks.
    pub fn render_seconds(&self, seconds: f32) -> (Vec<f32>, Vec<f32>) {
        let total = (seconds * self.sample_rate) as usize;
        let mut left = Vec::with_capacity(total);
        let mut right = Vec::with_capacity(total);
        while left.len() < total {
            let (l, r) = self.render(512.min(total - left.len()));
            left.extend(l);
            right.extend(r);
        }
        (left, right)
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().bus.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// Sources currently held by the render side.
    pub fn live_sources(&self) -> usize {
        self.state
            .borrow()
            .bus
            .as_ref()
            .map_or(0, MasterBus::source_count)
    }

    pub fn master_gain(&self) -> Option<f32> {
        self.state.borrow().bus.as_ref().map(MasterBus::gain)
    }

    /// How many times a bus has been handed to this backend.
    pub fn opens(&self) -> usize {
        self.state.borrow().opens
    }
}
