//! cpal output for the master bus.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};

use stillwater::{
    bus::{AudioBackend, MasterBus},
    AudioError,
};

const FALLBACK_SAMPLE_RATE: f32 = 48_000.0;

/// Default output device. The bus moves into the stream callback on `open`.
pub struct CpalBackend {
    device: Option<cpal::Device>,
    config: Option<cpal::StreamConfig>,
    stream: Option<cpal::Stream>,
}

impl CpalBackend {
    pub fn new() -> Self {
        let device = cpal::default_host().default_output_device();
        let config = device
            .as_ref()
            .and_then(|d| d.default_output_config().ok())
            .map(|c| c.config());
        Self {
            device,
            config,
            stream: None,
        }
    }

    pub fn device_name(&self) -> Option<String> {
        self.device.as_ref().and_then(|d| d.name().ok())
    }
}

impl AudioBackend for CpalBackend {
    fn sample_rate(&self) -> f32 {
        self.config
            .as_ref()
            .map_or(FALLBACK_SAMPLE_RATE, |c| c.sample_rate.0 as f32)
    }

    fn open(&mut self, mut bus: MasterBus) -> Result<(), AudioError> {
        let (Some(device), Some(config)) = (self.device.as_ref(), self.config.as_ref()) else {
            return Err(AudioError::DeviceUnavailable("no default output device".into()));
        };
        let channels = config.channels as usize;

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [f32], _| bus.render_interleaved(data, channels),
                |err| error!("audio stream error: {err}"),
                None,
            )
            .map_err(|err| AudioError::Stream(err.to_string()))?;

        info!(
            "output stream open: {} Hz, {channels} channels",
            config.sample_rate.0
        );
        self.stream = Some(stream);
        Ok(())
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        let stream = self.stream.as_ref().ok_or(AudioError::Closed)?;
        stream
            .play()
            .map_err(|err| AudioError::Blocked(err.to_string()))
    }

    fn suspend(&mut self) -> Result<(), AudioError> {
        let stream = self.stream.as_ref().ok_or(AudioError::Closed)?;
        stream
            .pause()
            .map_err(|err| AudioError::Stream(err.to_string()))
    }

    fn close(&mut self) {
        self.stream = None;
    }
}
