use crate::{
    bus::command::{BusCommand, CommandReceiver, NodeId},
    graph::{node::RenderCtx, stereo::StereoNode},
    MAX_BLOCK_SIZE,
};

/*
Master Bus
==========

Render-side end of the audio context. Lives on the device callback thread
and owns every playing source.

  control thread                    audio thread
  ──────────────                    ────────────
  AudioContext ──(rtrb ring)──→ MasterBus.render()
     connect / disconnect          1. drain commands
     set_gain                      2. render + sum sources
                                   3. drop sources that went inactive
                                   4. apply master gain (ramped per block)

The output is always produced in chunks of at most MAX_BLOCK_SIZE frames so
node scratch buffers never need to grow on the audio thread.
*/

pub struct MasterBus {
    rx: Box<dyn CommandReceiver>,
    sources: Vec<(NodeId, Box<dyn StereoNode>)>,
    sample_rate: f32,
    gain: f32,
    target_gain: f32,
    frames_rendered: u64,
    scratch_l: Vec<f32>,
    scratch_r: Vec<f32>,
    mix_l: Vec<f32>,
    mix_r: Vec<f32>,
}

impl MasterBus {
    pub fn new(rx: impl CommandReceiver + 'static, sample_rate: f32, gain: f32) -> Self {
        Self {
            rx: Box::new(rx),
            sources: Vec::with_capacity(64),
            sample_rate,
            gain,
            target_gain: gain,
            frames_rendered: 0,
            scratch_l: vec![0.0; MAX_BLOCK_SIZE],
            scratch_r: vec![0.0; MAX_BLOCK_SIZE],
            mix_l: vec![0.0; MAX_BLOCK_SIZE],
            mix_r: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn gain(&self) -> f32 {
        self.target_gain
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.rx.pop() {
            match command {
                BusCommand::Connect { id, node } => self.sources.push((id, node)),
                BusCommand::Disconnect(id) => self.sources.retain(|(source, _)| *source != id),
                BusCommand::DisconnectAll => self.sources.clear(),
                BusCommand::SetGain(gain) => self.target_gain = gain.clamp(0.0, 1.0),
            }
        }
    }

    fn render_chunk(&mut self, len: usize) {
        let ctx = RenderCtx::at(
            self.sample_rate,
            self.frames_rendered as f64 / self.sample_rate as f64,
        );

        let (mix_l, mix_r) = (&mut self.mix_l[..len], &mut self.mix_r[..len]);
        mix_l.fill(0.0);
        mix_r.fill(0.0);

        for (_, source) in &mut self.sources {
            let (l, r) = (&mut self.scratch_l[..len], &mut self.scratch_r[..len]);
            source.render_stereo(l, r, &ctx);
            for i in 0..len {
                mix_l[i] += l[i];
                mix_r[i] += r[i];
            }
        }
        self.sources.retain(|(_, source)| source.is_active());

        let step = (self.target_gain - self.gain) / len as f32;
        for i in 0..len {
            self.gain += step;
            mix_l[i] *= self.gain;
            mix_r[i] *= self.gain;
        }
        self.gain = self.target_gain;
        self.frames_rendered += len as u64;
    }

    /// Render into separate channel buffers.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.drain_commands();

        let frames = left.len().min(right.len());
        let mut offset = 0;
        while offset < frames {
            let len = (frames - offset).min(MAX_BLOCK_SIZE);
            self.render_chunk(len);
            left[offset..offset + len].copy_from_slice(&self.mix_l[..len]);
            right[offset..offset + len].copy_from_slice(&self.mix_r[..len]);
            offset += len;
        }
    }

    /// Render into an interleaved device buffer with any channel count.
    ///
    /// Channels beyond the first two get the mid signal; a mono device gets
    /// the mid signal alone.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        self.drain_commands();

        let channels = channels.max(1);
        let frames = data.len() / channels;
        let mut offset = 0;
        while offset < frames {
            let len = (frames - offset).min(MAX_BLOCK_SIZE);
            self.render_chunk(len);

            for i in 0..len {
                let (l, r) = (self.mix_l[i], self.mix_r[i]);
                let frame = &mut data[(offset + i) * channels..(offset + i + 1) * channels];
                match channels {
                    1 => frame[0] = (l + r) * 0.5,
                    _ => {
                        frame[0] = l;
                        frame[1] = r;
                        for extra in &mut frame[2..] {
                            *extra = (l + r) * 0.5;
                        }
                    }
                }
            }
            offset += len;
        }
    }
}
