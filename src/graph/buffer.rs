use std::sync::Arc;

use crate::{
    graph::node::{GraphNode, RenderCtx},
    random::RandomSource,
};

/// Plays a pre-rendered buffer on a loop.
///
/// Noise beds share one white-noise buffer; each consumer starts at its own
/// offset so stacked beds don't line up sample for sample.
pub struct BufferNode {
    buffer: Arc<[f32]>,
    position: usize,
}

impl BufferNode {
    pub fn looping(buffer: Arc<[f32]>) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        if !self.buffer.is_empty() {
            self.position = offset % self.buffer.len();
        }
        self
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Fill a buffer of `frames` uniform white-noise samples.
pub fn white_noise(rng: &mut dyn RandomSource, frames: usize) -> Arc<[f32]> {
    (0..frames).map(|_| rng.bipolar()).collect::<Vec<_>>().into()
}

impl GraphNode for BufferNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let len = self.buffer.len();
        if len == 0 {
            out.fill(0.0);
            return;
        }

        let mut written = 0;
        while written < out.len() {
            let run = (len - self.position).min(out.len() - written);
            out[written..written + run]
                .copy_from_slice(&self.buffer[self.position..self.position + run]);
            written += run;
            self.position = (self.position + run) % len;
        }
    }
}
