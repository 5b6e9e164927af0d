use crate::{
    dsp::compressor::{Compressor, CompressorSettings},
    graph::node::{GraphNode, RenderCtx},
};

/// Dynamics compressor as an in-place graph effect.
pub struct CompressorNode {
    compressor: Compressor,
}

impl CompressorNode {
    pub fn new(settings: CompressorSettings) -> Self {
        Self {
            compressor: Compressor::new(settings),
        }
    }

    pub fn settings(&self) -> CompressorSettings {
        self.compressor.settings()
    }
}

impl Default for CompressorNode {
    fn default() -> Self {
        Self::new(CompressorSettings::default())
    }
}

impl GraphNode for CompressorNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.compressor.render(out, ctx.sample_rate);
    }
}
